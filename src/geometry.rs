//! Window sizing policy for the overlay.
//!
//! The host window must be tall enough to show the crosshair pushed down by
//! the vertical offset. Sizes are logical units; converting to device pixels is
//! left to the host.

/// Fixed padding added below the image.
pub const MARGIN: f64 = 10.0;
/// Width is always this multiple of the height.
pub const ASPECT: f64 = 1.3;
pub const MIN_HEIGHT: f64 = 300.0;
pub const MAX_HEIGHT: f64 = 1000.0;

/// Size bounds declared to the host when the widget is attached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WidgetBounds {
    pub min: (f64, f64),
    pub max: (f64, f64),
}

impl WidgetBounds {
    pub fn fixed() -> Self {
        Self {
            min: (MIN_HEIGHT * ASPECT, MIN_HEIGHT),
            max: (MAX_HEIGHT * ASPECT, MAX_HEIGHT),
        }
    }

    /// Whether `request` fits inside the bounds, allowing for float noise from
    /// the aspect multiplication.
    pub fn contains(&self, request: &WindowGeometryRequest) -> bool {
        const EPS: f64 = 1e-6;
        request.width >= self.min.0 - EPS
            && request.width <= self.max.0 + EPS
            && request.height >= self.min.1 - EPS
            && request.height <= self.max.1 + EPS
    }
}

impl Default for WidgetBounds {
    fn default() -> Self {
        Self::fixed()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowGeometryRequest {
    pub width: f64,
    pub height: f64,
}

/// Map an image height and vertical offset to a clamped window size.
///
/// A non-finite offset is treated as zero so the result always stays inside
/// `[MIN_HEIGHT, MAX_HEIGHT]`.
pub fn compute_geometry(pixel_height: u32, offset: f64) -> WindowGeometryRequest {
    let offset = if offset.is_finite() { offset } else { 0.0 };
    let raw = f64::from(pixel_height) + offset + MARGIN;
    let height = raw.clamp(MIN_HEIGHT, MAX_HEIGHT);
    WindowGeometryRequest {
        width: height * ASPECT,
        height,
    }
}
