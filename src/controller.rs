//! Owns the current crosshair, the vertical offset and the window size derived
//! from them.
//!
//! All mutation happens on the thread that owns the controller. Host callbacks
//! reach it through [`HostSignalSender`] and are applied by
//! [`OverlayController::pump_host_signals`].

use crate::error::{OverlayError, Result};
use crate::geometry::{compute_geometry, WidgetBounds, WindowGeometryRequest};
use crate::host::{HostCapabilityState, HostSignalAdapter, HostSignalSender, HostWindow};
use crate::image_source::{ImageResolver, OverlayImage};
use crate::notice::{Notice, NoticeKind};
use crate::offset_input::OffsetField;
use crate::storage::OverlayStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Uninitialized,
    Ready,
}

pub struct OverlayController<S: OverlayStore> {
    store: S,
    resolver: ImageResolver,
    host: Option<Box<dyn HostWindow>>,
    signals: HostSignalAdapter,
    lifecycle: Lifecycle,
    image: Option<OverlayImage>,
    image_generation: u64,
    offset: f64,
    offset_field: OffsetField,
    geometry: Option<WindowGeometryRequest>,
    notice: Option<Notice>,
}

/// Parse offset text the way the field's final value is read. Anything that
/// is not a finite number is rejected.
pub fn parse_offset(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Shortest text that reads back as `value`.
pub fn format_offset(value: f64) -> String {
    format!("{value}")
}

impl<S: OverlayStore> OverlayController<S> {
    pub fn new(store: S, resolver: ImageResolver) -> Self {
        Self {
            store,
            resolver,
            host: None,
            signals: HostSignalAdapter::new(),
            lifecycle: Lifecycle::Uninitialized,
            image: None,
            image_generation: 0,
            offset: 0.0,
            offset_field: OffsetField::default(),
            geometry: None,
            notice: None,
        }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn image(&self) -> Option<&OverlayImage> {
        self.image.as_ref()
    }

    /// Bumped every time the decoded image is replaced.
    pub fn image_generation(&self) -> u64 {
        self.image_generation
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Top margin of the crosshair inside the window.
    pub fn image_margin_top(&self) -> f64 {
        self.offset
    }

    pub fn offset_field(&self) -> &OffsetField {
        &self.offset_field
    }

    pub fn offset_field_mut(&mut self) -> &mut OffsetField {
        &mut self.offset_field
    }

    pub fn current_geometry(&self) -> Option<WindowGeometryRequest> {
        self.geometry
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    pub fn signal_sender(&self) -> HostSignalSender {
        self.signals.sender()
    }

    pub fn pump_host_signals(&mut self) -> usize {
        self.signals.pump()
    }

    pub fn host_state(&self) -> HostCapabilityState {
        self.signals.state()
    }

    pub fn warning_message(&self) -> &'static str {
        self.signals.warning_message()
    }

    pub fn menu_visible(&self) -> bool {
        self.signals.menu_visible()
    }

    /// Attach the hosting window. Bounds are declared immediately and, if an
    /// image is already loaded, the current size is pushed.
    pub fn attach_host(&mut self, mut host: Box<dyn HostWindow>) {
        if let Err(e) = host.declare_bounds(WidgetBounds::fixed()) {
            self.report(NoticeKind::HostRejected, &e);
        }
        self.host = Some(host);
        if self.lifecycle == Lifecycle::Ready {
            self.push_geometry();
        }
    }

    /// Restore the saved offset and image. Storage or decode problems fall
    /// back to the defaults; only a broken bundled asset is returned.
    pub fn initialize(&mut self) -> Result<()> {
        let offset = match self.store.get_offset() {
            Ok(v) => v.unwrap_or(0.0),
            Err(e) => {
                tracing::warn!(error = %e, "could not read saved offset, using 0");
                0.0
            }
        };
        let offset = if offset.is_finite() { offset } else { 0.0 };
        self.offset = offset;
        self.offset_field.set_text(format_offset(offset));

        let image = match self.load_stored() {
            Some(img) => img,
            None => self.resolver.load_default()?,
        };
        tracing::info!(
            source = ?image.source(),
            width = image.pixel_width(),
            height = image.pixel_height(),
            offset,
            "overlay initialised"
        );
        self.replace_image(image);
        self.lifecycle = Lifecycle::Ready;
        self.recompute();
        Ok(())
    }

    fn load_stored(&self) -> Option<OverlayImage> {
        if !self.store.has_stored_image() {
            return None;
        }
        let bytes = match self.store.read_stored_image() {
            Ok(b) => b,
            Err(e) => {
                tracing::warn!(error = %e, "stored image unreadable, using default");
                return None;
            }
        };
        match self.resolver.load_from_bytes(&bytes) {
            Ok(img) => Some(img),
            Err(e) => {
                tracing::warn!(error = %e, "stored image invalid, using default");
                None
            }
        }
    }

    fn ensure_ready(&mut self) -> Result<()> {
        if self.lifecycle == Lifecycle::Uninitialized {
            self.initialize()?;
        }
        Ok(())
    }

    /// Show a newly picked image and save it. A failed save only raises a
    /// notice; the new image stays on screen.
    pub fn select_image(&mut self, bytes: &[u8]) -> Result<WindowGeometryRequest> {
        self.ensure_ready()?;
        let image = match self.resolver.load_from_bytes(bytes) {
            Ok(img) => img,
            Err(e) => {
                self.report(NoticeKind::InvalidImage, &e);
                return Err(e);
            }
        };
        tracing::info!(
            width = image.pixel_width(),
            height = image.pixel_height(),
            "custom image selected"
        );
        self.replace_image(image);
        if let Err(e) = self.store.write_stored_image(bytes) {
            self.report(NoticeKind::StorageFailed, &e);
        }
        Ok(self.recompute())
    }

    /// Read a picked file and select it. `None` means the picker was
    /// cancelled.
    pub fn select_image_file(
        &mut self,
        path: Option<&std::path::Path>,
    ) -> Result<Option<WindowGeometryRequest>> {
        let Some(path) = path else {
            return Ok(None);
        };
        let bytes = match std::fs::read(path) {
            Ok(b) => b,
            Err(e) => {
                let err = OverlayError::storage("reading selected file", e);
                self.report(NoticeKind::StorageFailed, &err);
                return Err(err);
            }
        };
        self.select_image(&bytes).map(Some)
    }

    /// Apply offset text. Unparseable text becomes `0` and the field is
    /// rewritten to match.
    pub fn set_offset(&mut self, raw: &str) -> Result<WindowGeometryRequest> {
        self.ensure_ready()?;
        let offset = match parse_offset(raw) {
            Some(v) => {
                if self.offset_field.text() != raw {
                    self.offset_field.set_text(format_offset(v));
                }
                v
            }
            None => {
                tracing::debug!(raw, "offset text not a number, using 0");
                self.offset_field.set_text("0");
                0.0
            }
        };
        self.offset = offset;
        let geometry = self.recompute();
        if let Err(e) = self.store.set_offset(offset) {
            self.report(NoticeKind::StorageFailed, &e);
        }
        Ok(geometry)
    }

    /// Apply whatever is in the offset field.
    pub fn apply_offset_field(&mut self) -> Result<WindowGeometryRequest> {
        let raw = self.offset_field.text().to_string();
        self.set_offset(&raw)
    }

    /// Go back to the bundled crosshair and forget the saved image. The
    /// offset is kept.
    pub fn reset(&mut self) -> Result<WindowGeometryRequest> {
        self.ensure_ready()?;
        let image = self.resolver.load_default()?;
        self.replace_image(image);
        if let Err(e) = self.store.delete_stored_image() {
            self.report(NoticeKind::StorageFailed, &e);
        }
        tracing::info!("image reset to default");
        Ok(self.recompute())
    }

    fn replace_image(&mut self, image: OverlayImage) {
        if let Some(old) = self.image.take() {
            tracing::debug!(
                generation = self.image_generation,
                source = ?old.source(),
                "releasing previous image"
            );
            drop(old);
        }
        self.image = Some(image);
        self.image_generation += 1;
    }

    fn recompute(&mut self) -> WindowGeometryRequest {
        let height = self.image.as_ref().map_or(1, OverlayImage::pixel_height);
        let geometry = compute_geometry(height, self.offset);
        tracing::debug!(width = geometry.width, height = geometry.height, "geometry");
        self.geometry = Some(geometry);
        self.push_geometry();
        geometry
    }

    fn push_geometry(&mut self) {
        let Some(geometry) = self.geometry else {
            return;
        };
        let Some(host) = self.host.as_mut() else {
            return;
        };
        let resized = host.resize_window(geometry);
        let centered = host.center_window();
        for result in [resized, centered] {
            if let Err(e) = result {
                self.report(NoticeKind::HostRejected, &e);
            }
        }
    }

    fn report(&mut self, kind: NoticeKind, error: &OverlayError) {
        tracing::warn!(?kind, error = %error, "recovered from failure");
        let message = match kind {
            NoticeKind::InvalidImage => "invalid image".to_string(),
            _ => error.to_string(),
        };
        self.notice = Some(Notice::new(kind, message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_like_a_double_field() {
        assert_eq!(parse_offset("42.5"), Some(42.5));
        assert_eq!(parse_offset(" -3 "), Some(-3.0));
        assert_eq!(parse_offset("1."), Some(1.0));
        assert_eq!(parse_offset(""), None);
        assert_eq!(parse_offset("-"), None);
        assert_eq!(parse_offset("abc"), None);
        assert_eq!(parse_offset("NaN"), None);
        assert_eq!(parse_offset("inf"), None);
    }

    #[test]
    fn formats_shortest_round_trip() {
        assert_eq!(format_offset(0.0), "0");
        assert_eq!(format_offset(20.0), "20");
        assert_eq!(format_offset(42.5), "42.5");
        assert_eq!(format_offset(-7.25), "-7.25");
    }
}
