use crate::error::{OverlayError, Result};
use image::{ImageFormat, RgbaImage};
use std::borrow::Cow;

/// Crosshair shipped with the application.
pub const DEFAULT_ASSET: &[u8] = include_bytes!("../assets/Circle-Crosshair.png");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource {
    Custom,
    Default,
}

/// A decoded crosshair. The bitmap is owned; dropping the image releases it.
#[derive(Debug)]
pub struct OverlayImage {
    source: ImageSource,
    bitmap: RgbaImage,
}

impl OverlayImage {
    pub fn source(&self) -> ImageSource {
        self.source
    }

    pub fn pixel_width(&self) -> u32 {
        self.bitmap.width()
    }

    pub fn pixel_height(&self) -> u32 {
        self.bitmap.height()
    }

    pub fn bitmap(&self) -> &RgbaImage {
        &self.bitmap
    }
}

/// Decodes the bundled default or arbitrary PNG bytes.
#[derive(Debug, Clone)]
pub struct ImageResolver {
    default_asset: Cow<'static, [u8]>,
}

impl Default for ImageResolver {
    fn default() -> Self {
        Self {
            default_asset: Cow::Borrowed(DEFAULT_ASSET),
        }
    }
}

impl ImageResolver {
    /// Use a different default asset, mainly for packaging checks.
    pub fn with_default_asset(bytes: impl Into<Cow<'static, [u8]>>) -> Self {
        Self {
            default_asset: bytes.into(),
        }
    }

    pub fn load_default(&self) -> Result<OverlayImage> {
        if self.default_asset.is_empty() {
            return Err(OverlayError::AssetMissing("asset is empty".into()));
        }
        let bitmap = decode_png(&self.default_asset)
            .map_err(|e| OverlayError::AssetMissing(e.to_string()))?;
        Ok(OverlayImage {
            source: ImageSource::Default,
            bitmap,
        })
    }

    pub fn load_from_bytes(&self, bytes: &[u8]) -> Result<OverlayImage> {
        let bitmap = decode_png(bytes).map_err(|e| OverlayError::Decode(e.to_string()))?;
        Ok(OverlayImage {
            source: ImageSource::Custom,
            bitmap,
        })
    }
}

fn decode_png(bytes: &[u8]) -> std::result::Result<RgbaImage, image::ImageError> {
    let img = image::load_from_memory_with_format(bytes, ImageFormat::Png)?;
    let rgba = img.to_rgba8();
    if rgba.width() == 0 || rgba.height() == 0 {
        return Err(image::ImageError::Limits(
            image::error::LimitError::from_kind(image::error::LimitErrorKind::DimensionError),
        ));
    }
    Ok(rgba)
}
