pub mod common;
pub mod controller;
pub mod error;
pub mod geometry;
pub mod host;
pub mod image_source;
pub mod logging;
pub mod notice;
pub mod offset_input;
pub mod settings;
pub mod storage;

#[cfg(feature = "gui")]
pub mod gui;

pub use controller::{Lifecycle, OverlayController};
pub use error::OverlayError;
pub use geometry::{compute_geometry, WindowGeometryRequest};
