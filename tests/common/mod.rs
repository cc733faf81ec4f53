#![allow(dead_code)]

use crosshair_overlay::error::{OverlayError, Result};
use crosshair_overlay::geometry::{WidgetBounds, WindowGeometryRequest};
use crosshair_overlay::host::HostWindow;
use crosshair_overlay::storage::{FileStore, OverlayStore};
use image::{DynamicImage, ImageOutputFormat, RgbaImage};
use std::io::Cursor;
use std::sync::{Arc, Mutex};

pub fn png(width: u32, height: u32) -> Vec<u8> {
    let img = DynamicImage::ImageRgba8(RgbaImage::new(width, height));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageOutputFormat::Png).unwrap();
    out.into_inner()
}

#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    Bounds(WidgetBounds),
    Resize(WindowGeometryRequest),
    Center,
}

/// Host that records every call and can be told to refuse them.
#[derive(Clone, Default)]
pub struct RecordingHost {
    pub calls: Arc<Mutex<Vec<HostCall>>>,
    pub reject: bool,
}

impl RecordingHost {
    pub fn rejecting() -> Self {
        Self {
            reject: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_resize(&self) -> Option<WindowGeometryRequest> {
        self.calls().into_iter().rev().find_map(|c| match c {
            HostCall::Resize(r) => Some(r),
            _ => None,
        })
    }

    fn record(&self, call: HostCall) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        if self.reject {
            Err(OverlayError::HostRejected("test host refuses".into()))
        } else {
            Ok(())
        }
    }
}

impl HostWindow for RecordingHost {
    fn declare_bounds(&mut self, bounds: WidgetBounds) -> Result<()> {
        self.record(HostCall::Bounds(bounds))
    }

    fn resize_window(&mut self, request: WindowGeometryRequest) -> Result<()> {
        self.record(HostCall::Resize(request))
    }

    fn center_window(&mut self) -> Result<()> {
        self.record(HostCall::Center)
    }
}

/// Store whose writes always fail while reads go to a real directory.
pub struct ReadOnlyStore {
    pub inner: FileStore,
}

fn denied(action: &'static str) -> OverlayError {
    OverlayError::Storage {
        action,
        source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
    }
}

impl OverlayStore for ReadOnlyStore {
    fn get_offset(&self) -> Result<Option<f64>> {
        self.inner.get_offset()
    }

    fn set_offset(&mut self, _value: f64) -> Result<()> {
        Err(denied("writing settings"))
    }

    fn has_stored_image(&self) -> bool {
        self.inner.has_stored_image()
    }

    fn read_stored_image(&self) -> Result<Vec<u8>> {
        self.inner.read_stored_image()
    }

    fn write_stored_image(&mut self, _bytes: &[u8]) -> Result<()> {
        Err(denied("writing stored image"))
    }

    fn delete_stored_image(&mut self) -> Result<()> {
        Err(denied("deleting stored image"))
    }
}

pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}
