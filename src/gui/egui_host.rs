use crate::error::{OverlayError, Result};
use crate::geometry::{WidgetBounds, WindowGeometryRequest};
use crate::host::HostWindow;
use eframe::egui;
use std::cell::RefCell;
use std::rc::Rc;

/// Frames to wait for the viewport to report a queued size before centring
/// with whatever size it has.
const MAX_WAIT_FRAMES: u32 = 30;

#[derive(Debug, Default)]
struct CenterState {
    requested: bool,
    expected: Option<egui::Vec2>,
    waited: u32,
}

/// Centring that waits until the viewport knows its monitor and has taken
/// the last queued size. Shared between [`EguiHost`] and the app's frame
/// loop.
#[derive(Debug, Clone, Default)]
pub struct PendingCenter {
    state: Rc<RefCell<CenterState>>,
}

impl PendingCenter {
    pub fn is_pending(&self) -> bool {
        self.state.borrow().requested
    }

    fn expect_size(&self, size: egui::Vec2) {
        let mut state = self.state.borrow_mut();
        state.expected = Some(size);
        state.waited = 0;
    }

    fn request(&self) {
        self.state.borrow_mut().requested = true;
    }

    /// Centre the window if a request is waiting and the viewport is ready.
    /// Returns `true` once the move has been sent.
    pub fn poll(&self, ctx: &egui::Context) -> bool {
        let mut state = self.state.borrow_mut();
        if !state.requested {
            return false;
        }
        let (monitor, inner, outer) = ctx.input(|i| {
            let v = i.viewport();
            (v.monitor_size, v.inner_rect, v.outer_rect)
        });
        let Some(monitor) = monitor else {
            ctx.request_repaint();
            return false;
        };
        if let Some(expected) = state.expected {
            let settled = inner.map_or(false, |r| (r.size() - expected).length() < 1.0);
            if !settled && state.waited < MAX_WAIT_FRAMES {
                state.waited += 1;
                ctx.request_repaint();
                return false;
            }
        }
        let size = outer
            .map(|r| r.size())
            .or(state.expected)
            .or(inner.map(|r| r.size()))
            .unwrap_or(monitor);
        let pos = centred_position(monitor, size);
        tracing::debug!(x = pos.x, y = pos.y, "centring viewport");
        ctx.send_viewport_cmd(egui::ViewportCommand::OuterPosition(pos));
        *state = CenterState::default();
        true
    }
}

fn centred_position(monitor: egui::Vec2, window: egui::Vec2) -> egui::Pos2 {
    egui::pos2(
        ((monitor.x - window.x) / 2.0).max(0.0),
        ((monitor.y - window.y) / 2.0).max(0.0),
    )
}

/// [`HostWindow`] backed by the eframe viewport the preview runs in.
pub struct EguiHost {
    ctx: egui::Context,
    bounds: WidgetBounds,
    center: PendingCenter,
}

impl EguiHost {
    pub fn new(ctx: egui::Context) -> Self {
        Self {
            ctx,
            bounds: WidgetBounds::fixed(),
            center: PendingCenter::default(),
        }
    }

    /// Handle the frame loop polls to finish centring.
    pub fn pending_center(&self) -> PendingCenter {
        self.center.clone()
    }
}

fn vec2(size: (f64, f64)) -> egui::Vec2 {
    egui::vec2(size.0 as f32, size.1 as f32)
}

impl HostWindow for EguiHost {
    fn declare_bounds(&mut self, bounds: WidgetBounds) -> Result<()> {
        self.bounds = bounds;
        self.ctx
            .send_viewport_cmd(egui::ViewportCommand::MinInnerSize(vec2(bounds.min)));
        self.ctx
            .send_viewport_cmd(egui::ViewportCommand::MaxInnerSize(vec2(bounds.max)));
        self.ctx
            .send_viewport_cmd(egui::ViewportCommand::Resizable(false));
        Ok(())
    }

    fn resize_window(&mut self, request: WindowGeometryRequest) -> Result<()> {
        if !self.bounds.contains(&request) {
            return Err(OverlayError::HostRejected(format!(
                "{}x{} outside declared bounds",
                request.width, request.height
            )));
        }
        let size = vec2((request.width, request.height));
        // viewport commands take logical points
        self.ctx
            .send_viewport_cmd(egui::ViewportCommand::InnerSize(size));
        self.center.expect_size(size);
        Ok(())
    }

    /// Queues the move; [`PendingCenter::poll`] sends it once the viewport
    /// reports its monitor and the new size.
    fn center_window(&mut self) -> Result<()> {
        self.center.request();
        self.center.poll(&self.ctx);
        Ok(())
    }
}
