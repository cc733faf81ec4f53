use crate::error::Result;
use crate::geometry::{WidgetBounds, WindowGeometryRequest};
use std::sync::mpsc::{channel, Receiver, SendError, Sender, TryRecvError};

pub const CLICK_THROUGH_WARNING: &str =
    "Please enable the 'Click-Through' feature\n near by settings";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    PinnedOnly,
    Normal,
}

/// Events pushed by the host. They may be raised on any thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostSignal {
    ClickThroughChanged(bool),
    DisplayModeChanged(DisplayMode),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostCapabilityState {
    pub click_through_enabled: bool,
    pub display_mode: DisplayMode,
}

impl Default for HostCapabilityState {
    fn default() -> Self {
        Self {
            click_through_enabled: true,
            display_mode: DisplayMode::Normal,
        }
    }
}

/// Outbound window requests to the hosting runtime.
pub trait HostWindow {
    /// Announce size limits and turn off user resizing.
    fn declare_bounds(&mut self, bounds: WidgetBounds) -> Result<()>;
    fn resize_window(&mut self, request: WindowGeometryRequest) -> Result<()>;
    fn center_window(&mut self) -> Result<()>;
}

/// Cloneable handle for host callbacks. Sending never touches controller
/// state; the owner applies signals when it pumps.
#[derive(Debug, Clone)]
pub struct HostSignalSender {
    tx: Sender<HostSignal>,
}

impl HostSignalSender {
    pub fn send(&self, signal: HostSignal) -> std::result::Result<(), SendError<HostSignal>> {
        self.tx.send(signal)
    }

    pub fn click_through_changed(&self, enabled: bool) {
        if self.send(HostSignal::ClickThroughChanged(enabled)).is_err() {
            tracing::debug!("click-through signal dropped, owner gone");
        }
    }

    pub fn display_mode_changed(&self, mode: DisplayMode) {
        if self.send(HostSignal::DisplayModeChanged(mode)).is_err() {
            tracing::debug!("display mode signal dropped, owner gone");
        }
    }
}

/// Owner-side end of the host signal channel plus the state it drives.
pub struct HostSignalAdapter {
    rx: Receiver<HostSignal>,
    tx: Sender<HostSignal>,
    state: HostCapabilityState,
}

impl Default for HostSignalAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl HostSignalAdapter {
    pub fn new() -> Self {
        let (tx, rx) = channel();
        Self {
            rx,
            tx,
            state: HostCapabilityState::default(),
        }
    }

    pub fn sender(&self) -> HostSignalSender {
        HostSignalSender {
            tx: self.tx.clone(),
        }
    }

    pub fn state(&self) -> HostCapabilityState {
        self.state
    }

    /// Apply every queued signal in arrival order. Returns how many were
    /// applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        loop {
            match self.rx.try_recv() {
                Ok(HostSignal::ClickThroughChanged(enabled)) => {
                    tracing::debug!(enabled, "click-through changed");
                    self.state.click_through_enabled = enabled;
                    applied += 1;
                }
                Ok(HostSignal::DisplayModeChanged(mode)) => {
                    tracing::debug!(?mode, "display mode changed");
                    self.state.display_mode = mode;
                    applied += 1;
                }
                // the adapter holds a sender, so the channel never disconnects
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        applied
    }

    pub fn warning_message(&self) -> &'static str {
        if self.state.click_through_enabled {
            ""
        } else {
            CLICK_THROUGH_WARNING
        }
    }

    pub fn menu_visible(&self) -> bool {
        self.state.display_mode != DisplayMode::PinnedOnly
    }
}
