use chrono::{DateTime, Local};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    InvalidImage,
    StorageFailed,
    HostRejected,
}

/// Passive message shown after a recovered failure.
#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub at: DateTime<Local>,
}

impl Notice {
    pub fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            at: Local::now(),
        }
    }

    pub fn label(&self) -> String {
        format!("[{}] {}", self.at.format("%H:%M:%S"), self.message)
    }
}
