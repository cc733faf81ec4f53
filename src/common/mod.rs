#[cfg(feature = "gui")]
pub mod file_dialog;
