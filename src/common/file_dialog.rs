use std::path::PathBuf;

/// Ask the user for a single PNG. Returns `None` when cancelled or when no
/// native picker is available on this platform.
#[cfg(target_os = "windows")]
pub fn pick_png() -> Option<PathBuf> {
    let start = dirs_next::picture_dir().unwrap_or_default();
    rfd::FileDialog::new()
        .add_filter("PNG image", &["png"])
        .set_directory(start)
        .pick_file()
}

#[cfg(not(target_os = "windows"))]
pub fn pick_png() -> Option<PathBuf> {
    tracing::info!("no native file picker on this platform");
    None
}
