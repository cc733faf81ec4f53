use crate::error::{OverlayError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub const SETTINGS_FILE: &str = "local_settings.json";
pub const IMAGE_FILE: &str = "saveImage.png";

/// Persisted overlay settings. Only the vertical offset is stored.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlaySettings {
    #[serde(rename = "ShiftY", default, skip_serializing_if = "Option::is_none")]
    pub shift_y: Option<f64>,
}

/// Key/value settings plus a single binary image slot that survive restarts.
///
/// Callers are expected to be the single owner of the store; there is no
/// locking beyond that.
pub trait OverlayStore {
    fn get_offset(&self) -> Result<Option<f64>>;
    fn set_offset(&mut self, value: f64) -> Result<()>;
    fn has_stored_image(&self) -> bool;
    fn read_stored_image(&self) -> Result<Vec<u8>>;
    /// Create or replace the image slot. Readers never observe a partial file.
    fn write_stored_image(&mut self, bytes: &[u8]) -> Result<()>;
    /// Remove the image slot. Succeeds when nothing is stored.
    fn delete_stored_image(&mut self) -> Result<()>;
}

/// [`OverlayStore`] backed by two files in one directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn settings_path(&self) -> PathBuf {
        self.dir.join(SETTINGS_FILE)
    }

    pub fn image_path(&self) -> PathBuf {
        self.dir.join(IMAGE_FILE)
    }

    fn load_settings(&self) -> Result<OverlaySettings> {
        let path = self.settings_path();
        let content = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(OverlaySettings::default()),
            Err(e) => return Err(OverlayError::storage("reading settings", e)),
        };
        if content.trim().is_empty() {
            return Ok(OverlaySettings::default());
        }
        serde_json::from_str(&content).map_err(|e| {
            OverlayError::storage("parsing settings", io::Error::new(io::ErrorKind::InvalidData, e))
        })
    }
}

fn atomic_write(path: &Path, data: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

impl OverlayStore for FileStore {
    fn get_offset(&self) -> Result<Option<f64>> {
        Ok(self.load_settings()?.shift_y)
    }

    fn set_offset(&mut self, value: f64) -> Result<()> {
        let settings = OverlaySettings {
            shift_y: Some(value),
        };
        let json = serde_json::to_vec_pretty(&settings).map_err(|e| {
            OverlayError::storage("encoding settings", io::Error::new(io::ErrorKind::InvalidData, e))
        })?;
        atomic_write(&self.settings_path(), &json)
            .map_err(|e| OverlayError::storage("writing settings", e))?;
        tracing::debug!(offset = value, "offset saved");
        Ok(())
    }

    fn has_stored_image(&self) -> bool {
        self.image_path().is_file()
    }

    fn read_stored_image(&self) -> Result<Vec<u8>> {
        fs::read(self.image_path()).map_err(|e| OverlayError::storage("reading stored image", e))
    }

    fn write_stored_image(&mut self, bytes: &[u8]) -> Result<()> {
        atomic_write(&self.image_path(), bytes)
            .map_err(|e| OverlayError::storage("writing stored image", e))?;
        tracing::debug!(len = bytes.len(), "stored image replaced");
        Ok(())
    }

    fn delete_stored_image(&mut self) -> Result<()> {
        match fs::remove_file(self.image_path()) {
            Ok(()) => {
                tracing::debug!("stored image deleted");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(OverlayError::storage("deleting stored image", e)),
        }
    }
}
