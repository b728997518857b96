//! Append-only newline-delimited JSON manifest of emitted clips.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One manifest line. Field declaration order is part of the on-disk
/// schema; downstream tooling reads these positionally as well as by key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestRecord {
    /// Path of the written clip, forward-slash separated.
    pub clip_path: String,
    /// Path of the source recording the clip was cut from.
    pub source_path: String,
    /// Sample rate of the written clip (Hz).
    pub sample_rate: u32,
    /// Configured clip length in seconds.
    pub clip_seconds: f64,
    /// Configured hop length in seconds.
    pub hop_seconds: f64,
    /// Measured RMS energy of the clip.
    pub clip_rms: f32,
}

/// Render a path with forward slashes regardless of platform.
pub fn posix_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Append one record to the manifest at `path`, creating parent
/// directories as needed.
///
/// The file is opened and closed per record, so an interrupted run leaves
/// only whole lines behind. There is exactly one writer per run;
/// concurrent writers are unsupported.
pub fn append(path: &Path, record: &ManifestRecord) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let line = serde_json::to_string(record).map_err(std::io::Error::other)?;
    writeln!(file, "{line}")?;

    Ok(())
}
