//! Run configuration loaded from a JSON key-value document.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::error::{Result, TokentuneError};

fn default_peak_target() -> f32 {
    0.95
}

/// Parameters of one preprocessing run. Loaded once, immutable thereafter.
///
/// Unknown keys in the document are ignored; missing required keys fail at
/// load, not later in the pipeline.
#[derive(Debug, Clone, Deserialize)]
pub struct PreprocessConfig {
    /// Sample rate every buffer is resampled to (Hz).
    pub target_sr: u32,
    /// Emitted clip length in seconds.
    pub clip_seconds: f64,
    /// Stride between consecutive clip starts in seconds.
    pub hop_seconds: f64,
    /// Clips with RMS below this are dropped. Default: 0.0, which keeps
    /// everything because measured RMS is always strictly positive.
    #[serde(default)]
    pub silence_rms_threshold: f32,
    /// Peak-normalization target amplitude. Default: 0.95.
    #[serde(default = "default_peak_target")]
    pub peak_target: f32,
}

impl PreprocessConfig {
    /// Read and validate a configuration document.
    ///
    /// # Errors
    /// `Config` when the file is unreadable, a required key is missing or
    /// mistyped, or a value is out of range.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|e| {
            TokentuneError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        let config: Self = serde_json::from_str(&raw).map_err(|e| {
            TokentuneError::Config(format!("cannot parse {}: {e}", path.display()))
        })?;
        config.validate()?;

        info!(
            target_sr = config.target_sr,
            clip_seconds = config.clip_seconds,
            hop_seconds = config.hop_seconds,
            silence_rms_threshold = config.silence_rms_threshold,
            peak_target = config.peak_target,
            "configuration loaded"
        );

        Ok(config)
    }

    /// Check value ranges. Called by [`PreprocessConfig::load`]; exposed for
    /// configs built in code.
    pub fn validate(&self) -> Result<()> {
        if self.target_sr == 0 {
            return Err(TokentuneError::Config("target_sr must be positive".into()));
        }
        if !self.clip_seconds.is_finite() || self.clip_seconds <= 0.0 {
            return Err(TokentuneError::Config(format!(
                "clip_seconds must be a positive number, got {}",
                self.clip_seconds
            )));
        }
        if !self.hop_seconds.is_finite() || self.hop_seconds <= 0.0 {
            return Err(TokentuneError::Config(format!(
                "hop_seconds must be a positive number, got {}",
                self.hop_seconds
            )));
        }
        if !self.silence_rms_threshold.is_finite() || self.silence_rms_threshold < 0.0 {
            return Err(TokentuneError::Config(format!(
                "silence_rms_threshold must be non-negative, got {}",
                self.silence_rms_threshold
            )));
        }
        if !self.peak_target.is_finite() || self.peak_target <= 0.0 {
            return Err(TokentuneError::Config(format!(
                "peak_target must be a positive number, got {}",
                self.peak_target
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn loads_full_config() {
        let (_dir, path) = write_config(
            r#"{
                "target_sr": 16000,
                "clip_seconds": 2.0,
                "hop_seconds": 1.0,
                "silence_rms_threshold": 0.01,
                "peak_target": 0.9
            }"#,
        );
        let config = PreprocessConfig::load(&path).unwrap();
        assert_eq!(config.target_sr, 16000);
        assert_eq!(config.clip_seconds, 2.0);
        assert_eq!(config.hop_seconds, 1.0);
        assert_eq!(config.silence_rms_threshold, 0.01);
        assert_eq!(config.peak_target, 0.9);
    }

    #[test]
    fn optional_keys_fall_back_to_defaults() {
        let (_dir, path) = write_config(
            r#"{"target_sr": 22050, "clip_seconds": 1.0, "hop_seconds": 0.5}"#,
        );
        let config = PreprocessConfig::load(&path).unwrap();
        assert_eq!(config.silence_rms_threshold, 0.0);
        assert_eq!(config.peak_target, 0.95);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let (_dir, path) = write_config(
            r#"{"target_sr": 16000, "clip_seconds": 1.0, "hop_seconds": 0.5, "augment": true}"#,
        );
        assert!(PreprocessConfig::load(&path).is_ok());
    }

    #[test]
    fn missing_required_key_is_a_config_error() {
        let (_dir, path) = write_config(r#"{"clip_seconds": 1.0, "hop_seconds": 0.5}"#);
        let err = PreprocessConfig::load(&path);
        assert!(matches!(err, Err(TokentuneError::Config(_))));
    }

    #[test]
    fn unreadable_file_is_a_config_error() {
        let err = PreprocessConfig::load(Path::new("/nonexistent/config.json"));
        assert!(matches!(err, Err(TokentuneError::Config(_))));
    }

    #[test]
    fn non_positive_values_are_rejected() {
        let (_dir, path) = write_config(
            r#"{"target_sr": 16000, "clip_seconds": 0.0, "hop_seconds": 0.5}"#,
        );
        assert!(matches!(
            PreprocessConfig::load(&path),
            Err(TokentuneError::Config(_))
        ));

        let (_dir, path) = write_config(
            r#"{"target_sr": 16000, "clip_seconds": 1.0, "hop_seconds": -0.5}"#,
        );
        assert!(matches!(
            PreprocessConfig::load(&path),
            Err(TokentuneError::Config(_))
        ));
    }
}
