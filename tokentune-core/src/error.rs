use std::path::PathBuf;

use thiserror::Error;

/// All errors produced by tokentune-core.
#[derive(Debug, Error)]
pub enum TokentuneError {
    #[error("decode error for {path}: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("encode error for {path}: {reason}")]
    Encode { path: PathBuf, reason: String },

    #[error("shape error: {0}")]
    Shape(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("no .wav files found in {dir}")]
    NoInput { dir: PathBuf },

    #[error("resample error: {0}")]
    Resample(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TokentuneError>;
