//! Build error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during a release build run.
///
/// Every variant is fatal: the pipeline has no retry or recovery policy, a
/// failed run simply exits non-zero and leaves cleanup to the next run's
/// workspace preparation.
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("no version define found in {path}")]
    VersionNotFound { path: PathBuf },

    #[error("cannot read version metadata {path}: {source}")]
    Metadata {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config {path}: {reason}")]
    Config { path: PathBuf, reason: String },

    #[error("download failed: {url}: {reason}")]
    Download { url: String, reason: String },

    #[error("checksum mismatch for {path}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("cannot spawn {cmd}: {source}")]
    Spawn {
        cmd: String,
        source: std::io::Error,
    },

    #[error("command failed: {cmd} (exit code: {code:?})")]
    CommandFailed { cmd: String, code: Option<i32> },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

pub type Result<T> = std::result::Result<T, BuildError>;
