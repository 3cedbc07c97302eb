// crates/scrubdeck-media/src/error.rs
//
// §7 error handling: variants map 1:1 to the spec's error table. Worker
// loops never propagate these past their own boundary (§4.D step 5) — a
// `MediaError` here becomes `CacheEntry::Empty` plus a `tracing::debug!`.
// `SavePipeline::run` is the one place a `SaveError` actually escapes to
// the caller.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("no such stream in '{0}'")]
    NoStream(PathBuf),
    #[error("could not open '{0}': {1}")]
    Open(PathBuf, String),
    #[error("decode failed for '{0}': {1}")]
    Decode(PathBuf, String),
    #[error("seek failed in '{0}': {1}")]
    Seek(PathBuf, String),
    #[error("scale/convert failed: {0}")]
    Scale(String),
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("nothing to save: timeline is empty")]
    EmptyTimeline,
    #[error("destination '{0}' already exists")]
    DestinationExists(PathBuf),
    #[error("unsupported extension rewrite for codec '{0}'")]
    UnsupportedExtension(String),
    #[error("encode failed: {0}")]
    Encode(String),
    #[error("cancelled")]
    Cancelled,
    #[error(transparent)]
    Media(#[from] MediaError),
}
