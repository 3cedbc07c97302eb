// crates/scrubdeck-core/src/error.rs
//
// Library errors for the data model and edit engine. Media/IO errors live
// in scrubdeck-media::error — this crate never touches a file or a codec.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("timeline invariant violated: {0}")]
    Invariant(#[from] crate::timeline::InvariantViolation),

    #[error("otio document error: {0}")]
    Otio(#[from] crate::otio::OtioError),
}
