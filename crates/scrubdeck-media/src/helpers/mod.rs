// crates/scrubdeck-media/src/helpers/mod.rs
//
// Internal helper modules for scrubdeck-media.
// Not re-exported from lib.rs — these are encode/decode implementation details,
// not part of the public API consumed by scrubdeck-ui.

pub mod yuv;
pub mod seek;