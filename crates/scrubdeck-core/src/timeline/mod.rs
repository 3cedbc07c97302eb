// crates/scrubdeck-core/src/timeline/mod.rs
//
// §3/§4.F "Timeline Model" — items, tracks, the timeline tree itself, and
// the invariant checker that runs after every commit.

pub mod item;
pub mod model;
pub mod track;
pub mod validate;

pub use item::{Effect, Item, ItemKind, MediaReference};
pub use model::Timeline;
pub use track::{Track, TrackEntry, TrackKind, Transition};
pub use validate::{validate, InvariantViolation};
