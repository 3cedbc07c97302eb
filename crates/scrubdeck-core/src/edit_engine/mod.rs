// crates/scrubdeck-core/src/edit_engine/mod.rs
//
// §4.G Edit Engine.

pub mod clamp;
pub mod drop_target;
pub mod engine;
pub mod geometry;
pub mod mode;

pub use drop_target::{associated_clip, enumerate_slots, DropTarget};
pub use engine::{DragAnchor, DragSide, EditEngine};
pub use geometry::RibbonScale;
pub use mode::EditMode;
