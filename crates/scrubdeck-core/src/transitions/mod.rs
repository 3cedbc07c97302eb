// crates/scrubdeck-core/src/transitions/mod.rs
//
// Transition system.
//
// Three layers live here:
//
//   1. `TransitionType` — the runtime-configured transition stored on a
//      `timeline::Transition` for rendering (kind + duration). Distinct
//      from the OTIO `Transition` data model (`timeline::Transition`,
//      `otio::OtioTransition`), which records in/out offsets only; this is
//      what the save pipeline looks up to pick a blend algorithm.
//
//   2. `VideoTransition` trait — the algorithm contract. Each transition is
//      a zero-size struct implementing this trait. `apply()` receives
//      packed YUV420P buffers and an alpha in [0.0, 1.0] and returns a
//      blended packed buffer. No FFmpeg types cross this boundary — the
//      media crate handles `extract_yuv`/`write_yuv` on both sides.
//
//   3. Registry — a `HashMap<TransitionKind, Box<dyn VideoTransition>>`
//      built once via `registry()`. The save pipeline calls into this
//      rather than matching on `TransitionKind` directly.
//
// Adding a new transition: add a `TransitionKind` variant, create
// `my_transition.rs`, impl `VideoTransition`, add `mod my_transition;` and
// one line in `registry()`.

pub mod crossfade;
pub mod dip_to_black;
pub mod helpers;
pub mod iris;
pub mod push;
pub mod wipe;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::ids::ItemId;

/// Discriminant-only enum used as the registry key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransitionKind {
    Cut,
    Crossfade,
    Wipe,
    Push,
    Iris,
    DipToBlack,
}

/// Runtime-configured transition: which algorithm, how long.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionType {
    pub kind:           TransitionKind,
    pub duration_secs:  f32,
}

impl Default for TransitionType {
    fn default() -> Self {
        TransitionType::new(TransitionKind::Cut, 0.0)
    }
}

impl TransitionType {
    pub fn new(kind: TransitionKind, duration_secs: f32) -> Self {
        Self { kind, duration_secs }
    }

    pub fn kind(&self) -> TransitionKind {
        self.kind
    }

    pub fn duration_secs(&self) -> f32 {
        self.duration_secs
    }
}

/// Stored alongside a `timeline::Transition` — keyed by the `ItemId` that
/// precedes it so it survives clip reordering without going stale.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TimelineTransition {
    pub after_item_id: ItemId,
    pub kind: TransitionType,
}

// ── VideoTransition trait ────────────────────────────────────────────────

/// Algorithm contract for all video transitions.
///
/// Implementors are zero-size structs — they hold no per-clip state.
/// Runtime parameters (duration) come via `TransitionType`; the trait only
/// receives what it needs to blend one frame pair.
///
/// # Buffer contract
/// Both `frame_a` and `frame_b` are packed YUV420P byte slices:
/// `[Y plane: w×h] ++ [U plane: (w/2)×(h/2)] ++ [V plane: (w/2)×(h/2)]`,
/// no stride padding. `scrubdeck_media::helpers::yuv::extract_yuv` produces
/// them, `write_yuv` writes the result back into a frame.
///
/// # Alpha convention
/// `alpha = 0.0` → 100% frame_a (outgoing clip), `alpha = 1.0` → 100%
/// frame_b (incoming clip). The caller computes alpha from frame position
/// and total frame count.
pub trait VideoTransition: Send + Sync {
    fn kind(&self) -> TransitionKind;
    fn label(&self) -> &'static str;
    fn icon(&self) -> &'static str;
    fn default_duration_secs(&self) -> f32 { 0.5 }
    fn build(&self, duration_secs: f32) -> TransitionType;

    /// Blend `frame_a` and `frame_b` at the given `alpha` and return the
    /// result. `width`/`height` are luma dimensions; UV dims are
    /// `(width/2, height/2)`.
    fn apply(&self, frame_a: &[u8], frame_b: &[u8], width: u32, height: u32, alpha: f32) -> Vec<u8>;
}

// ── Registry ──────────────────────────────────────────────────────────────

/// All registered transitions keyed by `TransitionKind`. `Cut` has no
/// entry — callers short-circuit on `TransitionKind::Cut` before hitting
/// the registry.
pub fn registry() -> HashMap<TransitionKind, Box<dyn VideoTransition>> {
    let entries: Vec<Box<dyn VideoTransition>> = vec![
        Box::new(crossfade::Crossfade),
        Box::new(wipe::Wipe),
        Box::new(push::Push),
        Box::new(iris::Iris),
        Box::new(dip_to_black::DipToBlack),
    ];
    entries.into_iter().map(|t| (t.kind(), t)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_has_one_entry_per_non_cut_kind() {
        let r = registry();
        assert_eq!(r.len(), 5);
        assert!(!r.contains_key(&TransitionKind::Cut));
    }
}
