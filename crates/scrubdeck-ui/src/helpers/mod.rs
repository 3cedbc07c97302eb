// crates/scrubdeck-ui/src/helpers/mod.rs
//
// The teacher's `helpers/` held `clip_query.rs`, `log.rs`, `reset.rs` and
// `format.rs`. Only `format` survives here: `clip_query`/`reset` queried the
// old `ProjectState::library`/`timeline` Vecs directly, superseded by
// `Project::timeline()`/`scrubdeck_core::timeline::Track` iteration; `log`
// was a hand-rolled println wrapper, superseded by `tracing`.

pub mod format;
