// crates/scrubdeck-media/src/config.rs
//
// `ServiceConfig` — loaded from a TOML file via `serde` + `toml`, mirroring
// `hls-vod-lib`/`oxidized`'s configuration pattern. Every number here has a
// concrete default so `MediaService::new()` never needs a config file.

use std::path::Path;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Thumbnail Cache capacity in bytes (§4.A "a single configurable
    /// capacity").
    pub cache_max_bytes: usize,
    /// Per-worker IO Read Cache capacity in entries (§4.B, default 16).
    pub io_cache_capacity: usize,
    /// Max concurrent probe/decode operations a single worker may farm out.
    /// The worker pool itself is fixed at three threads (§4.D); this bounds
    /// any sub-work a worker spawns (e.g. waveform's ffmpeg subprocess).
    pub probe_concurrency: u32,
    /// Bound on each `RequestQueue`'s pending-request count before `submit`
    /// blocks the caller.
    pub queue_capacity: usize,
    /// Temporary IO Read Cache bound during `SavePipeline::run` (§4.I step 2,
    /// "resize the I/O cache to a large fixed bound").
    pub save_io_cache_bytes: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            cache_max_bytes:    256 * 1024 * 1024,
            io_cache_capacity:  16,
            probe_concurrency:  4,
            queue_capacity:     256,
            save_io_cache_bytes: 1024 * 1024 * 1024,
        }
    }
}

impl ServiceConfig {
    pub fn from_toml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_toml() {
        let cfg = ServiceConfig::default();
        let text = toml::to_string(&cfg).unwrap();
        let back: ServiceConfig = toml::from_str(&text).unwrap();
        assert_eq!(back.cache_max_bytes, cfg.cache_max_bytes);
    }
}
