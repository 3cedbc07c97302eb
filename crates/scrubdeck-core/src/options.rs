// crates/scrubdeck-core/src/options.rs
//
// Request options and the canonical fingerprint strings used as cache keys
// (§3 "Request fingerprints"). A `BTreeMap` keeps keys sorted for free, so
// building the fingerprint is just a join — no explicit sort step to forget.

use std::collections::BTreeMap;
use std::fmt;
use serde::{Deserialize, Serialize};

use crate::path::MediaPath;
use crate::time::{RationalTime, TimeRange};

#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequestOptions(BTreeMap<String, String>);

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Poison an option's value to force the next request to miss the cache
    /// even though the logical request is otherwise unchanged (§3 lifecycle:
    /// "a client may poison an option to force re-fetch").
    pub fn poison(&mut self, key: &str, nonce: u64) -> &mut Self {
        self.insert(key, format!("__poison_{nonce}"));
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }
}

impl fmt::Display for RequestOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (k, v) in &self.0 {
            if !first {
                write!(f, ";")?;
            }
            first = false;
            write!(f, "{k}:{v}")?;
        }
        Ok(())
    }
}

fn join(parts: &[String]) -> String {
    parts.iter().filter(|p| !p.is_empty()).cloned().collect::<Vec<_>>().join(";")
}

pub fn info_fingerprint(path: &MediaPath, options: &RequestOptions) -> String {
    join(&[path.to_string(), options.to_string()])
}

pub fn thumbnail_fingerprint(height: u32, path: &MediaPath, time: RationalTime, options: &RequestOptions) -> String {
    join(&[
        height.to_string(),
        path.to_string(),
        format!("{}@{}", time.value, time.rate),
        options.to_string(),
    ])
}

/// Cache key for an OTIO-composition thumbnail (§4.D). `composition_id` is
/// caller-supplied and must change whenever the underlying composition does
/// — the facade has no document identity of its own to fingerprint against.
pub fn otio_thumbnail_fingerprint(composition_id: &str, height: u32, time: RationalTime, options: &RequestOptions) -> String {
    join(&[
        "otio".to_string(),
        composition_id.to_string(),
        height.to_string(),
        format!("{}@{}", time.value, time.rate),
        options.to_string(),
    ])
}

pub fn waveform_fingerprint(size: (u32, u32), path: &MediaPath, range: TimeRange, options: &RequestOptions) -> String {
    join(&[
        format!("{}x{}", size.0, size.1),
        path.to_string(),
        format!(
            "{}@{}+{}@{}",
            range.start_time.value, range.start_time.rate, range.duration.value, range.duration.rate,
        ),
        options.to_string(),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_requests_produce_equal_fingerprints() {
        let p = MediaPath::from_file("/tmp/a.mov");
        let mut o1 = RequestOptions::new();
        o1.insert("b", "2").insert("a", "1");
        let mut o2 = RequestOptions::new();
        o2.insert("a", "1").insert("b", "2"); // inserted in different order
        assert_eq!(info_fingerprint(&p, &o1), info_fingerprint(&p, &o2));
    }

    #[test]
    fn poison_changes_the_fingerprint() {
        let p = MediaPath::from_file("/tmp/a.mov");
        let mut o = RequestOptions::new();
        let before = info_fingerprint(&p, &o);
        o.poison("nonce", 1);
        let after = info_fingerprint(&p, &o);
        assert_ne!(before, after);
    }
}
