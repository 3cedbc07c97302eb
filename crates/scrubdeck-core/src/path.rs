// crates/scrubdeck-core/src/path.rs
//
// A media reference: directory + base name + optional frame-number field +
// extension. Two Paths are equal iff their reconstructed names are equal —
// this is what makes a request fingerprint a plain string join instead of a
// structural comparison.

use std::fmt;
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameField {
    /// Zero-padding width, e.g. 4 for `####` in `seq.####.exr`.
    pub padding: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MediaPath {
    pub directory:   PathBuf,
    pub base_name:   String,
    pub frame_field: Option<FrameField>,
    pub extension:   String,
}

impl MediaPath {
    /// Parse a single concrete file path (no frame-number sequence).
    pub fn from_file(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let directory = path.parent().map(PathBuf::from).unwrap_or_default();
        let extension = path.extension().map(|e| e.to_string_lossy().to_string()).unwrap_or_default();
        let base_name = path.file_stem().map(|s| s.to_string_lossy().to_string()).unwrap_or_default();
        Self { directory, base_name, frame_field: None, extension }
    }

    /// Parse `seq.####.exr` style image-sequence paths: a base name, a run of
    /// `#` characters giving the zero-padding width, and an extension.
    pub fn from_sequence_pattern(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();
        let directory = path.parent().map(PathBuf::from).unwrap_or_default();
        let extension = path.extension().map(|e| e.to_string_lossy().to_string()).unwrap_or_default();
        let stem = path.file_stem()?.to_string_lossy().to_string();
        let hashes = stem.chars().rev().take_while(|&c| c == '#').count();
        if hashes == 0 {
            return None;
        }
        let base_name = stem[..stem.len() - hashes].to_string();
        Some(Self {
            directory,
            base_name,
            frame_field: Some(FrameField { padding: hashes }),
            extension,
        })
    }

    /// Render one frame number of a sequence path (no-op for non-sequence paths).
    pub fn render_frame(&self, frame: i64) -> PathBuf {
        let name = match self.frame_field {
            Some(FrameField { padding }) => format!("{}{:0width$}", self.base_name, frame, width = padding),
            None => self.base_name.clone(),
        };
        self.directory.join(format!("{name}.{}", self.extension))
    }

    pub fn is_sequence(&self) -> bool {
        self.frame_field.is_some()
    }
}

impl fmt::Display for MediaPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.frame_field {
            Some(FrameField { padding }) => format!("{}{}", self.base_name, "#".repeat(padding)),
            None => self.base_name.clone(),
        };
        write!(f, "{}", self.directory.join(format!("{name}.{}", self.extension)).display())
    }
}

impl PartialEq for MediaPath {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}
impl Eq for MediaPath {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_pattern_parses_padding() {
        let p = MediaPath::from_sequence_pattern("/tmp/seq.####.exr").unwrap();
        assert_eq!(p.base_name, "seq.");
        assert_eq!(p.frame_field, Some(FrameField { padding: 4 }));
        assert_eq!(p.render_frame(12), PathBuf::from("/tmp/seq.0012.exr"));
    }

    #[test]
    fn equality_is_string_equality() {
        let a = MediaPath::from_file("/tmp/clip.mov");
        let b = MediaPath::from_file("/tmp/clip.mov");
        assert_eq!(a, b);
    }

    #[test]
    fn non_sequence_file_has_no_frame_field() {
        assert!(MediaPath::from_sequence_pattern("/tmp/clip.mov").is_none());
    }
}
