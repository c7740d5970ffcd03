use crate::utils::sanitize_title;
use std::path::{Path, PathBuf};

/// Deterministic file names for every artifact of one run, keyed by the
/// sanitized title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactLayout {
    dir: PathBuf,
    stem: String,
    ext: String,
}

impl ArtifactLayout {
    pub fn new(dir: impl Into<PathBuf>, title: &str, ext: &str) -> Self {
        Self {
            dir: dir.into(),
            stem: sanitize_title(title),
            ext: ext.to_string(),
        }
    }

    pub fn stem(&self) -> &str {
        &self.stem
    }

    pub fn ext(&self) -> &str {
        &self.ext
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `<stem>_<index>.<ext>`
    pub fn part(&self, index: usize) -> PathBuf {
        self.dir.join(format!("{}_{}.{}", self.stem, index, self.ext))
    }

    /// `<stem>.<ext>`
    pub fn combined(&self) -> PathBuf {
        self.dir.join(format!("{}.{}", self.stem, self.ext))
    }

    /// `<stem>.mp4`
    pub fn video(&self) -> PathBuf {
        self.dir.join(format!("{}.mp4", self.stem))
    }

    /// Concat manifest, removed once assembly returns.
    pub fn manifest(&self) -> PathBuf {
        self.dir.join(format!("{}_concat.txt", self.stem))
    }
}

/// One synthesized audio file for one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisArtifact {
    /// 1-based batch index.
    pub index: usize,
    pub path: PathBuf,
    pub bytes: u64,
}
