use crate::artifact::{ArtifactLayout, SynthesisArtifact};
use crate::audio::check_wav_compatible;
use crate::error::{PipelineError, Result};
use crate::process::CommandRunner;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Joins synthesized parts into one track with ffmpeg's concat demuxer,
/// copying streams without re-encoding.
pub struct Assembler<'a> {
    runner: &'a dyn CommandRunner,
    ffmpeg: String,
}

impl<'a> Assembler<'a> {
    pub fn new(runner: &'a dyn CommandRunner, ffmpeg: impl Into<String>) -> Self {
        Self {
            runner,
            ffmpeg: ffmpeg.into(),
        }
    }

    /// Concatenate `artifacts` in index order into `layout.combined()`,
    /// overwriting any existing file there.
    pub fn assemble(
        &self,
        artifacts: &[SynthesisArtifact],
        layout: &ArtifactLayout,
    ) -> Result<PathBuf> {
        let ordered = ordered_parts(artifacts)?;

        for path in &ordered {
            if !path.is_file() {
                return Err(PipelineError::Concatenation(format!(
                    "missing audio part {}",
                    path.display()
                )));
            }
        }
        if layout.ext().eq_ignore_ascii_case("wav") {
            check_wav_compatible(ordered.iter().map(PathBuf::as_path))
                .map_err(|e| PipelineError::Concatenation(format!("incompatible parts: {}", e)))?;
        }

        let manifest = Manifest::write(layout.manifest(), &ordered)?;
        let combined = layout.combined();
        info!(
            "Concatenating {} parts into {}",
            ordered.len(),
            combined.display()
        );

        let args = concat_args(manifest.path(), &combined);
        self.runner.run(&self.ffmpeg, &args).map_err(|e| {
            error!("ffmpeg failed to concatenate audio parts");
            PipelineError::Concatenation(e.to_string())
        })?;

        info!("Combined audio written to {}", combined.display());
        Ok(combined)
    }
}

/// Part paths sorted by batch index. Indices must run 1..=N with no gaps.
fn ordered_parts(artifacts: &[SynthesisArtifact]) -> Result<Vec<PathBuf>> {
    if artifacts.is_empty() {
        return Err(PipelineError::Concatenation("no audio parts to join".to_string()));
    }
    let mut sorted: Vec<&SynthesisArtifact> = artifacts.iter().collect();
    sorted.sort_by_key(|a| a.index);
    for (expected, artifact) in (1..).zip(&sorted) {
        if artifact.index != expected {
            return Err(PipelineError::Concatenation(format!(
                "expected part {} but found part {}",
                expected, artifact.index
            )));
        }
    }
    Ok(sorted.into_iter().map(|a| a.path.clone()).collect())
}

pub fn concat_args(manifest: &Path, output: &Path) -> Vec<String> {
    vec![
        "-y".into(),
        "-f".into(),
        "concat".into(),
        "-safe".into(),
        "0".into(),
        "-i".into(),
        manifest.display().to_string(),
        "-c".into(),
        "copy".into(),
        output.display().to_string(),
    ]
}

/// Manifest body in concat-demuxer syntax, one `file` line per part.
pub fn manifest_body(parts: &[PathBuf]) -> String {
    parts
        .iter()
        .map(|p| {
            let absolute = fs::canonicalize(p).unwrap_or_else(|_| p.clone());
            format!("file '{}'\n", escape_quotes(&absolute.display().to_string()))
        })
        .collect()
}

fn escape_quotes(path: &str) -> String {
    path.replace('\'', r"'\''")
}

/// Concat manifest on disk, removed when dropped.
struct Manifest {
    path: PathBuf,
}

impl Manifest {
    fn write(path: PathBuf, parts: &[PathBuf]) -> Result<Self> {
        fs::write(&path, manifest_body(parts)).map_err(|e| PipelineError::io(&path, e))?;
        debug!("Wrote concat manifest {}", path.display());
        Ok(Self { path })
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for Manifest {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            warn!("Could not remove manifest {}: {}", self.path.display(), e);
        }
    }
}
