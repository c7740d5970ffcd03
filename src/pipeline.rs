use crate::artifact::ArtifactLayout;
use crate::assemble::Assembler;
use crate::audio::wav_duration_seconds;
use crate::batch::batch;
use crate::config::Config;
use crate::error::Result;
use crate::extract::extract_file;
use crate::process::CommandRunner;
use crate::render::WaveformRenderer;
use crate::synthesis::SynthesisStage;
use crate::tts::SpeechSynthesizer;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Files produced by a successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub title: String,
    pub sanitized_title: String,
    pub parts: Vec<PathBuf>,
    pub combined_audio: PathBuf,
    pub video: PathBuf,
}

/// Extract, batch, synthesize, assemble, render: one article in, one video out.
pub struct Pipeline {
    config: Config,
    synthesizer: Box<dyn SpeechSynthesizer>,
    runner: Box<dyn CommandRunner>,
}

impl Pipeline {
    pub fn new(
        config: Config,
        synthesizer: Box<dyn SpeechSynthesizer>,
        runner: Box<dyn CommandRunner>,
    ) -> Self {
        Self {
            config,
            synthesizer,
            runner,
        }
    }

    pub async fn run(&self, input: &Path) -> Result<RunReport> {
        let article = extract_file(input)?;
        let layout = ArtifactLayout::new(&self.config.out_dir, &article.title, &self.config.profile.format);
        info!(
            "Extraction done: \"{}\" ({} paragraphs), artifacts keyed by {}",
            article.title,
            article.paragraphs.len(),
            layout.stem()
        );

        let batches = batch(&article.paragraphs, self.config.group_size)?;

        let artifacts = SynthesisStage::new(self.synthesizer.as_ref(), &layout)
            .concurrency(self.config.concurrency)
            .resume(self.config.resume)
            .run(&batches)
            .await?;
        info!("Synthesized {} parts", artifacts.len());

        let combined = Assembler::new(self.runner.as_ref(), &self.config.ffmpeg).assemble(&artifacts, &layout)?;
        if layout.ext() == "wav" {
            if let Ok(seconds) = wav_duration_seconds(&combined) {
                info!("Combined audio duration: {:.2} seconds", seconds);
            }
        }

        let parts: Vec<PathBuf> = artifacts.into_iter().map(|a| a.path).collect();
        if self.config.clean_parts {
            for part in &parts {
                if let Err(e) = fs::remove_file(part) {
                    warn!("Could not remove part {}: {}", part.display(), e);
                }
            }
            info!("Removed {} parts", parts.len());
        }

        let video = layout.video();
        WaveformRenderer::new(self.runner.as_ref(), &self.config.ffmpeg, self.config.render.clone())
            .render(&combined, &video)?;

        info!("Process complete: {}", video.display());
        Ok(RunReport {
            title: article.title,
            sanitized_title: layout.stem().to_string(),
            parts,
            combined_audio: combined,
            video,
        })
    }
}
