use crate::artifact::{ArtifactLayout, SynthesisArtifact};
use crate::batch::Batch;
use crate::error::{PipelineError, Result, SynthesisFailure};
use crate::tts::SpeechSynthesizer;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::fs;
use tracing::{error, info};

/// Turns batches into on-disk audio parts, one remote call per batch.
pub struct SynthesisStage<'a> {
    synthesizer: &'a dyn SpeechSynthesizer,
    layout: &'a ArtifactLayout,
    concurrency: usize,
    resume: bool,
}

impl<'a> SynthesisStage<'a> {
    pub fn new(synthesizer: &'a dyn SpeechSynthesizer, layout: &'a ArtifactLayout) -> Self {
        Self {
            synthesizer,
            layout,
            concurrency: 1,
            resume: false,
        }
    }

    /// Allow up to `n` requests in flight. 1 keeps strict sequential order.
    pub fn concurrency(mut self, n: usize) -> Self {
        self.concurrency = n.max(1);
        self
    }

    /// Reuse parts left on disk by an earlier run.
    pub fn resume(mut self, resume: bool) -> Self {
        self.resume = resume;
        self
    }

    /// Synthesize every batch. The returned artifacts are ordered by index.
    ///
    /// The first failing batch aborts the stage; parts already written stay
    /// on disk.
    pub async fn run(&self, batches: &[Batch]) -> Result<Vec<SynthesisArtifact>> {
        let total = batches.len();
        let mut artifacts = if self.concurrency == 1 {
            let mut artifacts = Vec::with_capacity(total);
            for batch in batches {
                artifacts.push(self.synthesize_one(batch, total).await?);
            }
            artifacts
        } else {
            stream::iter(batches)
                .map(|batch| self.synthesize_one(batch, total))
                .buffered(self.concurrency)
                .try_collect::<Vec<_>>()
                .await?
        };
        artifacts.sort_by_key(|a| a.index);
        Ok(artifacts)
    }

    async fn synthesize_one(&self, batch: &Batch, total: usize) -> Result<SynthesisArtifact> {
        let path = self.layout.part(batch.index);

        if self.resume {
            if let Ok(meta) = fs::metadata(&path) {
                if meta.is_file() && meta.len() > 0 {
                    info!(
                        batch_index = batch.index,
                        path = %path.display(),
                        "Reusing existing part {}/{}",
                        batch.index,
                        total
                    );
                    return Ok(SynthesisArtifact {
                        index: batch.index,
                        path,
                        bytes: meta.len(),
                    });
                }
            }
        }

        let text = batch.text();
        info!(
            batch_index = batch.index,
            text_length = text.len(),
            "Synthesizing batch {}/{}",
            batch.index,
            total
        );

        let fail = |cause: SynthesisFailure| {
            error!(batch_index = batch.index, "Synthesis failed: {}", cause);
            PipelineError::Synthesis {
                batch_index: batch.index,
                cause,
            }
        };

        let audio = self.synthesizer.synthesize(&text).await.map_err(fail)?;
        fs::write(&path, &audio).map_err(|e| fail(SynthesisFailure::Persist(e)))?;

        info!(
            batch_index = batch.index,
            path = %path.display(),
            audio_size = audio.len(),
            "Wrote part {}/{}",
            batch.index,
            total
        );
        Ok(SynthesisArtifact {
            index: batch.index,
            path,
            bytes: audio.len() as u64,
        })
    }
}
