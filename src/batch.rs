use crate::error::{PipelineError, Result};
use tracing::info;

pub const DEFAULT_GROUP_SIZE: usize = 2;

/// A contiguous run of paragraphs synthesized in one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    /// 1-based position of this batch in the article.
    pub index: usize,
    pub paragraphs: Vec<String>,
}

impl Batch {
    /// Request payload text: paragraphs joined by a single space.
    pub fn text(&self) -> String {
        self.paragraphs.join(" ")
    }
}

/// Partition `paragraphs` into groups of `group_size`, preserving order.
/// Only the last group may be shorter.
pub fn batch(paragraphs: &[String], group_size: usize) -> Result<Vec<Batch>> {
    if group_size == 0 {
        return Err(PipelineError::InvalidConfiguration(
            "group size must be at least 1".to_string(),
        ));
    }

    let batches: Vec<Batch> = paragraphs
        .chunks(group_size)
        .enumerate()
        .map(|(i, chunk)| Batch {
            index: i + 1,
            paragraphs: chunk.to_vec(),
        })
        .collect();

    info!(
        "Split {} paragraphs into {} batches of up to {}",
        paragraphs.len(),
        batches.len(),
        group_size
    );
    Ok(batches)
}
