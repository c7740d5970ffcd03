use crate::batch::DEFAULT_GROUP_SIZE;
use crate::tts::DEFAULT_ENDPOINT;
use clap::Parser;
use std::path::PathBuf;

/// Narrate an HTML article and render it as a waveform video.
#[derive(Parser, Debug, Clone)]
#[clap(version)]
pub struct Args {
    /// HTML article to narrate
    pub input: PathBuf,

    /// Paragraphs per synthesis request
    #[clap(long, default_value_t = DEFAULT_GROUP_SIZE)]
    pub group_size: usize,

    #[clap(long, default_value = "tts-1")]
    pub model: String,

    #[clap(long, default_value = "alloy")]
    pub voice: String,

    /// Audio container requested from the service and used as file extension
    #[clap(long, default_value = "mp3")]
    pub format: String,

    #[clap(long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// JSON request body with {{text}}, {{model}}, {{voice}}, {{format}} placeholders
    #[clap(long)]
    pub request_template: Option<PathBuf>,

    /// Directory receiving every artifact of the run
    #[clap(long, default_value = ".")]
    pub out_dir: PathBuf,

    /// HTTP timeout per synthesis request
    #[clap(long)]
    pub timeout_secs: Option<u64>,

    /// Synthesis requests allowed in flight at once
    #[clap(long, default_value_t = 1)]
    pub concurrency: usize,

    /// Reuse parts already on disk from an earlier run
    #[clap(long)]
    pub resume: bool,

    /// Delete per-batch parts once the combined audio exists
    #[clap(long)]
    pub clean_parts: bool,

    #[clap(long, default_value = "ffmpeg")]
    pub ffmpeg: String,

    #[clap(long, default_value_t = 1280)]
    pub width: u32,

    #[clap(long, default_value_t = 720)]
    pub height: u32,

    #[clap(long, default_value_t = 24)]
    pub fps: u32,

    #[clap(long, default_value = "#4682B4")]
    pub wave_color: String,

    #[clap(long, default_value = "#1E1E1E")]
    pub background_color: String,

    /// Print the run report as JSON
    #[clap(long)]
    pub json: bool,

    #[clap(long, short)]
    pub verbose: bool,
}
