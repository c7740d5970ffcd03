//! Turn an HTML article into a narrated waveform video.
//!
//! The pipeline extracts the `<h1>` title and `<p>` paragraphs, groups the
//! paragraphs into fixed-size batches, synthesizes one audio part per batch
//! through a remote TTS service, joins the parts with ffmpeg's concat demuxer
//! and renders a waveform video from the combined track.
//!
//! Every artifact is named after the sanitized title, so a run in the same
//! directory produces `<title>_1.mp3 … <title>_N.mp3`, `<title>.mp3` and
//! `<title>.mp4`.

pub mod args;
pub mod artifact;
pub mod assemble;
pub mod audio;
pub mod batch;
pub mod config;
pub mod error;
pub mod extract;
pub mod pipeline;
pub mod process;
pub mod render;
pub mod synthesis;
pub mod tts;
pub mod utils;

pub use config::Config;
pub use error::{PipelineError, SynthesisFailure};
pub use pipeline::{Pipeline, RunReport};
