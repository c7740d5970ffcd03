use crate::args::Args;
use crate::error::{PipelineError, Result};
use crate::render::RenderSettings;
use crate::tts::{RequestTemplate, SynthesisProfile};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Environment variables checked, in order, for the TTS credential.
pub const API_KEY_VARS: [&str; 2] = ["TTS_API_KEY", "OPENAI_API_KEY"];

/// Validated settings for one run.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub endpoint: String,
    pub group_size: usize,
    pub profile: SynthesisProfile,
    pub template: RequestTemplate,
    pub out_dir: PathBuf,
    pub timeout: Option<Duration>,
    pub concurrency: usize,
    pub resume: bool,
    pub clean_parts: bool,
    pub ffmpeg: String,
    pub render: RenderSettings,
}

impl Config {
    /// Build a config from CLI arguments and an injected credential.
    ///
    /// Every check here runs before any remote call is made.
    pub fn new(args: &Args, api_key: Option<String>) -> Result<Self> {
        let invalid = |msg: String| Err(PipelineError::InvalidConfiguration(msg));

        let api_key = match api_key.map(|k| k.trim().to_string()) {
            Some(key) if !key.is_empty() => key,
            _ => return invalid(format!("missing TTS credential (set {})", API_KEY_VARS.join(" or "))),
        };
        if args.group_size == 0 {
            return invalid("group size must be at least 1".to_string());
        }
        if args.concurrency == 0 {
            return invalid("concurrency must be at least 1".to_string());
        }
        if args.model.trim().is_empty() {
            return invalid("synthesis model must not be empty".to_string());
        }
        let format = args.format.to_ascii_lowercase();
        if format.is_empty() || !format.chars().all(|c| c.is_ascii_alphanumeric()) {
            return invalid(format!("audio format {:?} is not a valid file extension", args.format));
        }
        if format == "mp4" {
            return invalid("audio format mp4 would share its path with the video".to_string());
        }
        if args.width == 0 || args.height == 0 || args.fps == 0 {
            return invalid("video width, height and fps must be positive".to_string());
        }

        let template = match &args.request_template {
            Some(path) => {
                let raw = fs::read_to_string(path).map_err(|e| {
                    PipelineError::InvalidConfiguration(format!(
                        "cannot read request template {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                RequestTemplate::parse(&raw).map_err(|e| {
                    PipelineError::InvalidConfiguration(format!(
                        "request template {} is not valid JSON: {}",
                        path.display(),
                        e
                    ))
                })?
            }
            None => RequestTemplate::default(),
        };

        Ok(Self {
            api_key,
            endpoint: args.endpoint.clone(),
            group_size: args.group_size,
            profile: SynthesisProfile {
                model: args.model.clone(),
                voice: args.voice.clone(),
                format,
            },
            template,
            out_dir: args.out_dir.clone(),
            timeout: args.timeout_secs.map(Duration::from_secs),
            concurrency: args.concurrency,
            resume: args.resume,
            clean_parts: args.clean_parts,
            ffmpeg: args.ffmpeg.clone(),
            render: RenderSettings {
                width: args.width,
                height: args.height,
                fps: args.fps,
                wave_color: args.wave_color.clone(),
                background_color: args.background_color.clone(),
                ..RenderSettings::default()
            },
        })
    }
}

/// Credential from the process environment, honoring a `.env` file.
pub fn api_key_from_env() -> Option<String> {
    dotenvy::dotenv().ok();
    API_KEY_VARS.iter().find_map(|var| env::var(var).ok())
}
