use crate::error::{PipelineError, Result};
use crate::process::CommandRunner;
use std::path::Path;
use tracing::{error, info};

/// Output settings for the waveform video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSettings {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    /// Waveform line color, `#RRGGBB`.
    pub wave_color: String,
    /// Background color, `#RRGGBB`.
    pub background_color: String,
    pub video_codec: String,
    pub preset: String,
    pub threads: u32,
    pub audio_codec: String,
    pub audio_bitrate: String,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            fps: 24,
            wave_color: "#4682B4".to_string(),
            background_color: "#1E1E1E".to_string(),
            video_codec: "libx264".to_string(),
            preset: "medium".to_string(),
            threads: 4,
            audio_codec: "aac".to_string(),
            audio_bitrate: "192k".to_string(),
        }
    }
}

/// ffmpeg color syntax: `#4682B4` becomes `0x4682B4`.
fn ffmpeg_color(color: &str) -> String {
    match color.strip_prefix('#') {
        Some(hex) => format!("0x{}", hex),
        None => color.to_string(),
    }
}

impl RenderSettings {
    /// Line waveform drawn over a solid background, ending with the audio.
    pub fn filter_graph(&self) -> String {
        let size = format!("{}x{}", self.width, self.height);
        format!(
            "color=c={bg}:s={size}:r={fps}[bg];\
             [0:a]showwaves=s={size}:mode=line:rate={fps}:colors={wave}[waves];\
             [bg][waves]overlay=shortest=1,format=yuv420p[v]",
            bg = ffmpeg_color(&self.background_color),
            wave = ffmpeg_color(&self.wave_color),
            size = size,
            fps = self.fps,
        )
    }

    pub fn ffmpeg_args(&self, audio: &Path, video: &Path) -> Vec<String> {
        vec![
            "-y".into(),
            "-i".into(),
            audio.display().to_string(),
            "-filter_complex".into(),
            self.filter_graph(),
            "-map".into(),
            "[v]".into(),
            "-map".into(),
            "0:a".into(),
            "-c:v".into(),
            self.video_codec.clone(),
            "-preset".into(),
            self.preset.clone(),
            "-threads".into(),
            self.threads.to_string(),
            "-r".into(),
            self.fps.to_string(),
            "-c:a".into(),
            self.audio_codec.clone(),
            "-b:a".into(),
            self.audio_bitrate.clone(),
            "-shortest".into(),
            video.display().to_string(),
        ]
    }
}

/// Hands the combined track to ffmpeg to draw the waveform video.
pub struct WaveformRenderer<'a> {
    runner: &'a dyn CommandRunner,
    ffmpeg: String,
    settings: RenderSettings,
}

impl<'a> WaveformRenderer<'a> {
    pub fn new(runner: &'a dyn CommandRunner, ffmpeg: impl Into<String>, settings: RenderSettings) -> Self {
        Self {
            runner,
            ffmpeg: ffmpeg.into(),
            settings,
        }
    }

    pub fn render(&self, audio: &Path, video: &Path) -> Result<()> {
        if !audio.is_file() {
            return Err(PipelineError::Render(format!(
                "audio file {} not found",
                audio.display()
            )));
        }

        info!("Rendering waveform video {}", video.display());
        let args = self.settings.ffmpeg_args(audio, video);
        self.runner.run(&self.ffmpeg, &args).map_err(|e| {
            error!("ffmpeg failed to produce waveform video");
            PipelineError::Render(e.to_string())
        })?;

        info!("Video written to {}", video.display());
        Ok(())
    }
}
