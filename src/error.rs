use std::fmt;
use std::path::PathBuf;

/// Failure of a single remote synthesis call.
#[derive(Debug, thiserror::Error)]
pub enum SynthesisFailure {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("authentication rejected ({status}): {body}")]
    Authentication { status: u16, body: String },
    #[error("rate limited: {body}")]
    RateLimited { body: String },
    #[error("service returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("could not persist audio: {0}")]
    Persist(#[from] std::io::Error),
}

impl SynthesisFailure {
    /// Classify a non-success HTTP status into the matching failure.
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 | 403 => Self::Authentication { status, body },
            429 => Self::RateLimited { body },
            _ => Self::Status { status, body },
        }
    }
}

/// An external process that could not be started or exited unsuccessfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFailure {
    pub program: String,
    pub status: Option<i32>,
    pub diagnostic: String,
}

impl fmt::Display for CommandFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(code) => write!(f, "{} exited with status {}", self.program, code)?,
            None => write!(f, "{} did not run to completion", self.program)?,
        }
        if !self.diagnostic.is_empty() {
            write!(f, ": {}", self.diagnostic)?;
        }
        Ok(())
    }
}

impl std::error::Error for CommandFailure {}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("no paragraph elements found in {source_name}")]
    EmptyContent { source_name: String },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("synthesis failed for batch {batch_index}: {cause}")]
    Synthesis {
        batch_index: usize,
        #[source]
        cause: SynthesisFailure,
    },

    #[error("concatenation failed: {0}")]
    Concatenation(String),

    #[error("render failed: {0}")]
    Render(String),

    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Name of the stage that raised this error, for the failure report.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::EmptyContent { .. } => "extract",
            Self::InvalidConfiguration(_) => "configure",
            Self::Synthesis { .. } => "synthesize",
            Self::Concatenation(_) => "concatenate",
            Self::Render(_) => "render",
            Self::Io { .. } => "io",
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_classification() {
        assert!(matches!(
            SynthesisFailure::from_status(401, "nope".into()),
            SynthesisFailure::Authentication { status: 401, .. }
        ));
        assert!(matches!(
            SynthesisFailure::from_status(429, String::new()),
            SynthesisFailure::RateLimited { .. }
        ));
        assert!(matches!(
            SynthesisFailure::from_status(500, "boom".into()),
            SynthesisFailure::Status { status: 500, .. }
        ));
    }

    #[test]
    fn synthesis_error_names_batch_index() {
        let err = PipelineError::Synthesis {
            batch_index: 2,
            cause: SynthesisFailure::from_status(500, "boom".into()),
        };
        assert_eq!(err.stage(), "synthesize");
        assert_eq!(
            err.to_string(),
            "synthesis failed for batch 2: service returned 500: boom"
        );
    }

    #[test]
    fn command_failure_display_includes_diagnostic() {
        let failure = CommandFailure {
            program: "ffmpeg".into(),
            status: Some(1),
            diagnostic: "Invalid data found".into(),
        };
        assert_eq!(
            failure.to_string(),
            "ffmpeg exited with status 1: Invalid data found"
        );
    }
}
