use crate::error::CommandFailure;
use std::process::{Command, Stdio};
use tracing::debug;

/// Lines of stderr kept as the failure diagnostic.
const DIAGNOSTIC_LINES: usize = 5;

/// Runs an external program to completion.
pub trait CommandRunner: Send + Sync {
    fn run(&self, program: &str, args: &[String]) -> Result<(), CommandFailure>;
}

/// Spawns real processes, capturing stderr for diagnostics.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<(), CommandFailure> {
        debug!("Running {} {}", program, args.join(" "));
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| CommandFailure {
                program: program.to_string(),
                status: None,
                diagnostic: e.to_string(),
            })?;

        if output.status.success() {
            return Ok(());
        }
        Err(CommandFailure {
            program: program.to_string(),
            status: output.status.code(),
            diagnostic: tail(&String::from_utf8_lossy(&output.stderr), DIAGNOSTIC_LINES),
        })
    }
}

fn tail(text: &str, lines: usize) -> String {
    let kept: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    kept[kept.len().saturating_sub(lines)..].join("\n")
}
