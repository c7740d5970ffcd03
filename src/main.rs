use article_narrator::args::Args;
use article_narrator::config::{Config, api_key_from_env};
use article_narrator::process::SystemRunner;
use article_narrator::tts::HttpSynthesizer;
use article_narrator::{Pipeline, PipelineError};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    info!("Starting narration pipeline for {}", args.input.display());

    if let Err(e) = run(&args).await {
        let message = failure_message(&e);
        error!("{}", message);
        eprintln!("error: {}", message);
        std::process::exit(1);
    }
    Ok(())
}

async fn run(args: &Args) -> Result<(), PipelineError> {
    let config = Config::new(args, api_key_from_env())?;

    let synthesizer = HttpSynthesizer::new(
        config.endpoint.clone(),
        config.api_key.clone(),
        config.profile.clone(),
        config.template.clone(),
        config.timeout,
    )
    .map_err(|e| PipelineError::InvalidConfiguration(format!("cannot build HTTP client: {}", e)))?;

    let pipeline = Pipeline::new(config, Box::new(synthesizer), Box::new(SystemRunner));
    let report = pipeline.run(&args.input).await?;

    if args.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => error!("Could not serialize run report: {}", e),
        }
    } else {
        println!("{}", report.video.display());
    }
    Ok(())
}

/// Stage and cause, printed even when logging is filtered out.
fn failure_message(err: &PipelineError) -> String {
    format!("{} stage failed: {}", err.stage(), err)
}
