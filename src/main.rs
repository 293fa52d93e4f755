use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use youtube_summarizer::config::{read_config, DEFAULT_CONFIG_PATH};
use youtube_summarizer::display::{wrap_text, DEFAULT_WRAP_WIDTH};
use youtube_summarizer::{DefaultVideoSummarizer, SummarizerError};

/// Longest URL the prompt accepts.
const MAX_URL_CHARS: usize = 75;

#[derive(Debug, Parser)]
#[command(name = "youtube_summarizer", about = "Summarize a YouTube video from its transcript")]
struct Cli {
    /// YouTube video URL; prompted for when omitted
    url: Option<String>,

    /// Path to the JSON config file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Column width for the printed summary
    #[arg(long, default_value_t = DEFAULT_WRAP_WIDTH)]
    width: usize,

    /// Print the full result as JSON
    #[arg(long)]
    json: bool,
}

fn read_url(cli_url: Option<String>) -> Result<String> {
    let youtube_url = match cli_url {
        Some(url) => url,
        None => {
            print!("Enter YouTube video URL: ");
            io::stdout().flush()?;
            let mut line = String::new();
            io::stdin().read_line(&mut line)?;
            line
        }
    };
    Ok(youtube_url.trim().to_string())
}

fn run(cli: Cli) -> Result<()> {
    let config = read_config(&cli.config)
        .with_context(|| format!("Failed to read config at {}", cli.config.display()))?;
    let summarizer = DefaultVideoSummarizer::from_config(config);

    let youtube_url = read_url(cli.url)?;
    if youtube_url.chars().count() > MAX_URL_CHARS {
        return Err(SummarizerError::invalid_input(format!(
            "Video URL must be at most {MAX_URL_CHARS} characters."
        ))
        .into());
    }

    let result = summarizer.process_video(&youtube_url)?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("\nAnswer:");
        println!("{}", "-".repeat(cli.width.min(50)));
        println!("{}", wrap_text(&result.summary, cli.width));
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            let kind = error
                .downcast_ref::<SummarizerError>()
                .map_or("EXTERNAL_FAILURE", SummarizerError::kind);
            eprintln!("Error [{kind}]: {error:#}");
            ExitCode::FAILURE
        }
    }
}
