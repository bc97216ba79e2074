use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use yt_subs_mcp::cli::{Cli, Commands};
use yt_subs_mcp::config::Config;
use yt_subs_mcp::process::TokioCommandRunner;
use yt_subs_mcp::server::{self, McpServer};
use yt_subs_mcp::transcribe::{ExtractionRequest, TranscriptPipeline};
use yt_subs_mcp::utils;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize tracing; stdout belongs to the protocol, so logs go to stderr
    let default_filter = if cli.verbose {
        "yt_subs_mcp=debug"
    } else {
        "yt_subs_mcp=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match cli.selected_command() {
        // The file being initialized does not exist yet
        Commands::Config { init: true, .. } => Config::default(),
        _ => Config::load(cli.config.as_deref(), cli.download_dir.clone())?,
    };

    match cli.selected_command() {
        Commands::Serve => {
            let server = McpServer::new(TranscriptPipeline::new(&config));

            tracing::info!("YouTube Subtitles MCP server running on stdio");
            server
                .serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
                .await?;
        }
        Commands::Extract { url, no_save } => {
            let pipeline = TranscriptPipeline::new(&config);
            let request = ExtractionRequest::new(url.clone(), !no_save);

            let result = pipeline.run(&request).await;
            println!("{}", result.to_json()?);

            if !result.is_success() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Check => {
            let tools = [config.tools.yt_dlp.clone(), config.tools.ffmpeg.clone()];
            let missing = utils::missing_dependencies(&TokioCommandRunner::new(), &tools);

            for tool in &tools {
                let status = if missing.contains(tool) { "missing" } else { "found" };
                println!("  • {}: {}", tool, status);
            }

            if !missing.is_empty() {
                eprintln!("Missing required dependencies: {}", missing.join(", "));
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Tools => {
            println!("{}", serde_json::to_string_pretty(&server::tool_descriptor())?);
        }
        Commands::Config { show, init } => {
            if *init {
                let path = match cli.config.clone() {
                    Some(path) => path,
                    None => Config::default_config_path()
                        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?,
                };
                config.save(&path)?;
                println!("Configuration written to: {}", path.display());
            } else {
                config.display();
                if !*show {
                    if let Some(path) = Config::default_config_path() {
                        println!("Edit {} to change these settings.", path.display());
                    }
                }
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
