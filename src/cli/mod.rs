use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{CONFIG_PATH_ENV, DOWNLOAD_DIR_ENV};

#[derive(Parser)]
#[command(
    name = "yt-subs-mcp",
    about = "yt-subs-mcp - Extract clean transcripts from YouTube captions",
    version,
    long_about = "An MCP server exposing a get_youtube_transcript tool over stdio. Downloads English captions with yt-dlp, converts them with ffmpeg and returns plain, deduplicated text."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose logging (written to stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (YAML)
    #[arg(long, global = true, value_name = "FILE", env = CONFIG_PATH_ENV)]
    pub config: Option<PathBuf>,

    /// Directory for subtitle files and saved transcripts (default: ~/Downloads/yts)
    #[arg(long, global = true, value_name = "DIR", env = DOWNLOAD_DIR_ENV)]
    pub download_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the transcript tool over stdio (default)
    Serve,

    /// Extract a single transcript and print the result as JSON
    Extract {
        /// YouTube video URL
        #[arg(value_name = "URL")]
        url: String,

        /// Do not keep the transcript file in the download directory
        #[arg(long)]
        no_save: bool,
    },

    /// Check that yt-dlp and ffmpeg are installed
    Check,

    /// Print the tool descriptor advertised to clients
    Tools,

    /// Show or initialize the configuration
    Config {
        /// Show current configuration
        #[arg(short, long)]
        show: bool,

        /// Write a default configuration file
        #[arg(long, conflicts_with = "show")]
        init: bool,
    },
}

impl Cli {
    /// The selected command, `serve` when none was given
    pub fn selected_command(&self) -> &Commands {
        self.command.as_ref().unwrap_or(&Commands::Serve)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults_to_serve() {
        let cli = Cli::try_parse_from(["yt-subs-mcp"]).unwrap();
        assert!(matches!(cli.selected_command(), Commands::Serve));
    }

    #[test]
    fn test_extract_arguments() {
        let cli = Cli::try_parse_from([
            "yt-subs-mcp",
            "extract",
            "https://youtu.be/abc",
            "--no-save",
            "--download-dir",
            "/tmp/yts",
        ])
        .unwrap();

        assert_eq!(cli.download_dir, Some(PathBuf::from("/tmp/yts")));
        match cli.selected_command() {
            Commands::Extract { url, no_save } => {
                assert_eq!(url, "https://youtu.be/abc");
                assert!(*no_save);
            }
            _ => panic!("expected extract"),
        }
    }
}
