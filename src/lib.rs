//! yt-subs-mcp - Extract clean transcripts from YouTube caption tracks
//!
//! This library resolves a video reference to its identifier with yt-dlp, downloads the
//! English caption track, converts it to plain deduplicated text with ffmpeg and exposes
//! the whole pipeline as a Model Context Protocol tool over stdio.

use std::path::PathBuf;

pub mod cli;
pub mod config;
pub mod extractors;
pub mod files;
pub mod output;
pub mod process;
pub mod server;
pub mod transcribe;
pub mod utils;

pub use cli::{Cli, Commands};
pub use config::Config;
pub use extractors::{ArtifactKind, SubtitleArtifact, VideoId};
pub use output::ExtractionResult;
pub use transcribe::{ExtractionRequest, Transcript, TranscriptPipeline};

/// Result type used at the edges of the application (CLI, config, transport)
pub type Result<T> = anyhow::Result<T>;

/// Error types produced by the extraction pipeline
#[derive(thiserror::Error, Debug)]
pub enum TranscriptError {
    #[error("Missing required dependencies: {}. Please install them before using this tool.", join_names(.0))]
    MissingDependencies(Vec<String>),

    #[error("Failed to get video ID for {reference}: {detail}")]
    IdentifierResolution { reference: String, detail: String },

    #[error("{}", subtitle_failure_message(.video_id, .tool_output))]
    SubtitleUnavailable {
        video_id: String,
        tool_output: Option<String>,
    },

    #[error("Failed to convert subtitles to text: {0}")]
    Conversion(String),

    #[error("File operation failed on {}: {source}", display_path(.path))]
    FileSystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TranscriptError {
    pub(crate) fn file_system(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TranscriptError::FileSystem {
            path: path.into(),
            source,
        }
    }
}

fn join_names(names: &[String]) -> String {
    names.join(", ")
}

fn display_path(path: &std::path::Path) -> std::path::Display<'_> {
    path.display()
}

fn subtitle_failure_message(video_id: &str, tool_output: &Option<String>) -> String {
    match tool_output {
        Some(output) => format!(
            "Failed to download English subtitles for video {}: {}",
            video_id, output
        ),
        None => format!(
            "No English subtitles available for video {}. The video has neither manual nor auto-generated English captions.",
            video_id
        ),
    }
}
