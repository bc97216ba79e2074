use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Config;
use crate::extractors::{Ffmpeg, SubtitleArtifact, VideoId, YtDlp};
use crate::files::{FileManager, FileStore, LocalFileStore};
use crate::output::ExtractionResult;
use crate::process::{CommandRunner, TokioCommandRunner};
use crate::utils;
use crate::TranscriptError;

pub mod converter;
pub mod processor;

pub use converter::{ConvertedText, TextConverter};

/// A single extraction request as received from the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionRequest {
    /// Video reference, usually a YouTube URL
    pub url: String,

    /// Keep `<video_id>.txt` in the download directory
    #[serde(default = "default_save_to_file")]
    pub save_to_file: bool,
}

fn default_save_to_file() -> bool {
    true
}

impl ExtractionRequest {
    pub fn new(url: impl Into<String>, save_to_file: bool) -> Self {
        Self {
            url: url.into(),
            save_to_file,
        }
    }
}

/// Successfully extracted transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    pub video_id: VideoId,
    pub text: String,

    /// Where the text was written, if it was saved
    pub saved_path: Option<PathBuf>,
}

/// Pipeline stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    CheckingDeps,
    ResolvingId,
    FetchingSubs,
    Converting,
    Finalizing,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::CheckingDeps => write!(f, "checking-deps"),
            Stage::ResolvingId => write!(f, "resolving-id"),
            Stage::FetchingSubs => write!(f, "fetching-subs"),
            Stage::Converting => write!(f, "converting"),
            Stage::Finalizing => write!(f, "finalizing"),
        }
    }
}

/// Main transcript extraction pipeline
pub struct TranscriptPipeline {
    download_dir: PathBuf,
    required_tools: Vec<String>,
    runner: Arc<dyn CommandRunner>,
    files: FileManager,
    yt_dlp: YtDlp,
    converter: TextConverter,
}

impl TranscriptPipeline {
    /// Create a pipeline that launches real processes and touches the real filesystem
    pub fn new(config: &Config) -> Self {
        Self::with_collaborators(
            config,
            Arc::new(TokioCommandRunner::new()),
            Arc::new(LocalFileStore),
        )
    }

    /// Create a pipeline over explicit process and filesystem capabilities
    pub fn with_collaborators(
        config: &Config,
        runner: Arc<dyn CommandRunner>,
        store: Arc<dyn FileStore>,
    ) -> Self {
        let files = FileManager::new(store);
        let tools = &config.tools;

        Self {
            download_dir: config.downloads_path(),
            required_tools: vec![tools.yt_dlp.clone(), tools.ffmpeg.clone()],
            yt_dlp: YtDlp::new(
                tools.yt_dlp.clone(),
                tools.cookies_from_browser.clone(),
                runner.clone(),
            ),
            converter: TextConverter::new(
                Ffmpeg::new(tools.ffmpeg.clone(), runner.clone()),
                files.clone(),
            ),
            runner,
            files,
        }
    }

    /// Run the pipeline and render the outcome as a result envelope
    pub async fn run(&self, request: &ExtractionRequest) -> ExtractionResult {
        match self.extract(request).await {
            Ok(transcript) => ExtractionResult::from_transcript(&transcript),
            Err(e) => {
                tracing::warn!("Transcript extraction failed: {}", e);
                ExtractionResult::failure(&e)
            }
        }
    }

    /// Extract the transcript for `request.url`
    pub async fn extract(&self, request: &ExtractionRequest) -> Result<Transcript, TranscriptError> {
        tracing::info!(stage = %Stage::CheckingDeps, "Starting transcript extraction for: {}", request.url);
        utils::check_dependencies(&*self.runner, &self.required_tools)?;

        self.files.ensure_dir(&self.download_dir)?;

        tracing::info!(stage = %Stage::ResolvingId, "Resolving video id");
        let video_id = self.yt_dlp.resolve_video_id(&request.url).await?;

        let result = self.extract_resolved(request, &video_id).await;

        // Unsaved requests never leave a transcript behind, even a stale one
        if !request.save_to_file {
            let final_text = SubtitleArtifact::final_text(&self.download_dir, &video_id);
            self.files.remove_if_exists(&final_text.path);
        }

        result
    }

    async fn extract_resolved(
        &self,
        request: &ExtractionRequest,
        video_id: &VideoId,
    ) -> Result<Transcript, TranscriptError> {
        tracing::info!(stage = %Stage::FetchingSubs, video_id = %video_id, "Downloading subtitles");
        let markup = self
            .yt_dlp
            .fetch_subtitles(&request.url, video_id, &self.download_dir, &self.files)
            .await?;

        tracing::info!(stage = %Stage::Converting, video_id = %video_id, "Converting subtitles to text");
        let converted = self
            .converter
            .convert(&markup, video_id, &self.download_dir)
            .await?;

        tracing::info!(stage = %Stage::Finalizing, video_id = %video_id, "Finalizing transcript");
        let saved_path = if request.save_to_file {
            self.files.persist(&converted.final_text.path, &converted.text)?;
            Some(converted.final_text.path)
        } else {
            None
        };

        Ok(Transcript {
            video_id: video_id.clone(),
            text: converted.text,
            saved_path,
        })
    }
}
