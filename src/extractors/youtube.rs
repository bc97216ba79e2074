use std::path::Path;
use std::sync::Arc;

use super::{SubtitleArtifact, VideoId, MARKUP_EXTENSION, SUBTITLE_LANGUAGE};
use crate::files::FileManager;
use crate::process::CommandRunner;
use crate::TranscriptError;

/// Video identifier resolution and caption download using yt-dlp
pub struct YtDlp {
    yt_dlp_path: String,
    cookies_from_browser: Option<String>,
    runner: Arc<dyn CommandRunner>,
}

impl YtDlp {
    pub fn new(
        yt_dlp_path: impl Into<String>,
        cookies_from_browser: Option<String>,
        runner: Arc<dyn CommandRunner>,
    ) -> Self {
        Self {
            yt_dlp_path: yt_dlp_path.into(),
            cookies_from_browser,
            runner,
        }
    }

    /// Options shared by every invocation
    fn base_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(browser) = &self.cookies_from_browser {
            args.push("--cookies-from-browser".to_string());
            args.push(browser.clone());
        }
        args.push("--no-playlist".to_string());
        args
    }

    /// Ask yt-dlp for the canonical video id of `reference`
    pub async fn resolve_video_id(&self, reference: &str) -> Result<VideoId, TranscriptError> {
        tracing::debug!("Resolving video id for: {}", reference);

        let resolution_error = |detail: String| TranscriptError::IdentifierResolution {
            reference: reference.to_string(),
            detail,
        };

        let mut args = self.base_args();
        args.extend(["--print".to_string(), "id".to_string(), reference.to_string()]);

        let output = self
            .runner
            .run(&self.yt_dlp_path, &args)
            .await
            .map_err(|e| resolution_error(format!("could not run {}: {}", self.yt_dlp_path, e)))?;

        if !output.success {
            return Err(resolution_error(output.failure_detail()));
        }

        // yt-dlp can exit cleanly yet print nothing for malformed references
        VideoId::parse(&output.stdout)
            .ok_or_else(|| resolution_error("Could not extract video ID from URL".to_string()))
    }

    /// Download English captions (manual, else auto-generated) as WebVTT into `dir`
    pub async fn fetch_subtitles(
        &self,
        reference: &str,
        video_id: &VideoId,
        dir: &Path,
        files: &FileManager,
    ) -> Result<SubtitleArtifact, TranscriptError> {
        tracing::debug!("Downloading subtitles for {} into {}", video_id, dir.display());

        let template = dir.join(format!("{}.%(ext)s", video_id));
        let mut args = self.base_args();
        args.extend([
            "--write-subs".to_string(),
            "--write-auto-subs".to_string(),
            "--skip-download".to_string(),
            "--sub-langs".to_string(),
            SUBTITLE_LANGUAGE.to_string(),
            "--sub-format".to_string(),
            MARKUP_EXTENSION.to_string(),
            "-o".to_string(),
            template.to_string_lossy().into_owned(),
            reference.to_string(),
        ]);

        let output = self
            .runner
            .run(&self.yt_dlp_path, &args)
            .await
            .map_err(|e| TranscriptError::SubtitleUnavailable {
                video_id: video_id.to_string(),
                tool_output: Some(format!("could not run {}: {}", self.yt_dlp_path, e)),
            })?;

        if !output.success {
            return Err(TranscriptError::SubtitleUnavailable {
                video_id: video_id.to_string(),
                tool_output: Some(output.failure_detail()),
            });
        }

        // A clean exit is not proof: videos without captions produce no file
        let artifact = SubtitleArtifact::raw_markup(dir, video_id);
        if !files.exists(&artifact.path) {
            return Err(TranscriptError::SubtitleUnavailable {
                video_id: video_id.to_string(),
                tool_output: None,
            });
        }

        Ok(artifact)
    }
}
