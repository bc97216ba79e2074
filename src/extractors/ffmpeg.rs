use std::sync::Arc;

use super::{ArtifactKind, SubtitleArtifact};
use crate::process::CommandRunner;
use crate::TranscriptError;

/// Caption transcoding using ffmpeg
pub struct Ffmpeg {
    ffmpeg_path: String,
    runner: Arc<dyn CommandRunner>,
}

impl Ffmpeg {
    pub fn new(ffmpeg_path: impl Into<String>, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
            runner,
        }
    }

    /// Convert a WebVTT caption file to SRT, overwriting `target`
    pub async fn convert_to_srt(
        &self,
        source: &SubtitleArtifact,
        target: &SubtitleArtifact,
    ) -> Result<(), TranscriptError> {
        debug_assert_eq!(source.kind, ArtifactKind::RawMarkup);
        debug_assert_eq!(target.kind, ArtifactKind::IntermediateCaption);

        tracing::debug!(
            "Converting {} to {}",
            source.path.display(),
            target.path.display()
        );

        let args = vec![
            "-nostdin".to_string(),
            "-y".to_string(), // Overwrite output file
            "-loglevel".to_string(),
            "error".to_string(),
            "-i".to_string(),
            source.path.to_string_lossy().into_owned(),
            "-f".to_string(),
            "srt".to_string(),
            target.path.to_string_lossy().into_owned(),
        ];

        let output = self
            .runner
            .run(&self.ffmpeg_path, &args)
            .await
            .map_err(|e| {
                TranscriptError::Conversion(format!("could not run {}: {}", self.ffmpeg_path, e))
            })?;

        if !output.success {
            return Err(TranscriptError::Conversion(format!(
                "ffmpeg failed: {}",
                output.failure_detail()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::VideoId;
    use crate::process::{CommandOutput, MockCommandRunner};
    use std::path::Path;

    fn artifacts() -> (SubtitleArtifact, SubtitleArtifact) {
        let dir = Path::new("/dl");
        let id = VideoId::parse("abc").unwrap();
        (
            SubtitleArtifact::raw_markup(dir, &id),
            SubtitleArtifact::intermediate_caption(dir, &id),
        )
    }

    #[tokio::test]
    async fn test_convert_builds_argument_list() {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .withf(|program, args| {
                program == "ffmpeg"
                    && args.windows(2).any(|w| w[0] == "-i" && w[1] == "/dl/abc.en.vtt")
                    && args.windows(2).any(|w| w[0] == "-f" && w[1] == "srt")
                    && args.last().map(String::as_str) == Some("/dl/abc.srt")
            })
            .times(1)
            .returning(|_, _| Ok(CommandOutput::ok("")));

        let (vtt, srt) = artifacts();
        let ffmpeg = Ffmpeg::new("ffmpeg", Arc::new(runner));
        tokio_test::assert_ok!(ffmpeg.convert_to_srt(&vtt, &srt).await);
    }

    #[tokio::test]
    async fn test_convert_failure_is_conversion_error() {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .returning(|_, _| Ok(CommandOutput::failed(1, "Invalid data found when processing input")));

        let (vtt, srt) = artifacts();
        let err = Ffmpeg::new("ffmpeg", Arc::new(runner))
            .convert_to_srt(&vtt, &srt)
            .await
            .unwrap_err();

        assert!(matches!(err, TranscriptError::Conversion(_)));
        assert!(err.to_string().contains("Invalid data found"));
    }
}
