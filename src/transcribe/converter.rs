use std::path::Path;

use super::processor;
use crate::extractors::{Ffmpeg, SubtitleArtifact, VideoId};
use crate::files::FileManager;
use crate::TranscriptError;

/// Caption markup to plain text conversion
pub struct TextConverter {
    ffmpeg: Ffmpeg,
    files: FileManager,
}

/// Converted transcript and where it would be saved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedText {
    pub text: String,
    pub final_text: SubtitleArtifact,
}

impl TextConverter {
    pub fn new(ffmpeg: Ffmpeg, files: FileManager) -> Self {
        Self { ffmpeg, files }
    }

    /// Transcode `markup` to SRT and derive deduplicated text from it.
    ///
    /// The SRT file and every `<id>.*.vtt` file are removed before returning,
    /// whether or not the conversion succeeded. The final text is not written.
    pub async fn convert(
        &self,
        markup: &SubtitleArtifact,
        video_id: &VideoId,
        dir: &Path,
    ) -> Result<ConvertedText, TranscriptError> {
        let srt = SubtitleArtifact::intermediate_caption(dir, video_id);

        let result = self.transcode_and_extract(markup, &srt).await;

        self.files.remove_if_exists(&srt.path);
        self.files.remove_raw_markup(dir, video_id);

        Ok(ConvertedText {
            text: result?,
            final_text: SubtitleArtifact::final_text(dir, video_id),
        })
    }

    async fn transcode_and_extract(
        &self,
        markup: &SubtitleArtifact,
        srt: &SubtitleArtifact,
    ) -> Result<String, TranscriptError> {
        self.ffmpeg.convert_to_srt(markup, srt).await?;

        let content = self.files.read(&srt.path).map_err(|e| {
            TranscriptError::Conversion(format!("could not read {}: {}", srt.path.display(), e))
        })?;

        Ok(processor::caption_text(&content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::files::memory::MemoryFileStore;
    use crate::files::FileStore;
    use crate::process::{CommandOutput, MockCommandRunner};
    use std::sync::Arc;

    const SRT: &str = "1\n00:00:00,000 --> 00:00:01,000\nhello\n\n2\n00:00:01,000 --> 00:00:02,000\nhello\nworld\n";

    fn setup(store: &Arc<MemoryFileStore>, runner: MockCommandRunner) -> TextConverter {
        store.create_dir_all(Path::new("/dl")).unwrap();
        store.write(Path::new("/dl/abc.en.vtt"), "WEBVTT").unwrap();
        store.write(Path::new("/dl/abc.en-orig.vtt"), "WEBVTT").unwrap();

        TextConverter::new(
            Ffmpeg::new("ffmpeg", Arc::new(runner)),
            FileManager::new(store.clone()),
        )
    }

    #[tokio::test]
    async fn test_convert_extracts_text_and_cleans_up() {
        let store = Arc::new(MemoryFileStore::new());
        let writer = store.clone();
        let mut runner = MockCommandRunner::new();
        runner.expect_run().returning(move |_, _| {
            writer.write(Path::new("/dl/abc.srt"), SRT).unwrap();
            Ok(CommandOutput::ok(""))
        });

        let converter = setup(&store, runner);
        let id = VideoId::parse("abc").unwrap();
        let markup = SubtitleArtifact::raw_markup(Path::new("/dl"), &id);

        let converted = converter.convert(&markup, &id, Path::new("/dl")).await.unwrap();

        assert_eq!(converted.text, "hello\nworld");
        assert_eq!(converted.final_text.path, Path::new("/dl/abc.txt"));
        assert!(store.file_paths().is_empty());
    }

    #[tokio::test]
    async fn test_failed_conversion_still_removes_transient_files() {
        let store = Arc::new(MemoryFileStore::new());
        let writer = store.clone();
        let mut runner = MockCommandRunner::new();
        runner.expect_run().returning(move |_, _| {
            // ffmpeg may leave a partial output behind
            writer.write(Path::new("/dl/abc.srt"), "1\n").unwrap();
            Ok(CommandOutput::failed(1, "conversion failed"))
        });

        let converter = setup(&store, runner);
        let id = VideoId::parse("abc").unwrap();
        let markup = SubtitleArtifact::raw_markup(Path::new("/dl"), &id);

        let err = converter
            .convert(&markup, &id, Path::new("/dl"))
            .await
            .unwrap_err();

        assert!(matches!(err, TranscriptError::Conversion(_)));
        assert!(store.file_paths().is_empty());
    }
}
