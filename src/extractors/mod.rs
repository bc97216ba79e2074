use std::fmt;
use std::path::{Path, PathBuf};

pub mod ffmpeg;
pub mod youtube;

pub use ffmpeg::Ffmpeg;
pub use youtube::YtDlp;

/// Language requested from the retrieval tool
pub const SUBTITLE_LANGUAGE: &str = "en";

/// Extension of the caption markup written by yt-dlp
pub const MARKUP_EXTENSION: &str = "vtt";

/// Canonical identifier of a video, never empty
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoId(String);

impl VideoId {
    /// Take the first non-empty line of `raw`, trimmed
    pub fn parse(raw: &str) -> Option<Self> {
        raw.lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(|line| VideoId(line.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether `path` is a caption markup file produced for this video
    /// (`<id>.<lang>.vtt`, any language or variant)
    pub fn owns_raw_markup(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };

        name.strip_prefix(self.as_str())
            .and_then(|rest| rest.strip_prefix('.'))
            .and_then(|rest| rest.strip_suffix(MARKUP_EXTENSION))
            .map(|middle| middle.ends_with('.') && middle.len() > 1)
            .unwrap_or(false)
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pipeline stage a file on disk belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// Timed caption markup downloaded by yt-dlp
    RawMarkup,
    /// Numbered SRT produced by ffmpeg
    IntermediateCaption,
    /// Plain transcript text
    FinalText,
}

/// A file path tagged with the stage that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleArtifact {
    pub kind: ArtifactKind,
    pub path: PathBuf,
}

impl SubtitleArtifact {
    /// `<dir>/<id>.en.vtt`
    pub fn raw_markup(dir: &Path, video_id: &VideoId) -> Self {
        Self {
            kind: ArtifactKind::RawMarkup,
            path: dir.join(format!(
                "{}.{}.{}",
                video_id, SUBTITLE_LANGUAGE, MARKUP_EXTENSION
            )),
        }
    }

    /// `<dir>/<id>.srt`
    pub fn intermediate_caption(dir: &Path, video_id: &VideoId) -> Self {
        Self {
            kind: ArtifactKind::IntermediateCaption,
            path: dir.join(format!("{}.srt", video_id)),
        }
    }

    /// `<dir>/<id>.txt`
    pub fn final_text(dir: &Path, video_id: &VideoId) -> Self {
        Self {
            kind: ArtifactKind::FinalText,
            path: dir.join(format!("{}.txt", video_id)),
        }
    }
}
