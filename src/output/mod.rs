use anyhow::Result;
use serde::Serialize;

use crate::transcribe::Transcript;
use crate::TranscriptError;

/// Outcome of an extraction, as returned to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ExtractionResult {
    Success(ExtractionSuccess),
    Failure(ExtractionFailure),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionSuccess {
    /// Always `true`
    pub success: bool,
    pub video_id: Option<String>,
    pub transcript: Option<String>,
    pub saved_path: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionFailure {
    /// Always `false`
    pub success: bool,
    pub error: String,
}

impl ExtractionResult {
    pub fn from_transcript(transcript: &Transcript) -> Self {
        let saved_path = transcript
            .saved_path
            .as_ref()
            .map(|path| path.display().to_string());

        let message = match &saved_path {
            Some(path) => format!("Transcript extracted and saved to {}", path),
            None => "Transcript extracted successfully".to_string(),
        };

        ExtractionResult::Success(ExtractionSuccess {
            success: true,
            video_id: Some(transcript.video_id.to_string()),
            transcript: Some(transcript.text.clone()),
            saved_path,
            message,
        })
    }

    pub fn failure(error: &TranscriptError) -> Self {
        ExtractionResult::Failure(ExtractionFailure {
            success: false,
            error: error.to_string(),
        })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ExtractionResult::Success(_))
    }

    /// Pretty-printed JSON, the textual payload handed back to the caller
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
