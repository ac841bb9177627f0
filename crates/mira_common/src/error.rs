//! Error types for Mira.

use thiserror::Error;

/// Failures surfaced by the analysis pipeline.
///
/// Remote question-generation failures are deliberately absent: they are
/// absorbed by the fallback question path and never reach a client.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The emotion model could not be loaded from any candidate path. Only
    /// surfaced when analysis is actually attempted; the load is retried on
    /// each call until it succeeds.
    #[error("Emotion model unavailable: {0}")]
    ModelUnavailable(String),

    /// Missing or undecodable image payload.
    #[error("{0}")]
    InvalidImage(String),

    /// Any other failure during decode, preprocessing, or prediction.
    #[error("{0}")]
    Unexpected(String),
}

impl AnalysisError {
    /// HTTP status this error maps to at the API boundary.
    pub fn http_status(&self) -> u16 {
        match self {
            AnalysisError::ModelUnavailable(_) => 503,
            AnalysisError::InvalidImage(_) => 400,
            AnalysisError::Unexpected(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AnalysisError::InvalidImage("No image data received in request".into()).http_status(),
            400
        );
        assert_eq!(
            AnalysisError::ModelUnavailable("no candidate path".into()).http_status(),
            503
        );
        assert_eq!(AnalysisError::Unexpected("boom".into()).http_status(), 500);
    }
}
