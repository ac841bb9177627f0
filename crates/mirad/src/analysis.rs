//! Analysis orchestrator: classifier -> resolver -> question engine.

use crate::classifier::{self, EmotionClassifier};
use crate::server::AppState;
use mira_common::{resolve, AnalysisError, Decision};
use tracing::{debug, info};

/// Run one full analysis over raw image bytes.
///
/// Classifier failures propagate - no image means no analysis. Question
/// generation failures never do; the engine falls back internally.
pub async fn analyze(state: &AppState, image_bytes: &[u8]) -> Result<Decision, AnalysisError> {
    let model = state.classifier().await?;

    let pixels = classifier::preprocess(image_bytes)?;
    let detected = model.predict(&pixels)?;
    debug!("Detected emotions: {:?}", detected);

    let resolution = resolve(&detected);
    info!(
        "Classified {} ({}) at {:.3}",
        resolution.emotion, resolution.category, resolution.confidence
    );

    let suggested_question = state
        .engine
        .next_question(resolution.emotion, resolution.category, resolution.confidence)
        .await;

    Ok(Decision {
        classified_emotion: resolution.emotion,
        category: resolution.category,
        confidence: resolution.confidence,
        detected_emotions: detected,
        suggested_question,
    })
}
