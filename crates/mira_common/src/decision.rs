//! The per-analysis decision record returned to clients.

use crate::emotion::{Emotion, EmotionCategory, EmotionScores};
use serde::{Deserialize, Serialize};

/// Complete result of one analysis call. Created once per call, returned to
/// the caller, never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decision {
    pub classified_emotion: Emotion,
    pub category: EmotionCategory,
    pub confidence: f32,
    pub detected_emotions: EmotionScores,
    pub suggested_question: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_wire_shape() {
        let mut detected = EmotionScores::default();
        detected.set(Emotion::Happy, 0.75);

        let decision = Decision {
            classified_emotion: Emotion::Happy,
            category: EmotionCategory::Positive,
            confidence: 0.75,
            detected_emotions: detected,
            suggested_question: "מה מעניק לך סיפוק בעבודה?".to_string(),
        };

        let json = serde_json::to_value(&decision).unwrap();
        assert_eq!(json["classified_emotion"], "happy");
        assert_eq!(json["category"], "Positive Emotion");
        assert_eq!(json["confidence"], 0.75);
        assert_eq!(json["detected_emotions"]["happy"], 0.75);
        assert!(json["suggested_question"].as_str().unwrap().contains("סיפוק"));
    }
}
