//! Threshold & category resolver.
//!
//! Pure function of one probability vector and the static threshold/category
//! tables. An emotion "qualifies" when its probability reaches its threshold;
//! the winning category is decided by the highest qualifying probability on
//! each side, and the winning emotion is the highest-probability qualifying
//! label of that category (first maximum in label order on ties).

use crate::emotion::{Emotion, EmotionCategory, EmotionScores};
use serde::{Deserialize, Serialize};

/// Outcome of resolving one probability vector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub emotion: Emotion,
    pub category: EmotionCategory,
    pub confidence: f32,
}

/// Resolve a probability vector into a single emotion, category, and
/// confidence.
///
/// When nothing qualifies the fixed fallback is neutral/Positive with the raw
/// neutral probability as confidence, even if that probability is below
/// neutral's own threshold.
pub fn resolve(scores: &EmotionScores) -> Resolution {
    let best_positive = best_qualifying(scores, EmotionCategory::Positive);
    let best_negative = best_qualifying(scores, EmotionCategory::Negative);

    let max_negative = best_negative.map(|(_, p)| p).unwrap_or(0.0);

    if let Some((emotion, confidence)) =
        best_positive.filter(|(_, p)| *p > max_negative && *p > 0.0)
    {
        return Resolution {
            emotion,
            category: EmotionCategory::Positive,
            confidence,
        };
    }

    if let Some((emotion, confidence)) = best_negative.filter(|(_, p)| *p > 0.0) {
        return Resolution {
            emotion,
            category: EmotionCategory::Negative,
            confidence,
        };
    }

    Resolution {
        emotion: Emotion::Neutral,
        category: EmotionCategory::Positive,
        confidence: scores.get(Emotion::Neutral),
    }
}

/// Highest-probability qualifying emotion of one category, first maximum in
/// label order. None when nothing in the category qualifies.
fn best_qualifying(scores: &EmotionScores, category: EmotionCategory) -> Option<(Emotion, f32)> {
    let mut best: Option<(Emotion, f32)> = None;
    for (emotion, prob) in scores.iter() {
        if emotion.category() != category || prob < emotion.threshold() {
            continue;
        }
        match best {
            Some((_, best_prob)) if prob <= best_prob => {}
            _ => best = Some((emotion, prob)),
        }
    }
    best
}
