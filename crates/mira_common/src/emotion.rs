//! Emotion domain model.
//!
//! The label set, per-emotion detection thresholds, and the Positive/Negative
//! partition are fixed at compile time. Label order matters: it is the output
//! order of the classifier head, and it is the iteration order used wherever a
//! "first maximum wins" rule applies.

use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Classifier output classes, in the model's output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Angry,
    Disgust,
    Fear,
    Happy,
    Sad,
    Surprise,
    Neutral,
}

/// Number of emotion classes.
pub const EMOTION_COUNT: usize = 7;

impl Emotion {
    /// All emotions in classifier output order.
    pub const ALL: [Emotion; EMOTION_COUNT] = [
        Emotion::Angry,
        Emotion::Disgust,
        Emotion::Fear,
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Surprise,
        Emotion::Neutral,
    ];

    /// Wire label for this emotion.
    pub fn label(&self) -> &'static str {
        match self {
            Emotion::Angry => "angry",
            Emotion::Disgust => "disgust",
            Emotion::Fear => "fear",
            Emotion::Happy => "happy",
            Emotion::Sad => "sad",
            Emotion::Surprise => "surprise",
            Emotion::Neutral => "neutral",
        }
    }

    /// Parse a wire label.
    pub fn from_label(label: &str) -> Option<Emotion> {
        Emotion::ALL.iter().copied().find(|e| e.label() == label)
    }

    /// Minimum probability for this emotion to count as detected.
    pub fn threshold(&self) -> f32 {
        match self {
            Emotion::Angry => 0.7,
            Emotion::Disgust => 0.9,
            Emotion::Fear => 0.7,
            Emotion::Happy => 0.4,
            Emotion::Sad => 0.5,
            Emotion::Surprise => 0.5,
            Emotion::Neutral => 0.2,
        }
    }

    /// The category this emotion belongs to.
    pub fn category(&self) -> EmotionCategory {
        match self {
            Emotion::Happy | Emotion::Surprise | Emotion::Neutral => EmotionCategory::Positive,
            Emotion::Angry | Emotion::Disgust | Emotion::Fear | Emotion::Sad => {
                EmotionCategory::Negative
            }
        }
    }

    /// Hebrew display name, used when rendering prompts.
    pub fn hebrew_name(&self) -> &'static str {
        match self {
            Emotion::Happy => "שמחה",
            Emotion::Surprise => "הפתעה",
            Emotion::Neutral => "ניטרליות",
            Emotion::Angry => "כעס",
            Emotion::Disgust => "גועל",
            Emotion::Fear => "פחד",
            Emotion::Sad => "עצב",
        }
    }

    /// Index into the classifier output vector.
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Super-category of an emotion. Serialized with the full category names
/// clients display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmotionCategory {
    #[serde(rename = "Positive Emotion")]
    Positive,
    #[serde(rename = "Negative Emotion")]
    Negative,
}

impl EmotionCategory {
    /// Wire name for this category.
    pub fn wire_name(&self) -> &'static str {
        match self {
            EmotionCategory::Positive => "Positive Emotion",
            EmotionCategory::Negative => "Negative Emotion",
        }
    }
}

impl fmt::Display for EmotionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Per-emotion probability vector produced by one classifier run.
///
/// Serialized as a JSON map from label to probability, in label order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmotionScores {
    values: [f32; EMOTION_COUNT],
}

impl EmotionScores {
    /// Build from a raw classifier output vector in label order.
    pub fn from_vec(probs: &[f32]) -> Self {
        let mut values = [0.0; EMOTION_COUNT];
        for (slot, prob) in values.iter_mut().zip(probs.iter()) {
            *slot = *prob;
        }
        Self { values }
    }

    /// Probability assigned to one emotion.
    pub fn get(&self, emotion: Emotion) -> f32 {
        self.values[emotion.index()]
    }

    /// Set the probability for one emotion.
    pub fn set(&mut self, emotion: Emotion, prob: f32) {
        self.values[emotion.index()] = prob;
    }

    /// Iterate (emotion, probability) pairs in label order.
    pub fn iter(&self) -> impl Iterator<Item = (Emotion, f32)> + '_ {
        Emotion::ALL.iter().map(move |e| (*e, self.get(*e)))
    }
}

impl Serialize for EmotionScores {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(EMOTION_COUNT))?;
        for (emotion, prob) in self.iter() {
            map.serialize_entry(emotion.label(), &prob)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for EmotionScores {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = HashMap::<String, f32>::deserialize(deserializer)?;
        let mut scores = EmotionScores::default();
        for (label, prob) in raw {
            let emotion = Emotion::from_label(&label)
                .ok_or_else(|| de::Error::custom(format!("unknown emotion label: {label}")))?;
            scores.set(emotion, prob);
        }
        Ok(scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_partition() {
        let positive: Vec<Emotion> = Emotion::ALL
            .iter()
            .copied()
            .filter(|e| e.category() == EmotionCategory::Positive)
            .collect();
        let negative: Vec<Emotion> = Emotion::ALL
            .iter()
            .copied()
            .filter(|e| e.category() == EmotionCategory::Negative)
            .collect();

        assert_eq!(
            positive,
            vec![Emotion::Happy, Emotion::Surprise, Emotion::Neutral]
        );
        assert_eq!(
            negative,
            vec![Emotion::Angry, Emotion::Disgust, Emotion::Fear, Emotion::Sad]
        );
        assert_eq!(positive.len() + negative.len(), EMOTION_COUNT);
    }

    #[test]
    fn test_labels_round_trip() {
        for emotion in Emotion::ALL {
            assert_eq!(Emotion::from_label(emotion.label()), Some(emotion));
        }
        assert_eq!(Emotion::from_label("bored"), None);
    }

    #[test]
    fn test_label_order_matches_indices() {
        for (i, emotion) in Emotion::ALL.iter().enumerate() {
            assert_eq!(emotion.index(), i);
        }
    }

    #[test]
    fn test_scores_serialize_as_label_map() {
        let mut scores = EmotionScores::default();
        scores.set(Emotion::Happy, 0.75);
        scores.set(Emotion::Neutral, 0.25);

        let json = serde_json::to_value(&scores).unwrap();
        assert_eq!(json["happy"], 0.75);
        assert_eq!(json["neutral"], 0.25);
        assert_eq!(json["angry"], 0.0);
        assert_eq!(json.as_object().unwrap().len(), EMOTION_COUNT);
    }

    #[test]
    fn test_scores_deserialize_rejects_unknown_label() {
        let err = serde_json::from_str::<EmotionScores>(r#"{"bored": 0.5}"#);
        assert!(err.is_err());
    }

    #[test]
    fn test_category_wire_names() {
        assert_eq!(
            serde_json::to_value(EmotionCategory::Positive).unwrap(),
            "Positive Emotion"
        );
        assert_eq!(
            serde_json::to_value(EmotionCategory::Negative).unwrap(),
            "Negative Emotion"
        );
    }
}
