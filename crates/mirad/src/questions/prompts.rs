//! Prompt templates for the remote question generator.
//!
//! One template per category, with named `{emotion}` and `{confidence}`
//! placeholders. Templates are validated at construction so a broken
//! placeholder is caught at startup, not mid-interview.

use mira_common::{Emotion, EmotionCategory};
use thiserror::Error;

const POSITIVE_PROMPT: &str = "\
אתה מראיין מועמד לעבודה וזיהית רגש חיובי ({emotion}) בתגובה של המועמד.
רמת הביטחון בזיהוי היא {confidence}%.

אני צריך שאלת המשך אחת שתהיה:
1. מותאמת לסיטואציית ראיון עבודה
2. קשורה לרגש החיובי שזיהית
3. מעודדת את המועמד לשתף מידע מקצועי רלוונטי
4. קצרה ותמציתית (לא יותר מ-2 משפטים)
5. בעברית בלבד, בניסוח מנומס ומקצועי

הצג את השאלה בלבד, ללא הקדמות או הסברים.";

const NEGATIVE_PROMPT: &str = "\
אתה מראיין מועמד לעבודה וזיהית רגש שלילי ({emotion}) בתגובה של המועמד.
רמת הביטחון בזיהוי היא {confidence}%.

אני צריך שאלת המשך אחת שתהיה:
1. מותאמת לסיטואציית ראיון עבודה
2. מתייחסת ברגישות לרגש השלילי שזיהית מבלי להזכיר אותו ישירות
3. עוזרת למועמד להרגיש בנוח ולהמשיך את הראיון בצורה חיובית
4. קצרה ותמציתית (לא יותר מ-2 משפטים)
5. בעברית בלבד, בניסוח מנומס ומקצועי

הצג את השאלה בלבד, ללא הקדמות או הסברים.";

/// Template validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PromptError {
    #[error("prompt template is missing the {{{0}}} placeholder")]
    MissingPlaceholder(&'static str),
}

/// A validated prompt template.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    /// Validate and wrap a template string. Both placeholders must appear.
    pub fn new(template: impl Into<String>) -> Result<Self, PromptError> {
        let template = template.into();
        for placeholder in ["emotion", "confidence"] {
            if !template.contains(&format!("{{{placeholder}}}")) {
                return Err(PromptError::MissingPlaceholder(placeholder));
            }
        }
        Ok(Self { template })
    }

    /// Render the template with a human-readable emotion name and the
    /// confidence as a percentage.
    pub fn render(&self, emotion: Emotion, confidence: f32) -> String {
        self.template
            .replace("{emotion}", emotion.hebrew_name())
            .replace("{confidence}", &format!("{:.1}", confidence * 100.0))
    }
}

/// The per-category template set.
#[derive(Debug, Clone)]
pub struct PromptSet {
    positive: PromptTemplate,
    negative: PromptTemplate,
}

impl Default for PromptSet {
    fn default() -> Self {
        Self {
            positive: PromptTemplate::new(POSITIVE_PROMPT).expect("built-in positive template"),
            negative: PromptTemplate::new(NEGATIVE_PROMPT).expect("built-in negative template"),
        }
    }
}

impl PromptSet {
    /// The template for one category.
    pub fn for_category(&self, category: EmotionCategory) -> &PromptTemplate {
        match category {
            EmotionCategory::Positive => &self.positive,
            EmotionCategory::Negative => &self.negative,
        }
    }
}
