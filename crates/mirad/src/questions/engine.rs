//! The question selection engine.
//!
//! Produces one question per analysis turn: the fixed opening question on a
//! fresh session, then remotely generated questions with a bounded number of
//! attempts, then a random unused question from the static bank. A question
//! is never repeated within a session (the bank recycles on exhaustion).

use crate::questions::bank::{QuestionBank, OPENING_QUESTION};
use crate::questions::generator::QuestionGenerator;
use crate::questions::prompts::PromptSet;
use crate::questions::session::SharedSession;
use mira_common::{Emotion, EmotionCategory};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// Emotion-driven question supply over one shared session.
pub struct QuestionEngine {
    generator: Arc<dyn QuestionGenerator>,
    bank: QuestionBank,
    prompts: PromptSet,
    session: SharedSession,
    max_attempts: usize,
    rng: Mutex<StdRng>,
}

impl QuestionEngine {
    pub fn new(
        generator: Arc<dyn QuestionGenerator>,
        session: SharedSession,
        max_attempts: usize,
    ) -> Self {
        Self {
            generator,
            bank: QuestionBank::default(),
            prompts: PromptSet::default(),
            session,
            max_attempts,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Fix the fallback selection order for deterministic tests.
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    /// Produce the next question for the detected emotion.
    ///
    /// Never fails: remote generation errors degrade to the local bank. The
    /// session lock is only held to check and record membership, not across
    /// the network call.
    pub async fn next_question(
        &self,
        emotion: Emotion,
        category: EmotionCategory,
        confidence: f32,
    ) -> String {
        {
            let mut session = self.session.write().await;
            if !session.is_started() {
                session.mark_started();
                session.record(OPENING_QUESTION.to_string());
                return OPENING_QUESTION.to_string();
            }
        }

        let prompt = self.prompts.for_category(category).render(emotion, confidence);

        for attempt in 1..=self.max_attempts {
            match self.generator.generate(&prompt).await {
                Ok(text) => {
                    let text = text.trim().to_string();
                    if text.is_empty() {
                        debug!("Attempt {}: generator returned empty text", attempt);
                        continue;
                    }
                    let mut session = self.session.write().await;
                    if session.record(text.clone()) {
                        return text;
                    }
                    debug!("Attempt {}: generated question already used", attempt);
                }
                Err(e) => {
                    warn!("Attempt {}: question generation failed: {}", attempt, e);
                }
            }
        }

        self.fallback_question(category).await
    }

    /// Random unused question from the category bank, recycling the bank
    /// when every question in it has been asked.
    async fn fallback_question(&self, category: EmotionCategory) -> String {
        let bank = self.bank.for_category(category);
        let mut session = self.session.write().await;

        let mut candidates: Vec<&str> = bank
            .iter()
            .filter(|q| !session.is_used(q))
            .map(String::as_str)
            .collect();

        if candidates.is_empty() {
            debug!("{} bank exhausted, recycling", category);
            session.recycle();
            candidates = bank
                .iter()
                .filter(|q| !session.is_used(q))
                .map(String::as_str)
                .collect();
        }

        let selected = {
            let mut rng = self.rng.lock().expect("rng mutex poisoned");
            candidates
                .choose(&mut *rng)
                .copied()
                .unwrap_or(OPENING_QUESTION)
        };

        session.record(selected.to_string());
        selected.to_string()
    }
}
