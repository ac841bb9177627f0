//! Question engine invariants: opening question, no repetition, fallback,
//! exhaustion recovery, reset.

use mira_common::{Emotion, EmotionCategory};
use mirad::questions::{
    create_shared_session, FakeGenerator, GeneratorError, QuestionBank, QuestionEngine,
    OPENING_QUESTION,
};
use std::collections::HashSet;
use std::sync::Arc;

fn engine_with(
    generator: FakeGenerator,
) -> (QuestionEngine, mirad::questions::SharedSession) {
    let session = create_shared_session();
    let engine = QuestionEngine::new(Arc::new(generator), session.clone(), 3).with_rng_seed(7);
    (engine, session)
}

#[tokio::test]
async fn test_first_question_is_always_the_opening() {
    let (engine, session) = engine_with(FakeGenerator::always("שאלה שנוצרה"));

    let first = engine
        .next_question(Emotion::Angry, EmotionCategory::Negative, 0.9)
        .await;

    assert_eq!(first, OPENING_QUESTION);
    assert!(session.read().await.is_used(OPENING_QUESTION));
}

#[tokio::test]
async fn test_second_question_comes_from_the_generator() {
    let (engine, _session) = engine_with(FakeGenerator::always("שאלה שנוצרה"));

    let first = engine
        .next_question(Emotion::Happy, EmotionCategory::Positive, 0.8)
        .await;
    let second = engine
        .next_question(Emotion::Sad, EmotionCategory::Negative, 0.6)
        .await;

    assert_eq!(first, OPENING_QUESTION);
    assert_eq!(second, "שאלה שנוצרה");
    assert!(!second.is_empty());
    assert_ne!(first, second);
}

#[tokio::test]
async fn test_duplicate_generation_retries_until_fresh() {
    // Attempt 1 repeats an already-used question, attempt 2 is fresh.
    let fake = FakeGenerator::new(vec![
        Ok("שאלה א".to_string()),
        Ok("שאלה א".to_string()),
        Ok("שאלה ב".to_string()),
    ]);
    let (engine, _session) = engine_with(fake);

    engine
        .next_question(Emotion::Happy, EmotionCategory::Positive, 0.8)
        .await;
    let first = engine
        .next_question(Emotion::Happy, EmotionCategory::Positive, 0.8)
        .await;
    let second = engine
        .next_question(Emotion::Happy, EmotionCategory::Positive, 0.8)
        .await;

    assert_eq!(first, "שאלה א");
    assert_eq!(second, "שאלה ב");
}

#[tokio::test]
async fn test_generator_failure_degrades_to_the_bank() {
    let (engine, _session) = engine_with(FakeGenerator::always_error(GeneratorError::Network(
        "connection refused".to_string(),
    )));
    let bank = QuestionBank::default();

    engine
        .next_question(Emotion::Happy, EmotionCategory::Positive, 0.8)
        .await;
    let question = engine
        .next_question(Emotion::Happy, EmotionCategory::Positive, 0.8)
        .await;

    assert!(bank
        .for_category(EmotionCategory::Positive)
        .contains(&question));
}

#[tokio::test]
async fn test_empty_generation_degrades_to_the_bank() {
    let (engine, _session) = engine_with(FakeGenerator::always("   "));
    let bank = QuestionBank::default();

    engine
        .next_question(Emotion::Surprise, EmotionCategory::Positive, 0.6)
        .await;
    let question = engine
        .next_question(Emotion::Surprise, EmotionCategory::Positive, 0.6)
        .await;

    assert!(bank
        .for_category(EmotionCategory::Positive)
        .contains(&question));
}

#[tokio::test]
async fn test_no_repetition_until_the_bank_is_exhausted() {
    let (engine, _session) = engine_with(FakeGenerator::always_error(GeneratorError::Status(503)));
    let bank_size = QuestionBank::default()
        .for_category(EmotionCategory::Negative)
        .len();

    // Opening question first.
    engine
        .next_question(Emotion::Fear, EmotionCategory::Negative, 0.75)
        .await;

    let mut seen = HashSet::new();
    for _ in 0..bank_size {
        let question = engine
            .next_question(Emotion::Fear, EmotionCategory::Negative, 0.75)
            .await;
        assert!(seen.insert(question), "question repeated before exhaustion");
    }
    assert_eq!(seen.len(), bank_size);
}

#[tokio::test]
async fn test_exhaustion_recycles_but_keeps_opening_used() {
    let (engine, session) =
        engine_with(FakeGenerator::always_error(GeneratorError::Status(503)));
    let bank = QuestionBank::default();
    let bank_size = bank.for_category(EmotionCategory::Positive).len();

    engine
        .next_question(Emotion::Happy, EmotionCategory::Positive, 0.8)
        .await;
    for _ in 0..bank_size {
        engine
            .next_question(Emotion::Happy, EmotionCategory::Positive, 0.8)
            .await;
    }

    // Bank is now exhausted; the next selection must still succeed.
    let question = engine
        .next_question(Emotion::Happy, EmotionCategory::Positive, 0.8)
        .await;

    assert!(bank
        .for_category(EmotionCategory::Positive)
        .contains(&question));

    let state = session.read().await;
    assert!(state.is_used(OPENING_QUESTION));
    // Recycled set: the opening question plus the fresh selection.
    assert_eq!(state.used_count(), 2);
}

#[tokio::test]
async fn test_reset_restores_the_opening_invariant() {
    let (engine, session) = engine_with(FakeGenerator::always("שאלה שנוצרה"));

    engine
        .next_question(Emotion::Happy, EmotionCategory::Positive, 0.8)
        .await;
    engine
        .next_question(Emotion::Happy, EmotionCategory::Positive, 0.8)
        .await;

    session.write().await.reset();
    session.write().await.reset();

    {
        let state = session.read().await;
        assert!(!state.is_started());
        assert_eq!(state.used_count(), 0);
    }

    let question = engine
        .next_question(Emotion::Sad, EmotionCategory::Negative, 0.55)
        .await;
    assert_eq!(question, OPENING_QUESTION);
}

#[tokio::test]
async fn test_seeded_fallback_selection_is_deterministic() {
    let pick = |seed| async move {
        let session = create_shared_session();
        let engine = QuestionEngine::new(
            Arc::new(FakeGenerator::always_error(GeneratorError::Empty)),
            session,
            3,
        )
        .with_rng_seed(seed);

        engine
            .next_question(Emotion::Happy, EmotionCategory::Positive, 0.8)
            .await;
        engine
            .next_question(Emotion::Happy, EmotionCategory::Positive, 0.8)
            .await
    };

    assert_eq!(pick(42).await, pick(42).await);
}
