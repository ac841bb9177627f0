//! Shared types for Mira - emotion domain model, resolver, and wire contracts.

pub mod api;
pub mod decision;
pub mod emotion;
pub mod error;
pub mod resolver;

pub use decision::Decision;
pub use emotion::{Emotion, EmotionCategory, EmotionScores};
pub use error::AnalysisError;
pub use resolver::{resolve, Resolution};

/// Crate version, embedded at build time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
