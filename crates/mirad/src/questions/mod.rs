//! Question supply: remote generation with a local fallback bank, session
//! tracking, and the opening-question invariant.

pub mod bank;
pub mod engine;
pub mod generator;
pub mod prompts;
pub mod session;

pub use bank::{QuestionBank, OPENING_QUESTION};
pub use engine::QuestionEngine;
pub use generator::{FakeGenerator, GeneratorError, HttpGenerator, QuestionGenerator};
pub use prompts::PromptSet;
pub use session::{create_shared_session, InterviewSession, SharedSession};
