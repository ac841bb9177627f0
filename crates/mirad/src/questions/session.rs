//! Interview session state.
//!
//! One process-wide session: whether the interview has started, and the set
//! of questions already asked. Shared behind a single async lock; every
//! access is a short critical section, and the remote generation call is
//! never made while the lock is held.

use crate::questions::bank::OPENING_QUESTION;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Mutable per-session state.
#[derive(Debug, Default)]
pub struct InterviewSession {
    started: bool,
    used: HashSet<String>,
}

impl InterviewSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Has the opening question been asked yet?
    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn mark_started(&mut self) {
        self.started = true;
    }

    /// Has this question already been asked in the current session?
    pub fn is_used(&self, question: &str) -> bool {
        self.used.contains(question)
    }

    /// Record a question as asked. Returns false when it was already used.
    pub fn record(&mut self, question: String) -> bool {
        self.used.insert(question)
    }

    /// Number of questions asked so far.
    pub fn used_count(&self) -> usize {
        self.used.len()
    }

    /// Unordered snapshot of the questions asked so far.
    pub fn snapshot(&self) -> Vec<String> {
        self.used.iter().cloned().collect()
    }

    /// Forget the asked questions after bank exhaustion so the bank can be
    /// reused. The opening question stays recorded: the interview did start,
    /// only the bank recycles.
    pub fn recycle(&mut self) {
        self.used.clear();
        if self.started {
            self.used.insert(OPENING_QUESTION.to_string());
        }
    }

    /// Full reset for a new interview. Idempotent.
    pub fn reset(&mut self) {
        self.used.clear();
        self.started = false;
    }
}

/// Thread-safe shared session handle.
pub type SharedSession = Arc<RwLock<InterviewSession>>;

pub fn create_shared_session() -> SharedSession {
    Arc::new(RwLock::new(InterviewSession::new()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_reports_duplicates() {
        let mut session = InterviewSession::new();
        assert!(session.record("שאלה".to_string()));
        assert!(!session.record("שאלה".to_string()));
        assert_eq!(session.used_count(), 1);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut session = InterviewSession::new();
        session.mark_started();
        session.record(OPENING_QUESTION.to_string());
        session.record("שאלה".to_string());

        session.reset();
        session.reset();

        assert!(!session.is_started());
        assert_eq!(session.used_count(), 0);
    }

    #[test]
    fn test_recycle_keeps_opening_question_used() {
        let mut session = InterviewSession::new();
        session.mark_started();
        session.record(OPENING_QUESTION.to_string());
        session.record("שאלה א".to_string());
        session.record("שאלה ב".to_string());

        session.recycle();

        assert!(session.is_started());
        assert!(session.is_used(OPENING_QUESTION));
        assert_eq!(session.used_count(), 1);
    }

    #[test]
    fn test_recycle_before_start_stays_empty() {
        let mut session = InterviewSession::new();
        session.recycle();
        assert_eq!(session.used_count(), 0);
    }
}
