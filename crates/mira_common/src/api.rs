//! Request/response bodies for the daemon's HTTP API.

use serde::{Deserialize, Serialize};

/// Generic success acknowledgment (`/api/reset-interview`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    pub message: String,
}

impl StatusResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: "success".to_string(),
            message: message.into(),
        }
    }
}

/// Health check response (`/api/test`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub time: String,
}

/// Snapshot of the questions asked so far (`/api/used-questions`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsedQuestionsResponse {
    pub status: String,
    pub count: usize,
    pub questions: Vec<String>,
}

/// Error body returned with a non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
