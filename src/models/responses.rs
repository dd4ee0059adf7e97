use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

/// Response to a public submission awaiting review
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionResponse {
    pub message: String,
    pub id: String,
    pub status: String,
}

impl SubmissionResponse {
    pub const PENDING_REVIEW: &'static str = "pending_review";

    pub fn pending(message: impl Into<String>, id: impl ToString) -> Self {
        Self {
            message: message.into(),
            id: id.to_string(),
            status: Self::PENDING_REVIEW.to_string(),
        }
    }
}
