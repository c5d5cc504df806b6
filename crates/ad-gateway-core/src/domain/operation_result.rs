//! Outcome of a mutating directory operation

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationStatus {
    Success,
    Error,
}

/// Status plus the human-readable messages collected while the operation ran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationResult {
    pub status: OperationStatus,
    pub messages: Vec<String>,
}

impl OperationResult {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: OperationStatus::Success,
            messages: vec![message.into()],
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: OperationStatus::Error,
            messages: vec![message.into()],
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == OperationStatus::Success
    }
}
