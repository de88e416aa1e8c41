/// JSON envelope shared by every endpoint
///
/// Successful responses look like `{"success": true, "data": ..., "message": ...}`
/// (both `data` and `message` optional). Failures are always
/// `{"success": false, "message": "..."}`.

use serde::{Deserialize, Serialize};

/// Success envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ApiResponse<()> {
    /// `{"success": true}`
    pub fn ok() -> Self {
        Self {
            success: true,
            data: None,
            message: None,
        }
    }

    /// `{"success": true, "message": ...}`
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
        }
    }
}

impl<T> ApiResponse<T> {
    /// `{"success": true, "data": ...}`
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    /// Attaches a message to the envelope
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Failure envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}
