//! Call results handed back to facade callers.

use serde::{Deserialize, Serialize};

use crate::error::{ErrorCode, Exhausted};

/// Error block carried by every response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub code: ErrorCode,
    #[serde(default)]
    pub message: String,
}

impl ErrorInfo {
    pub fn success() -> Self {
        Self {
            code: ErrorCode::Success,
            message: String::new(),
        }
    }
}

/// Response of a value-returning call.
///
/// When every endpoint failed, `error.code` is the exhaustion code and `data`
/// is `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reply<T> {
    pub error: ErrorInfo,
    pub data: Option<T>,
}

impl<T> Reply<T> {
    pub fn ok(data: T) -> Self {
        Self {
            error: ErrorInfo::success(),
            data: Some(data),
        }
    }

    pub fn failed(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            error: ErrorInfo {
                code,
                message: message.into(),
            },
            data: None,
        }
    }

    /// Default response for a call that ran out of endpoints.
    pub fn from_exhausted(exhausted: &Exhausted) -> Self {
        Self::failed(exhausted.code, exhausted.to_string())
    }

    pub fn is_success(&self) -> bool {
        self.error.code.is_success()
    }

    pub fn code(&self) -> ErrorCode {
        self.error.code
    }
}

/// Result of a fire-and-forget call. Carries no response payload.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OnewayOutcome {
    /// The request was written to one endpoint.
    Delivered,
    /// No endpoint accepted the request.
    Undelivered(Exhausted),
}

impl OnewayOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, OnewayOutcome::Delivered)
    }

    pub fn into_result(self) -> Result<(), Exhausted> {
        match self {
            OnewayOutcome::Delivered => Ok(()),
            OnewayOutcome::Undelivered(exhausted) => Err(exhausted),
        }
    }
}

impl From<Result<(), Exhausted>> for OnewayOutcome {
    fn from(result: Result<(), Exhausted>) -> Self {
        match result {
            Ok(()) => OnewayOutcome::Delivered,
            Err(exhausted) => OnewayOutcome::Undelivered(exhausted),
        }
    }
}
