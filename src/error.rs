//! Error taxonomy shared by the core and the service facades.
//!
//! # Propagation
//! ```text
//! ConfigError      → returned from client construction (client unusable)
//! ValidationError  → returned before any host is contacted
//! Failure          → produced by one attempt, recovered inside the retry loop
//! Exhausted        → terminal value once every candidate has failed
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result codes carried by every remote response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    Success,
    Fail,
    BadRequest,
    /// No endpoint in the pool answered within the retry budget.
    Unavailable,
}

impl ErrorCode {
    pub fn is_success(self) -> bool {
        self == ErrorCode::Success
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorCode::Success => "SUCCESS",
            ErrorCode::Fail => "FAIL",
            ErrorCode::BadRequest => "BAD_REQUEST",
            ErrorCode::Unavailable => "UNAVAILABLE",
        };
        f.write_str(s)
    }
}

/// Which leg of an attempt ran out of time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Connect,
    Send,
    Receive,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Connect => f.write_str("connect"),
            Phase::Send => f.write_str("send"),
            Phase::Receive => f.write_str("receive"),
        }
    }
}

/// Connection-level failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportFailure {
    #[error("could not connect: {0}")]
    Connect(String),

    #[error("{phase} timed out after {millis} ms")]
    Timeout { phase: Phase, millis: u64 },

    #[error("I/O error: {0}")]
    Io(String),

    #[error("connection closed by peer")]
    Closed,
}

/// Outcome of a single failed attempt against one endpoint.
///
/// Every variant marks the endpoint dead and moves on to the next candidate;
/// the distinction only matters for logs, metrics and diagnostics.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Failure {
    #[error("transport failure: {0}")]
    Transport(#[from] TransportFailure),

    #[error("protocol failure: {0}")]
    Protocol(String),

    #[error("{0}")]
    Generic(String),
}

impl Failure {
    /// Short label used as a metric dimension.
    pub fn kind(&self) -> &'static str {
        match self {
            Failure::Transport(_) => "transport",
            Failure::Protocol(_) => "protocol",
            Failure::Generic(_) => "generic",
        }
    }
}

impl From<std::io::Error> for Failure {
    fn from(e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::UnexpectedEof => Failure::Transport(TransportFailure::Closed),
            _ => Failure::Transport(TransportFailure::Io(e.to_string())),
        }
    }
}

/// Terminal result once the retry budget is spent.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("all {attempts} attempt(s) failed; last failure: {}", last_failure.as_ref().map(|f| f.to_string()).unwrap_or_else(|| "none".to_string()))]
pub struct Exhausted {
    /// Code placed in the default response handed back to callers.
    pub code: ErrorCode,
    /// Number of endpoints actually attempted.
    pub attempts: usize,
    pub last_failure: Option<Failure>,
}

impl Exhausted {
    pub fn new(attempts: usize, last_failure: Option<Failure>) -> Self {
        Self {
            code: ErrorCode::Unavailable,
            attempts,
            last_failure,
        }
    }
}

/// Malformed request detected before any network attempt.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid \"{field}\" param: {reason}")]
    InvalidParam { field: &'static str, reason: &'static str },

    #[error("Invalid params: nothing to update")]
    NothingToUpdate,
}

impl ValidationError {
    pub fn invalid(field: &'static str, reason: &'static str) -> Self {
        ValidationError::InvalidParam { field, reason }
    }

    /// Name of the offending field, if the error is about a single field.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ValidationError::InvalidParam { field, .. } => Some(field),
            ValidationError::NothingToUpdate => None,
        }
    }
}
