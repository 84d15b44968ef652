//! Wire frames.
//!
//! Messages are a 4-byte big-endian length followed by a JSON document:
//!
//! ```text
//! [4-byte length] [RequestFrame | ResponseFrame as JSON]
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::OperationContext;
use crate::error::Failure;

/// Relaxed ordering is enough; ids only need to be unique.
static SEQ_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

fn next_seq_id() -> u64 {
    SEQ_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// One remote invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestFrame {
    pub seq_id: u64,
    pub method: String,
    /// The server must not answer oneway frames.
    #[serde(default)]
    pub oneway: bool,
    pub context: OperationContext,
    pub payload: Value,
}

impl RequestFrame {
    pub fn new(method: &str, oneway: bool, context: OperationContext, payload: Value) -> Self {
        Self {
            seq_id: next_seq_id(),
            method: method.to_string(),
            oneway,
            context,
            payload,
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>, Failure> {
        serde_json::to_vec(self).map_err(|e| Failure::Generic(format!("Failed to encode request: {}", e)))
    }

    pub fn decode(data: &[u8]) -> Result<Self, Failure> {
        serde_json::from_slice(data).map_err(|e| Failure::Protocol(format!("Invalid request frame: {}", e)))
    }
}

/// What the server did with a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Reply(Value),
    Exception { message: String },
}

/// Answer to a `RequestFrame` with the same `seq_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseFrame {
    pub seq_id: u64,
    pub outcome: Outcome,
}

impl ResponseFrame {
    pub fn reply(seq_id: u64, value: Value) -> Self {
        Self {
            seq_id,
            outcome: Outcome::Reply(value),
        }
    }

    pub fn exception(seq_id: u64, message: impl Into<String>) -> Self {
        Self {
            seq_id,
            outcome: Outcome::Exception {
                message: message.into(),
            },
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>, Failure> {
        serde_json::to_vec(self).map_err(|e| Failure::Generic(format!("Failed to encode response: {}", e)))
    }

    pub fn decode(data: &[u8]) -> Result<Self, Failure> {
        serde_json::from_slice(data).map_err(|e| Failure::Protocol(format!("Invalid response frame: {}", e)))
    }

    /// The reply value; a remote exception becomes a protocol failure.
    pub fn into_value(self) -> Result<Value, Failure> {
        match self.outcome {
            Outcome::Reply(value) => Ok(value),
            Outcome::Exception { message } => Err(Failure::Protocol(format!("Remote exception: {}", message))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_seq_ids_increase() {
        let a = RequestFrame::new("ping", false, OperationContext::default(), Value::Null);
        let b = RequestFrame::new("ping", false, OperationContext::default(), Value::Null);
        assert!(b.seq_id > a.seq_id);
    }

    #[test]
    fn test_exception_is_protocol_failure() {
        let frame = ResponseFrame::exception(3, "no such method");
        assert_eq!(
            frame.into_value(),
            Err(Failure::Protocol("Remote exception: no such method".into()))
        );
        assert_eq!(ResponseFrame::reply(3, json!(1)).into_value(), Ok(json!(1)));
    }

    #[test]
    fn test_garbage_is_protocol_failure() {
        let err = ResponseFrame::decode(b"{not json").unwrap_err();
        assert_eq!(err.kind(), "protocol");
    }

    #[test]
    fn test_response_wire_shape() {
        let json = serde_json::to_value(ResponseFrame::reply(9, json!({"ok": true}))).unwrap();
        assert_eq!(json, json!({"seq_id": 9, "outcome": {"reply": {"ok": true}}}));
    }
}
