//! Timeout enforcement.
//!
//! # Responsibilities
//! - Carry the send and receive bounds of one client
//! - Turn an elapsed deadline into a transport failure naming the phase

use std::future::Future;
use std::time::Duration;

use crate::error::{Failure, Phase, TransportFailure};

/// Per-phase bounds of one attempt.
///
/// Connecting and writing use `send`; waiting for the reply uses `receive`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub send: Duration,
    pub receive: Duration,
}

impl Timeouts {
    pub fn from_millis(send_ms: u64, receive_ms: u64) -> Self {
        Self {
            send: Duration::from_millis(send_ms),
            receive: Duration::from_millis(receive_ms),
        }
    }

    /// Bound used for a phase.
    pub fn for_phase(&self, phase: Phase) -> Duration {
        match phase {
            Phase::Connect | Phase::Send => self.send,
            Phase::Receive => self.receive,
        }
    }
}

impl Default for Timeouts {
    fn default() -> Self {
        Self::from_millis(1000, 2000)
    }
}

/// Run `fut`, failing with `TransportFailure::Timeout` once `duration` elapses.
pub async fn with_timeout<T, F>(duration: Duration, phase: Phase, fut: F) -> Result<T, Failure>
where
    F: Future<Output = Result<T, Failure>>,
{
    match tokio::time::timeout(duration, fut).await {
        Ok(result) => result,
        Err(_) => Err(TransportFailure::Timeout {
            phase,
            millis: duration.as_millis().min(u64::MAX as u128) as u64,
        }
        .into()),
    }
}
