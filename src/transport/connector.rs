//! Connection factory seam.

use async_trait::async_trait;

use crate::error::Failure;
use crate::load_balancer::Endpoint;
use crate::resilience::Timeouts;
use crate::transport::protocol::{RequestFrame, ResponseFrame};

/// Opens one connection to one endpoint.
#[async_trait]
pub trait Connector: Send + Sync + std::fmt::Debug {
    /// Connect, bounded by `timeouts.send`.
    async fn connect(&self, endpoint: &Endpoint, timeouts: Timeouts) -> Result<Box<dyn Connection>, Failure>;
}

/// An open connection good for a single call.
#[async_trait]
pub trait Connection: Send {
    /// Send a request and wait for the matching response.
    async fn call(&mut self, frame: &RequestFrame) -> Result<ResponseFrame, Failure>;

    /// Send a request that expects no response.
    async fn send_oneway(&mut self, frame: &RequestFrame) -> Result<(), Failure>;

    async fn close(&mut self) -> Result<(), Failure>;
}
