//! Handle shared by every facade.
//!
//! # Responsibilities
//! - Own the retry engine, the connector and the operation context of one client
//! - Run value-returning and fire-and-forget calls through the retry engine
//! - Expose diagnostics: last failure and a health snapshot

use std::sync::Arc;

use arc_swap::ArcSwap;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::Instrument;

use crate::client::context::OperationContext;
use crate::client::reply::{OnewayOutcome, Reply};
use crate::config::ClientSettings;
use crate::error::{ErrorCode, Exhausted, Failure, ValidationError};
use crate::health::HealthTracker;
use crate::load_balancer::{Endpoint, HostPool, SelectionPolicy};
use crate::observability::tracing::{call_span, new_trace_id};
use crate::resilience::{RetryingInvoker, Timeouts};
use crate::transport::{Connector, RequestFrame, TcpConnector};

/// Cheap, cloneable client for one remote service.
#[derive(Debug, Clone)]
pub struct ServiceClient {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    invoker: RetryingInvoker,
    connector: Arc<dyn Connector>,
    timeouts: Timeouts,
    context: ArcSwap<OperationContext>,
}

impl ServiceClient {
    /// Client talking plain framed TCP.
    pub fn new(service: &'static str, settings: ClientSettings) -> Self {
        Self::with_connector(service, settings, Arc::new(TcpConnector))
    }

    pub fn with_connector(service: &'static str, settings: ClientSettings, connector: Arc<dyn Connector>) -> Self {
        let health = Arc::new(HealthTracker::new(&settings.pool));
        let invoker = RetryingInvoker::new(
            service,
            settings.pool,
            health,
            settings.policy,
            settings.number_of_retries,
        );

        tracing::info!(
            service,
            endpoints = invoker.pool().len(),
            policy = %invoker.policy(),
            retries = invoker.number_of_retries(),
            "Service client created"
        );

        Self {
            inner: Arc::new(Inner {
                invoker,
                connector,
                timeouts: settings.timeouts,
                context: ArcSwap::from_pointee(OperationContext::new(settings.credentials)),
            }),
        }
    }

    /// Call `method` and decode its reply.
    pub async fn call<Req, Resp>(&self, method: &'static str, request: &Req) -> Result<Resp, Exhausted>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let payload = encode_payload(method, request)?;
        self.call_value(method, payload).await
    }

    /// Call `method`, turning exhaustion into a default reply.
    pub async fn reply<Req, T>(&self, method: &'static str, request: &Req) -> Reply<T>
    where
        Req: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        match self.call::<Req, Reply<T>>(method, request).await {
            Ok(reply) => reply,
            Err(exhausted) => Reply::from_exhausted(&exhausted),
        }
    }

    /// Send `method` without waiting for a response.
    pub async fn call_oneway<Req>(&self, method: &'static str, request: &Req) -> OnewayOutcome
    where
        Req: Serialize + ?Sized,
    {
        match encode_payload(method, request) {
            Ok(payload) => self.send_value(method, payload).await,
            Err(exhausted) => OnewayOutcome::Undelivered(exhausted),
        }
    }

    /// Like `call_oneway`, on a spawned task. Must run inside a Tokio runtime.
    pub fn spawn_oneway<Req>(&self, method: &'static str, request: &Req) -> JoinHandle<OnewayOutcome>
    where
        Req: Serialize + ?Sized,
    {
        let payload = encode_payload(method, request);
        let client = self.clone();
        tokio::spawn(async move {
            match payload {
                Ok(payload) => client.send_value(method, payload).await,
                Err(exhausted) => OnewayOutcome::Undelivered(exhausted),
            }
        })
    }

    /// Liveness probe; exhaustion yields the exhaustion code.
    pub async fn ping(&self) -> ErrorCode {
        match self.call::<_, ErrorCode>("ping", &()).await {
            Ok(code) => code,
            Err(exhausted) => exhausted.code,
        }
    }

    /// Set the trace id sent with subsequent calls.
    pub fn set_trace_id(&self, trace_id: &str) -> Result<(), ValidationError> {
        let trace_id = trace_id.trim();
        if trace_id.is_empty() {
            return Err(ValidationError::invalid("trace_id", "must not be empty"));
        }
        self.store_trace_id(trace_id.to_string());
        Ok(())
    }

    /// Generate a fresh trace id, install it and return it.
    pub fn assign_trace_id(&self) -> String {
        let trace_id = new_trace_id();
        self.store_trace_id(trace_id.clone());
        trace_id
    }

    pub fn trace_id(&self) -> Option<String> {
        self.inner.context.load().trace_id.clone()
    }

    pub fn context(&self) -> Arc<OperationContext> {
        self.inner.context.load_full()
    }

    pub fn last_failure(&self) -> Option<Failure> {
        self.inner.invoker.last_failure()
    }

    /// Health flags in pool order.
    pub fn health(&self) -> Vec<(Endpoint, bool)> {
        self.inner.invoker.health().snapshot(self.pool())
    }

    pub fn health_tracker(&self) -> &Arc<HealthTracker> {
        self.inner.invoker.health()
    }

    pub fn pool(&self) -> &HostPool {
        self.inner.invoker.pool()
    }

    pub fn policy(&self) -> SelectionPolicy {
        self.inner.invoker.policy()
    }

    pub fn timeouts(&self) -> Timeouts {
        self.inner.timeouts
    }

    pub fn service(&self) -> &'static str {
        self.inner.invoker.service()
    }

    fn store_trace_id(&self, trace_id: String) {
        self.inner.context.rcu(|current| {
            let mut next = OperationContext::clone(current);
            next.trace_id = Some(trace_id.clone());
            next
        });
    }

    async fn call_value<Resp>(&self, method: &'static str, payload: Value) -> Result<Resp, Exhausted>
    where
        Resp: DeserializeOwned,
    {
        let context = self.inner.context.load_full();
        let span = call_span(self.service(), method, context.trace_id.as_deref());
        let inner = &self.inner;

        inner
            .invoker
            .invoke(method, |endpoint| {
                let frame = RequestFrame::new(method, false, OperationContext::clone(&context), payload.clone());
                let connector = inner.connector.clone();
                let timeouts = inner.timeouts;
                async move {
                    let mut connection = connector.connect(&endpoint, timeouts).await?;
                    let result = connection.call(&frame).await;
                    close_quietly(connection.as_mut(), &endpoint).await;

                    let value = result?.into_value()?;
                    serde_json::from_value(value)
                        .map_err(|e| Failure::Protocol(format!("Undecodable reply for {}: {}", method, e)))
                }
            })
            .instrument(span)
            .await
    }

    async fn send_value(&self, method: &'static str, payload: Value) -> OnewayOutcome {
        let context = self.inner.context.load_full();
        let span = call_span(self.service(), method, context.trace_id.as_deref());
        let inner = &self.inner;

        inner
            .invoker
            .invoke(method, |endpoint| {
                let frame = RequestFrame::new(method, true, OperationContext::clone(&context), payload.clone());
                let connector = inner.connector.clone();
                let timeouts = inner.timeouts;
                async move {
                    let mut connection = connector.connect(&endpoint, timeouts).await?;
                    let result = connection.send_oneway(&frame).await;
                    close_quietly(connection.as_mut(), &endpoint).await;
                    result
                }
            })
            .instrument(span)
            .await
            .into()
    }
}

fn encode_payload<Req>(method: &'static str, request: &Req) -> Result<Value, Exhausted>
where
    Req: Serialize + ?Sized,
{
    serde_json::to_value(request).map_err(|e| {
        tracing::error!(method, error = %e, "Failed to encode request");
        Exhausted::new(0, Some(Failure::Generic(format!("Failed to encode request: {}", e))))
    })
}

async fn close_quietly(connection: &mut dyn crate::transport::Connection, endpoint: &Endpoint) {
    if let Err(e) = connection.close().await {
        tracing::debug!(endpoint = %endpoint, error = %e, "Error closing connection");
    }
}
