//! In-memory connector for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{Failure, TransportFailure};
use crate::load_balancer::Endpoint;
use crate::resilience::Timeouts;
use crate::transport::connector::{Connection, Connector};
use crate::transport::protocol::{RequestFrame, ResponseFrame};

/// Accepts connections to hosts named in `up` and answers every call with `reply`.
#[derive(Debug)]
pub(crate) struct ScriptedConnector {
    up: Vec<&'static str>,
    reply: Value,
    connects: AtomicUsize,
    frames: Arc<Mutex<Vec<RequestFrame>>>,
}

impl ScriptedConnector {
    pub(crate) fn new(up: &[&'static str], reply: Value) -> Arc<Self> {
        Arc::new(Self {
            up: up.to_vec(),
            reply,
            connects: AtomicUsize::new(0),
            frames: Arc::new(Mutex::new(Vec::new())),
        })
    }

    pub(crate) fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub(crate) fn frames(&self) -> Vec<RequestFrame> {
        self.frames.lock().map(|f| f.clone()).unwrap_or_default()
    }

    pub(crate) fn last_payload(&self) -> Option<Value> {
        self.frames().last().map(|f| f.payload.clone())
    }
}

#[async_trait]
impl Connector for ScriptedConnector {
    async fn connect(&self, endpoint: &Endpoint, _timeouts: Timeouts) -> Result<Box<dyn Connection>, Failure> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        if !self.up.iter().any(|host| *host == endpoint.host()) {
            return Err(TransportFailure::Connect(format!("{}: refused", endpoint)).into());
        }
        Ok(Box::new(ScriptedConnection {
            reply: self.reply.clone(),
            frames: self.frames.clone(),
        }))
    }
}

struct ScriptedConnection {
    reply: Value,
    frames: Arc<Mutex<Vec<RequestFrame>>>,
}

impl ScriptedConnection {
    fn record(&self, frame: &RequestFrame) {
        if let Ok(mut frames) = self.frames.lock() {
            frames.push(frame.clone());
        }
    }
}

#[async_trait]
impl Connection for ScriptedConnection {
    async fn call(&mut self, frame: &RequestFrame) -> Result<ResponseFrame, Failure> {
        self.record(frame);
        Ok(ResponseFrame::reply(frame.seq_id, self.reply.clone()))
    }

    async fn send_oneway(&mut self, frame: &RequestFrame) -> Result<(), Failure> {
        self.record(frame);
        Ok(())
    }

    async fn close(&mut self) -> Result<(), Failure> {
        Ok(())
    }
}
