//! Shared utilities for integration tests: framed mock services on loopback.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::{json, Value};
use tokio::net::TcpListener;

use rpc_facade::client::Credentials;
use rpc_facade::config::{ClientSettings, ServiceKind};
use rpc_facade::load_balancer::{Endpoint, HostPool, SelectionPolicy};
use rpc_facade::resilience::Timeouts;
use rpc_facade::transport::framed::{read_frame, write_frame};
use rpc_facade::transport::{RequestFrame, ResponseFrame};

/// What the mock does with one request.
#[derive(Debug, Clone)]
pub enum Action {
    Reply(Value),
    Exception(String),
    /// Read the request and never answer.
    Silent,
    /// Close the socket without answering.
    Hangup,
}

/// A running mock service.
#[derive(Debug, Clone)]
pub struct MockServer {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<RequestFrame>>>,
    accepted: Arc<AtomicUsize>,
}

impl MockServer {
    pub fn endpoint(&self) -> Endpoint {
        Endpoint::new("127.0.0.1", self.addr.port())
    }

    pub fn host(&self) -> String {
        self.endpoint().key()
    }

    pub fn accepted(&self) -> usize {
        self.accepted.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<RequestFrame> {
        self.requests.lock().unwrap().clone()
    }

    pub fn methods(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.method).collect()
    }

    /// Wait until `count` requests were recorded; oneway frames arrive after the caller returns.
    pub async fn wait_for_requests(&self, count: usize) -> Vec<RequestFrame> {
        for _ in 0..200 {
            let requests = self.requests();
            if requests.len() >= count {
                return requests;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.requests()
    }
}

/// Start a mock answering every request with a success reply carrying `data`.
pub async fn start_mock_service(data: Value) -> MockServer {
    start_programmable_service(move |_| Action::Reply(json!({"error": {"code": "SUCCESS"}, "data": data.clone()}))).await
}

/// Start a mock whose answer is decided per request.
pub async fn start_programmable_service<F>(f: F) -> MockServer
where
    F: Fn(&RequestFrame) -> Action + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let server = MockServer {
        addr: listener.local_addr().unwrap(),
        requests: Arc::new(Mutex::new(Vec::new())),
        accepted: Arc::new(AtomicUsize::new(0)),
    };

    let f = Arc::new(f);
    let state = server.clone();
    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            state.accepted.fetch_add(1, Ordering::SeqCst);

            let f = f.clone();
            let requests = state.requests.clone();
            tokio::spawn(async move {
                let Ok(data) = read_frame(&mut socket).await else {
                    return;
                };
                let Ok(request) = RequestFrame::decode(&data) else {
                    return;
                };
                requests.lock().unwrap().push(request.clone());
                if request.oneway {
                    return;
                }

                let response = match f(&request) {
                    Action::Reply(value) => ResponseFrame::reply(request.seq_id, value),
                    Action::Exception(message) => ResponseFrame::exception(request.seq_id, message),
                    Action::Silent => {
                        tokio::time::sleep(Duration::from_secs(30)).await;
                        return;
                    }
                    Action::Hangup => return,
                };
                let _ = write_frame(&mut socket, &response.encode().unwrap()).await;
            });
        }
    });

    server
}

/// A loopback endpoint nothing listens on.
pub async fn closed_endpoint() -> Endpoint {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    Endpoint::new("127.0.0.1", port)
}

/// Settings with short timeouts for loopback tests.
pub fn settings(endpoints: Vec<Endpoint>, policy: SelectionPolicy, retries: usize) -> ClientSettings {
    let mut settings = ClientSettings::with_defaults(
        ServiceKind::CatalogStorage,
        HostPool::from_endpoints(endpoints).unwrap(),
        Credentials::new("tester", "secret"),
    );
    settings.timeouts = Timeouts::from_millis(200, 300);
    settings.policy = policy;
    settings.number_of_retries = retries;
    settings
}
