//! Event-bus notifier facade: publish typed messages to configured topics.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::task::JoinHandle;

use crate::client::{OnewayOutcome, Reply, ServiceClient};
use crate::config::{ClientsConfig, ConfigError, EventBusSettings, ServiceKind};
use crate::error::{ErrorCode, Failure, ValidationError};
use crate::load_balancer::Endpoint;
use crate::transport::Connector;

const SERVICE: ServiceKind = ServiceKind::EventBus;

/// Data types the bus carries, with the remote method publishing each.
pub trait MessageData: Serialize + Send + Sync + 'static {
    const METHOD: &'static str;

    fn check(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

impl MessageData for bool {
    const METHOD: &'static str = "notifyBoolean";
}

impl MessageData for i64 {
    const METHOD: &'static str = "notifyInteger";
}

impl MessageData for f64 {
    const METHOD: &'static str = "notifyDouble";
}

impl MessageData for String {
    const METHOD: &'static str = "notifyString";

    fn check(&self) -> Result<(), ValidationError> {
        if self.is_empty() {
            return Err(ValidationError::invalid("data", "must not be empty"));
        }
        Ok(())
    }
}

/// A message to publish.
///
/// `topic` must equal one of the notifier's topics; `topic` and `key` are sent
/// unchanged, since the key picks the partition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message<T> {
    pub topic: String,
    pub key: Option<String>,
    pub data: Option<T>,
}

impl<T> Message<T> {
    pub fn new(topic: impl Into<String>, data: T) -> Self {
        Self {
            topic: topic.into(),
            key: None,
            data: Some(data),
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }
}

#[derive(Debug, Serialize)]
struct MessageInfo<T> {
    client_id: String,
    topic: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
}

#[derive(Debug, Serialize)]
struct NotifyRequest<T> {
    message_info: MessageInfo<T>,
}

/// Publisher for the event bus.
#[derive(Debug, Clone)]
pub struct EventBusNotifier {
    client: ServiceClient,
    client_id: Arc<str>,
    topics: Arc<[String]>,
}

impl EventBusNotifier {
    pub fn new(settings: EventBusSettings) -> Self {
        let client = ServiceClient::new(SERVICE.name(), settings.client);
        Self::assemble(client, settings.client_id, settings.topics)
    }

    pub fn with_connector(settings: EventBusSettings, connector: Arc<dyn Connector>) -> Self {
        let client = ServiceClient::with_connector(SERVICE.name(), settings.client, connector);
        Self::assemble(client, settings.client_id, settings.topics)
    }

    pub fn from_config(config: &ClientsConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(config.require_event_bus()?))
    }

    fn assemble(client: ServiceClient, client_id: String, topics: Vec<String>) -> Self {
        Self {
            client,
            client_id: client_id.into(),
            topics: topics.into(),
        }
    }

    pub fn client(&self) -> &ServiceClient {
        &self.client
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn topics(&self) -> &[String] {
        &self.topics
    }

    pub async fn ping(&self) -> ErrorCode {
        self.client.ping().await
    }

    pub fn last_failure(&self) -> Option<Failure> {
        self.client.last_failure()
    }

    pub fn health(&self) -> Vec<(Endpoint, bool)> {
        self.client.health()
    }

    /// Publish and wait for the bus to acknowledge.
    pub async fn notify<T: MessageData>(&self, message: Message<T>) -> Result<Reply<Value>, ValidationError> {
        let request = self.request(message)?;
        Ok(self.client.reply(T::METHOD, &request).await)
    }

    /// Publish without waiting for an acknowledgement.
    pub async fn notify_oneway<T: MessageData>(&self, message: Message<T>) -> Result<OnewayOutcome, ValidationError> {
        let request = self.request(message)?;
        Ok(self.client.call_oneway(T::METHOD, &request).await)
    }

    /// Publish from a spawned task. Must run inside a Tokio runtime.
    pub fn notify_detached<T: MessageData>(
        &self,
        message: Message<T>,
    ) -> Result<JoinHandle<OnewayOutcome>, ValidationError> {
        let request = self.request(message)?;
        Ok(self.client.spawn_oneway(T::METHOD, &request))
    }

    pub async fn notify_boolean(&self, message: Message<bool>) -> Result<Reply<Value>, ValidationError> {
        self.notify(message).await
    }

    pub async fn notify_boolean_oneway(&self, message: Message<bool>) -> Result<OnewayOutcome, ValidationError> {
        self.notify_oneway(message).await
    }

    pub fn notify_boolean_detached(
        &self,
        message: Message<bool>,
    ) -> Result<JoinHandle<OnewayOutcome>, ValidationError> {
        self.notify_detached(message)
    }

    pub async fn notify_integer(&self, message: Message<i64>) -> Result<Reply<Value>, ValidationError> {
        self.notify(message).await
    }

    pub async fn notify_integer_oneway(&self, message: Message<i64>) -> Result<OnewayOutcome, ValidationError> {
        self.notify_oneway(message).await
    }

    pub fn notify_integer_detached(&self, message: Message<i64>) -> Result<JoinHandle<OnewayOutcome>, ValidationError> {
        self.notify_detached(message)
    }

    pub async fn notify_double(&self, message: Message<f64>) -> Result<Reply<Value>, ValidationError> {
        self.notify(message).await
    }

    pub async fn notify_double_oneway(&self, message: Message<f64>) -> Result<OnewayOutcome, ValidationError> {
        self.notify_oneway(message).await
    }

    pub fn notify_double_detached(&self, message: Message<f64>) -> Result<JoinHandle<OnewayOutcome>, ValidationError> {
        self.notify_detached(message)
    }

    pub async fn notify_string(&self, message: Message<String>) -> Result<Reply<Value>, ValidationError> {
        self.notify(message).await
    }

    pub async fn notify_string_oneway(&self, message: Message<String>) -> Result<OnewayOutcome, ValidationError> {
        self.notify_oneway(message).await
    }

    pub fn notify_string_detached(
        &self,
        message: Message<String>,
    ) -> Result<JoinHandle<OnewayOutcome>, ValidationError> {
        self.notify_detached(message)
    }

    fn request<T: MessageData>(&self, message: Message<T>) -> Result<NotifyRequest<T>, ValidationError> {
        if message.topic.is_empty() {
            return Err(ValidationError::invalid("topic", "must not be empty"));
        }
        if !self.topics.iter().any(|t| *t == message.topic) {
            return Err(ValidationError::invalid("topic", "must be a configured topic"));
        }
        if let Some(data) = &message.data {
            data.check()?;
        }

        Ok(NotifyRequest {
            message_info: MessageInfo {
                client_id: self.client_id.to_string(),
                topic: message.topic,
                key: message.key,
                data: message.data,
            },
        })
    }
}
