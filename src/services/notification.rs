//! Notification facade: per-user counters and notification items.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::task::JoinHandle;

use crate::client::{OnewayOutcome, Reply, ServiceClient};
use crate::config::{ClientSettings, ClientsConfig, ConfigError, ServiceKind};
use crate::error::{ErrorCode, Failure, ValidationError};
use crate::load_balancer::Endpoint;
use crate::services::common::{non_blank, non_negative, positive, required_text};
use crate::transport::Connector;

const SERVICE: ServiceKind = ServiceKind::Notification;

/// Audience of a notification item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TargetUserType {
    All,
    Registered,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct CounterQuery {
    publisher: String,
    user_id: i64,
}

impl CounterQuery {
    fn new(publisher: &str, user_id: i64) -> Result<Self, ValidationError> {
        Ok(Self {
            publisher: required_text("publisher", publisher)?,
            user_id: positive("user_id", user_id)?,
        })
    }
}

/// Page of a user's items. Out-of-range optional fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetItemListRequest {
    pub publisher: String,
    pub user_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_item_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
}

impl GetItemListRequest {
    pub fn new(publisher: impl Into<String>, user_id: i64) -> Self {
        Self {
            publisher: publisher.into(),
            user_id,
            ..Self::default()
        }
    }

    fn validated(self) -> Result<Self, ValidationError> {
        Ok(Self {
            publisher: required_text("publisher", &self.publisher)?,
            user_id: non_negative("user_id", self.user_id)?,
            group_id: self.group_id.filter(|v| *v >= 0),
            from_item_id: self.from_item_id.filter(|v| *v > 0),
            limit: self.limit.filter(|v| *v > 0),
        })
    }
}

/// A new notification item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertItemRequest {
    pub publisher: String,
    pub target_user_type: TargetUserType,
    pub id: i64,
    pub group_id: i64,
    pub type_id: i64,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registered_user_ids: Option<BTreeSet<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Only sent together with a `url`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_target_blank: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl InsertItemRequest {
    pub fn new(
        publisher: impl Into<String>,
        target_user_type: TargetUserType,
        id: i64,
        group_id: i64,
        type_id: i64,
        title: impl Into<String>,
    ) -> Self {
        Self {
            publisher: publisher.into(),
            target_user_type,
            id,
            group_id,
            type_id,
            title: title.into(),
            registered_user_ids: None,
            content: None,
            url: None,
            is_target_blank: None,
            image_url: None,
        }
    }

    fn validated(self) -> Result<Self, ValidationError> {
        let url = non_blank(self.url);
        let is_target_blank = if url.is_some() { self.is_target_blank } else { None };

        Ok(Self {
            publisher: required_text("publisher", &self.publisher)?,
            target_user_type: self.target_user_type,
            id: positive("id", self.id)?,
            group_id: non_negative("group_id", self.group_id)?,
            type_id: non_negative("type_id", self.type_id)?,
            title: required_text("title", &self.title)?,
            registered_user_ids: self.registered_user_ids.filter(|ids| !ids.is_empty()),
            content: non_blank(self.content),
            url,
            is_target_blank,
            image_url: non_blank(self.image_url),
        })
    }
}

/// Partial update of an item. At least one field besides the keys must be set.
///
/// `content`, `url` and `image_url` are sent even when blank, which clears them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateItemRequest {
    pub publisher: String,
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_target_blank: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl UpdateItemRequest {
    pub fn new(publisher: impl Into<String>, id: i64) -> Self {
        Self {
            publisher: publisher.into(),
            id,
            ..Self::default()
        }
    }

    fn validated(self) -> Result<Self, ValidationError> {
        let trim = |value: Option<String>| value.map(|v| v.trim().to_string());

        let request = Self {
            publisher: required_text("publisher", &self.publisher)?,
            id: positive("id", self.id)?,
            type_id: self.type_id.filter(|v| *v >= 0),
            title: non_blank(self.title),
            content: trim(self.content),
            url: trim(self.url),
            is_target_blank: self.is_target_blank,
            image_url: trim(self.image_url),
        };

        let nothing_set = request.type_id.is_none()
            && request.title.is_none()
            && request.content.is_none()
            && request.url.is_none()
            && request.is_target_blank.is_none()
            && request.image_url.is_none();
        if nothing_set {
            return Err(ValidationError::NothingToUpdate);
        }
        Ok(request)
    }
}

/// Mark an item read (default) or unread for a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateReadItemRequest {
    pub publisher: String,
    pub user_id: i64,
    pub id: i64,
    pub is_read: bool,
}

impl UpdateReadItemRequest {
    pub fn new(publisher: impl Into<String>, user_id: i64, id: i64) -> Self {
        Self {
            publisher: publisher.into(),
            user_id,
            id,
            is_read: true,
        }
    }

    fn validated(self) -> Result<Self, ValidationError> {
        Ok(Self {
            publisher: required_text("publisher", &self.publisher)?,
            user_id: positive("user_id", self.user_id)?,
            id: positive("id", self.id)?,
            is_read: self.is_read,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct DeleteItemQuery {
    publisher: String,
    id: i64,
}

impl DeleteItemQuery {
    fn new(publisher: &str, id: i64) -> Result<Self, ValidationError> {
        Ok(Self {
            publisher: required_text("publisher", publisher)?,
            id: positive("id", id)?,
        })
    }
}

/// Client for the notification service.
#[derive(Debug, Clone)]
pub struct NotificationClient {
    client: ServiceClient,
}

impl NotificationClient {
    pub fn new(settings: ClientSettings) -> Self {
        Self {
            client: ServiceClient::new(SERVICE.name(), settings),
        }
    }

    pub fn with_connector(settings: ClientSettings, connector: Arc<dyn Connector>) -> Self {
        Self {
            client: ServiceClient::with_connector(SERVICE.name(), settings, connector),
        }
    }

    pub fn from_config(config: &ClientsConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(config.require(SERVICE)?))
    }

    pub fn client(&self) -> &ServiceClient {
        &self.client
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

    /// Unread counter of a user.
    pub async fn get_counter(&self, publisher: &str, user_id: i64) -> Result<Reply<i64>, ValidationError> {
        let query = CounterQuery::new(publisher, user_id)?;
        Ok(self.client.reply("getCounter", &query).await)
    }

    pub async fn reset_counter(&self, publisher: &str, user_id: i64) -> Result<Reply<Value>, ValidationError> {
        self.reply("resetCounter", CounterQuery::new(publisher, user_id)).await
    }

    pub async fn reset_counter_oneway(&self, publisher: &str, user_id: i64) -> Result<OnewayOutcome, ValidationError> {
        self.oneway("resetCounter", CounterQuery::new(publisher, user_id)).await
    }

    pub fn reset_counter_detached(
        &self,
        publisher: &str,
        user_id: i64,
    ) -> Result<JoinHandle<OnewayOutcome>, ValidationError> {
        self.detached("resetCounter", CounterQuery::new(publisher, user_id))
    }

    pub async fn get_item_list(&self, request: GetItemListRequest) -> Result<Reply<Value>, ValidationError> {
        self.reply("getItemList", request.validated()).await
    }

    pub async fn insert_item(&self, request: InsertItemRequest) -> Result<Reply<Value>, ValidationError> {
        self.reply("insertItem", request.validated()).await
    }

    pub async fn insert_item_oneway(&self, request: InsertItemRequest) -> Result<OnewayOutcome, ValidationError> {
        self.oneway("insertItem", request.validated()).await
    }

    pub fn insert_item_detached(&self, request: InsertItemRequest) -> Result<JoinHandle<OnewayOutcome>, ValidationError> {
        self.detached("insertItem", request.validated())
    }

    pub async fn update_item(&self, request: UpdateItemRequest) -> Result<Reply<Value>, ValidationError> {
        self.reply("updateItem", request.validated()).await
    }

    pub async fn update_item_oneway(&self, request: UpdateItemRequest) -> Result<OnewayOutcome, ValidationError> {
        self.oneway("updateItem", request.validated()).await
    }

    pub fn update_item_detached(&self, request: UpdateItemRequest) -> Result<JoinHandle<OnewayOutcome>, ValidationError> {
        self.detached("updateItem", request.validated())
    }

    pub async fn update_read_item(&self, request: UpdateReadItemRequest) -> Result<Reply<Value>, ValidationError> {
        self.reply("updateReadItem", request.validated()).await
    }

    pub async fn update_read_item_oneway(
        &self,
        request: UpdateReadItemRequest,
    ) -> Result<OnewayOutcome, ValidationError> {
        self.oneway("updateReadItem", request.validated()).await
    }

    pub fn update_read_item_detached(
        &self,
        request: UpdateReadItemRequest,
    ) -> Result<JoinHandle<OnewayOutcome>, ValidationError> {
        self.detached("updateReadItem", request.validated())
    }

    pub async fn delete_item(&self, publisher: &str, id: i64) -> Result<Reply<Value>, ValidationError> {
        self.reply("deleteItem", DeleteItemQuery::new(publisher, id)).await
    }

    pub async fn delete_item_oneway(&self, publisher: &str, id: i64) -> Result<OnewayOutcome, ValidationError> {
        self.oneway("deleteItem", DeleteItemQuery::new(publisher, id)).await
    }

    pub fn delete_item_detached(&self, publisher: &str, id: i64) -> Result<JoinHandle<OnewayOutcome>, ValidationError> {
        self.detached("deleteItem", DeleteItemQuery::new(publisher, id))
    }

    async fn reply<R: Serialize>(
        &self,
        method: &'static str,
        request: Result<R, ValidationError>,
    ) -> Result<Reply<Value>, ValidationError> {
        let request = request?;
        Ok(self.client.reply(method, &request).await)
    }

    async fn oneway<R: Serialize>(
        &self,
        method: &'static str,
        request: Result<R, ValidationError>,
    ) -> Result<OnewayOutcome, ValidationError> {
        let request = request?;
        Ok(self.client.call_oneway(method, &request).await)
    }

    fn detached<R: Serialize>(
        &self,
        method: &'static str,
        request: Result<R, ValidationError>,
    ) -> Result<JoinHandle<OnewayOutcome>, ValidationError> {
        let request = request?;
        Ok(self.client.spawn_oneway(method, &request))
    }
}
