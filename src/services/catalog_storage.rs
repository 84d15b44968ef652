//! Catalog storage facade: products and categories by id or slug.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Value};

use crate::client::{Reply, ServiceClient};
use crate::config::{ClientSettings, ClientsConfig, ConfigError, ServiceKind};
use crate::error::{ErrorCode, Failure, ValidationError};
use crate::load_balancer::Endpoint;
use crate::services::common::{non_empty, optional_non_negative, optional_positive, optional_text, required_text};
use crate::transport::Connector;

const SERVICE: ServiceKind = ServiceKind::CatalogStorage;

#[derive(Serialize)]
struct SliceQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    from_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<i64>,
}

#[derive(Serialize)]
struct CategoryMappingQuery {
    id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    child_depth: Option<i64>,
}

/// Client for the catalog storage service.
#[derive(Debug, Clone)]
pub struct CatalogStorageClient {
    client: ServiceClient,
}

impl CatalogStorageClient {
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

    pub fn set_trace_id(&self, trace_id: &str) -> Result<(), ValidationError> {
        self.client.set_trace_id(trace_id)
    }

    pub fn assign_trace_id(&self) -> String {
        self.client.assign_trace_id()
    }

    pub fn last_failure(&self) -> Option<Failure> {
        self.client.last_failure()
    }

    pub fn health(&self) -> Vec<(Endpoint, bool)> {
        self.client.health()
    }

    pub async fn get_product_by_id(&self, id: &str) -> Result<Reply<Value>, ValidationError> {
        let id = required_text("id", id)?;
        Ok(self.client.reply("getProductById", &json!({ "id": id })).await)
    }

    pub async fn multi_get_product_by_id_list(&self, id_list: Vec<String>) -> Result<Reply<Value>, ValidationError> {
        let id_list = non_empty("id_list", id_list)?;
        Ok(self.client.reply("multiGetProductById", &json!({ "id_list": id_list })).await)
    }

    /// Page through products starting after `from_id`.
    pub async fn get_slice_product(
        &self,
        from_id: Option<String>,
        limit: Option<i64>,
    ) -> Result<Reply<Value>, ValidationError> {
        let query = SliceQuery {
            from_id: optional_text("from_id", from_id)?,
            limit: optional_positive("limit", limit)?,
        };
        Ok(self.client.reply("getSliceProduct", &query).await)
    }

    pub async fn get_category_by_id(&self, id: &str) -> Result<Reply<Value>, ValidationError> {
        let id = required_text("id", id)?;
        Ok(self.client.reply("getCategoryById", &json!({ "id": id })).await)
    }

    pub async fn multi_get_category_by_id_list(&self, id_list: Vec<String>) -> Result<Reply<Value>, ValidationError> {
        let id_list = non_empty("id_list", id_list)?;
        Ok(self.client.reply("multiGetCategoryById", &json!({ "id_list": id_list })).await)
    }

    pub async fn get_category_by_slug(&self, slug: &str) -> Result<Reply<Value>, ValidationError> {
        let slug = required_text("slug", slug)?;
        Ok(self.client.reply("getCategoryBySlug", &json!({ "slug": slug })).await)
    }

    pub async fn multi_get_category_by_slug_list(
        &self,
        slug_list: Vec<String>,
    ) -> Result<Reply<Value>, ValidationError> {
        let slug_list = non_empty("slug_list", slug_list)?;
        Ok(self
            .client
            .reply("multiGetCategoryBySlug", &json!({ "slug_list": slug_list }))
            .await)
    }

    pub async fn get_category_mapping_by_id(
        &self,
        id: &str,
        child_depth: Option<i64>,
    ) -> Result<Reply<Value>, ValidationError> {
        let query = CategoryMappingQuery {
            id: required_text("id", id)?,
            child_depth: optional_non_negative("child_depth", child_depth)?,
        };
        Ok(self.client.reply("getCategoryMappingById", &query).await)
    }
}
