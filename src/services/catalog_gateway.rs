//! Catalog gateway facade: product search and category lookups.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::{Reply, ServiceClient};
use crate::config::{ClientSettings, ClientsConfig, ConfigError, ServiceKind};
use crate::error::{ErrorCode, Failure, ValidationError};
use crate::load_balancer::Endpoint;
use crate::services::common::{
    optional_amount, optional_non_empty, optional_positive, optional_text, required_text,
};
use crate::transport::Connector;

const SERVICE: ServiceKind = ServiceKind::CatalogGateway;

/// Product search filters. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchProductRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_page: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id_list: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    /// Opaque filter groups, forwarded as is.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_group_list: Option<Vec<Value>>,
}

impl SearchProductRequest {
    pub fn validated(self) -> Result<Self, ValidationError> {
        Ok(Self {
            sort_by: optional_text("sort_by", self.sort_by)?,
            product_count: optional_positive("product_count", self.product_count)?,
            product_page: optional_positive("product_page", self.product_page)?,
            keyword: optional_text("keyword", self.keyword)?,
            category_id_list: optional_non_empty("category_id_list", self.category_id_list)?,
            min_price: optional_amount("min_price", self.min_price)?,
            max_price: optional_amount("max_price", self.max_price)?,
            filter_group_list: optional_non_empty("filter_group_list", self.filter_group_list)?,
        })
    }
}

#[derive(Serialize)]
struct ProductSkuAndMerchant {
    product_sku: String,
    original_merchant_original_id: String,
}

#[derive(Serialize)]
struct MatrixProductQuery {
    website_code: String,
    country_code: String,
    product_sku: String,
    original_merchant_original_id: String,
}

/// Client for the catalog gateway service.
#[derive(Debug, Clone)]
pub struct CatalogGatewayClient {
    client: ServiceClient,
}

impl CatalogGatewayClient {
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

    pub async fn search_product(&self, request: SearchProductRequest) -> Result<Reply<Value>, ValidationError> {
        let request = request.validated()?;
        Ok(self.client.reply("searchProduct", &request).await)
    }

    pub async fn get_category_by_id(&self, id: &str) -> Result<Reply<Value>, ValidationError> {
        let id = required_text("id", id)?;
        Ok(self.client.reply("getCategoryById", &serde_json::json!({ "id": id })).await)
    }

    pub async fn get_category_by_slug(&self, slug: &str) -> Result<Reply<Value>, ValidationError> {
        let slug = required_text("slug", slug)?;
        Ok(self.client.reply("getCategoryBySlug", &serde_json::json!({ "slug": slug })).await)
    }

    pub async fn get_category_by_original_category(
        &self,
        original_category_original_id: &str,
    ) -> Result<Reply<Value>, ValidationError> {
        let id = required_text("original_category_original_id", original_category_original_id)?;
        let request = serde_json::json!({ "original_category_original_id": id });
        Ok(self.client.reply("getCategoryByOriginalCategory", &request).await)
    }

    pub async fn get_category_by_product_sku_and_original_merchant(
        &self,
        product_sku: &str,
        original_merchant_original_id: &str,
    ) -> Result<Reply<Value>, ValidationError> {
        let request = ProductSkuAndMerchant {
            product_sku: required_text("product_sku", product_sku)?,
            original_merchant_original_id: required_text(
                "original_merchant_original_id",
                original_merchant_original_id,
            )?,
        };
        Ok(self
            .client
            .reply("getCategoryByProductSkuAndOriginalMerchant", &request)
            .await)
    }

    /// `data_map` maps product SKU to original merchant id.
    pub async fn multi_get_breadcrumb_list_by_product_sku_and_original_merchant(
        &self,
        data_map: BTreeMap<String, String>,
    ) -> Result<Reply<Value>, ValidationError> {
        if data_map.is_empty() {
            return Err(ValidationError::invalid("data_map", "must not be empty"));
        }
        Ok(self
            .client
            .reply(
                "multiGetBreadcrumbListByProductSkuAndOriginalMerchant",
                &serde_json::json!({ "data_map": data_map }),
            )
            .await)
    }

    pub async fn get_matrix_product(
        &self,
        website_code: &str,
        country_code: &str,
        product_sku: &str,
        original_merchant_original_id: &str,
    ) -> Result<Reply<Value>, ValidationError> {
        let request = MatrixProductQuery {
            website_code: required_text("website_code", website_code)?,
            country_code: required_text("country_code", country_code)?,
            product_sku: required_text("product_sku", product_sku)?,
            original_merchant_original_id: required_text(
                "original_merchant_original_id",
                original_merchant_original_id,
            )?,
        };
        Ok(self.client.reply("getMatrixProduct", &request).await)
    }
}
