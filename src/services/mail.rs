//! Mail facade: queue outgoing mail and query delivery info.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::task::JoinHandle;

use crate::client::{OnewayOutcome, Reply, ServiceClient};
use crate::config::{ClientSettings, ClientsConfig, ConfigError, ServiceKind};
use crate::error::{ErrorCode, Failure, ValidationError};
use crate::load_balancer::Endpoint;
use crate::services::common::{non_blank, non_negative, required_text};
use crate::transport::Connector;

const SERVICE: ServiceKind = ServiceKind::Mail;

/// Website a mail is sent on behalf of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FromWebsite {
    Fado,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContentType {
    Text,
    Html,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailNamePair {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl EmailNamePair {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: None,
        }
    }

    pub fn named(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: Some(name.into()),
        }
    }
}

/// A mail to queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendMailRequest {
    pub from_website: FromWebsite,
    pub content_type: ContentType,
    pub from_email: String,
    pub from_name: Option<String>,
    pub reply_to_list: Vec<EmailNamePair>,
    pub to_list: Vec<EmailNamePair>,
    pub cc_list: Vec<EmailNamePair>,
    pub bcc_list: Vec<EmailNamePair>,
    pub bounce_email: Option<String>,
    pub subject: String,
    pub content: String,
    pub success_callback_url_list: Vec<String>,
    pub error_callback_url_list: Vec<String>,
}

impl SendMailRequest {
    pub fn new(
        from_website: FromWebsite,
        content_type: ContentType,
        from_email: impl Into<String>,
        to_list: Vec<EmailNamePair>,
        subject: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            from_website,
            content_type,
            from_email: from_email.into(),
            from_name: None,
            reply_to_list: Vec::new(),
            to_list,
            cc_list: Vec::new(),
            bcc_list: Vec::new(),
            bounce_email: None,
            subject: subject.into(),
            content: content.into(),
            success_callback_url_list: Vec::new(),
            error_callback_url_list: Vec::new(),
        }
    }

    fn into_wire(self) -> Result<SendMailWire, ValidationError> {
        let from_email = required_text("from_email", &self.from_email)?;

        let to_list = recipients(self.to_list);
        if to_list.is_empty() {
            return Err(ValidationError::invalid("to_list", "must have a recipient with an e-mail"));
        }

        let subject = required_text("subject", &self.subject)?;
        let content = required_text("content", &self.content)?;

        Ok(SendMailWire {
            mail_info: MailInfo {
                from_website: self.from_website,
                content_type: self.content_type,
                from_email,
                from_name: non_blank(self.from_name),
                reply_to_list: recipients(self.reply_to_list),
                to_list,
                cc_list: recipients(self.cc_list),
                bcc_list: recipients(self.bcc_list),
                bounce_email: non_blank(self.bounce_email),
                subject,
                content,
            },
            callback_url: CallbackUrl {
                success_list: urls(self.success_callback_url_list),
                error_list: urls(self.error_callback_url_list),
            },
        })
    }
}

/// Trim entries, dropping those without an e-mail.
fn recipients(list: Vec<EmailNamePair>) -> Vec<EmailNamePair> {
    list.into_iter()
        .filter_map(|pair| {
            let email = pair.email.trim();
            if email.is_empty() {
                return None;
            }
            Some(EmailNamePair {
                email: email.to_string(),
                name: non_blank(pair.name),
            })
        })
        .collect()
}

fn urls(list: Vec<String>) -> Vec<String> {
    list.into_iter().filter_map(|url| non_blank(Some(url))).collect()
}

#[derive(Debug, Serialize)]
struct MailInfo {
    from_website: FromWebsite,
    content_type: ContentType,
    from_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    from_name: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    reply_to_list: Vec<EmailNamePair>,
    to_list: Vec<EmailNamePair>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    cc_list: Vec<EmailNamePair>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    bcc_list: Vec<EmailNamePair>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bounce_email: Option<String>,
    subject: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct CallbackUrl {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    success_list: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    error_list: Vec<String>,
}

#[derive(Debug, Serialize)]
struct SendMailWire {
    mail_info: MailInfo,
    callback_url: CallbackUrl,
}

#[derive(Debug, Serialize)]
struct MailInfoQuery {
    from_website: FromWebsite,
    partition: i64,
    offset: i64,
}

/// Client for the mail service.
#[derive(Debug, Clone)]
pub struct MailClient {
    client: ServiceClient,
}

impl MailClient {
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

    pub async fn send(&self, request: SendMailRequest) -> Result<Reply<Value>, ValidationError> {
        let request = request.into_wire()?;
        Ok(self.client.reply("send", &request).await)
    }

    pub async fn send_oneway(&self, request: SendMailRequest) -> Result<OnewayOutcome, ValidationError> {
        let request = request.into_wire()?;
        Ok(self.client.call_oneway("send", &request).await)
    }

    pub fn send_detached(&self, request: SendMailRequest) -> Result<JoinHandle<OnewayOutcome>, ValidationError> {
        let request = request.into_wire()?;
        Ok(self.client.spawn_oneway("send", &request))
    }

    /// Delivery info of the mail stored at `partition`/`offset`.
    pub async fn get_info(
        &self,
        from_website: FromWebsite,
        partition: i64,
        offset: i64,
    ) -> Result<Reply<Value>, ValidationError> {
        let query = MailInfoQuery {
            from_website,
            partition: non_negative("partition", partition)?,
            offset: non_negative("offset", offset)?,
        };
        Ok(self.client.reply("getInfo", &query).await)
    }
}
