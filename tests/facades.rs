//! Facades built from a configuration file, talking to loopback mocks.

mod common;

use serde_json::{json, Value};

use common::{start_mock_service, start_programmable_service, Action, MockServer};
use rpc_facade::config::load_config_str;
use rpc_facade::services::event_bus::Message;
use rpc_facade::services::mail::{ContentType, EmailNamePair, FromWebsite, SendMailRequest};
use rpc_facade::services::notification::{InsertItemRequest, TargetUserType};
use rpc_facade::{
    CatalogGatewayClient, CatalogStorageClient, ClientsConfig, ConfigError, ErrorCode, EventBusNotifier, MailClient,
    NotificationClient, SelectionPolicy,
};

fn config_for(server: &MockServer) -> ClientsConfig {
    let hosts = server.host();
    let toml = format!(
        r#"
[observability]
log_level = "debug"

[catalog_gateway]
hosts = "{hosts}"
auth = "gateway:pw"

[catalog_storage]
hosts = "{hosts}"
auth = "storage:pw"
scale_mode = "fail_over"
number_of_retries = 0

[event_bus]
hosts = "{hosts}"
auth = "bus:pw"
client_id = "shop-api"
topics = "orders, payments"

[mail]
hosts = "{hosts}"
auth = "mail:pw"

[notification]
hosts = "{hosts}"
auth = "notify:pw"
receive_timeout_ms = 500
"#
    );
    load_config_str(&toml).unwrap()
}

#[tokio::test]
async fn test_catalog_facades_round_trip() {
    let server = start_mock_service(json!({"id": "c-1"})).await;
    let config = config_for(&server);

    let gateway = CatalogGatewayClient::from_config(&config).unwrap();
    let reply = gateway.get_category_by_slug(" shoes ").await.unwrap();
    assert_eq!(reply.data, Some(json!({"id": "c-1"})));

    let storage = CatalogStorageClient::from_config(&config).unwrap();
    assert_eq!(storage.client().policy(), SelectionPolicy::FailOver);
    assert!(storage.get_product_by_id("p-9").await.unwrap().is_success());

    let requests = server.requests();
    assert_eq!(server.methods(), vec!["getCategoryBySlug", "getProductById"]);
    assert_eq!(requests[0].payload, json!({"slug": "shoes"}));
    assert_eq!(requests[0].context.credentials.username, "gateway");
    assert_eq!(requests[1].context.credentials.username, "storage");
}

#[tokio::test]
async fn test_event_bus_oneway_publish() {
    let server = start_mock_service(Value::Null).await;
    let notifier = EventBusNotifier::from_config(&config_for(&server)).unwrap();
    assert_eq!(notifier.topics(), &["orders".to_string(), "payments".to_string()]);

    let outcome = notifier
        .notify_string_oneway(Message::new("orders", "created".to_string()).with_key("o-1"))
        .await
        .unwrap();
    assert!(outcome.is_delivered());

    let requests = server.wait_for_requests(1).await;
    assert_eq!(requests.len(), 1);
    assert!(requests[0].oneway);
    assert_eq!(requests[0].method, "notifyString");
    assert_eq!(
        requests[0].payload,
        json!({"message_info": {"client_id": "shop-api", "topic": "orders", "key": "o-1", "data": "created"}})
    );
}

#[tokio::test]
async fn test_event_bus_rejects_unknown_topic_before_connecting() {
    let server = start_mock_service(Value::Null).await;
    let notifier = EventBusNotifier::from_config(&config_for(&server)).unwrap();

    let err = notifier.notify_integer(Message::new("audit", 1)).await.unwrap_err();
    assert_eq!(err.field(), Some("topic"));
    assert_eq!(server.accepted(), 0);
}

#[tokio::test]
async fn test_mail_detached_send() {
    let server = start_mock_service(Value::Null).await;
    let mail = MailClient::from_config(&config_for(&server)).unwrap();

    let mut request = SendMailRequest::new(
        FromWebsite::Fado,
        ContentType::Html,
        "noreply@example.com",
        vec![EmailNamePair::new("a@example.com"), EmailNamePair::new(" ")],
        "Welcome",
        "<p>Hi</p>",
    );
    request.success_callback_url_list = vec![" https://shop.example/mail/ok ".into(), "".into()];
    let handle = mail.send_detached(request).unwrap();
    assert!(handle.await.unwrap().is_delivered());

    let requests = server.wait_for_requests(1).await;
    assert_eq!(requests[0].method, "send");
    assert_eq!(
        requests[0].payload,
        json!({
            "mail_info": {
                "from_website": "FADO",
                "content_type": "HTML",
                "from_email": "noreply@example.com",
                "to_list": [{"email": "a@example.com"}],
                "subject": "Welcome",
                "content": "<p>Hi</p>"
            },
            "callback_url": {"success_list": ["https://shop.example/mail/ok"]}
        })
    );
}

#[tokio::test]
async fn test_notification_counter_and_insert() {
    let server = start_programmable_service(|request| match request.method.as_str() {
        "getCounter" => Action::Reply(json!({"error": {"code": "SUCCESS"}, "data": 7})),
        _ => Action::Reply(json!({"error": {"code": "FAIL", "message": "duplicate id"}})),
    })
    .await;
    let notification = NotificationClient::from_config(&config_for(&server)).unwrap();
    assert_eq!(notification.client().timeouts().receive.as_millis(), 500);

    let counter = notification.get_counter("shop", 12).await.unwrap();
    assert_eq!(counter.data, Some(7));

    let insert = InsertItemRequest::new("shop", TargetUserType::All, 1, 0, 0, "Flash sale");
    let reply = notification.insert_item(insert).await.unwrap();
    assert_eq!(reply.code(), ErrorCode::Fail);
    assert_eq!(reply.error.message, "duplicate id");

    // A remote FAIL is an answer, not a failed attempt.
    assert!(notification.health().iter().all(|(_, alive)| *alive));
    assert!(notification.last_failure().is_none());
}

#[tokio::test]
async fn test_missing_and_invalid_tables() {
    let config = load_config_str("[mail]\nhosts = \"m:25\"\nauth = \"u:p\"\n").unwrap();
    assert!(matches!(
        NotificationClient::from_config(&config),
        Err(ConfigError::MissingService("notification"))
    ));
    assert!(MailClient::from_config(&config).is_ok());

    let err = load_config_str("[mail]\nhosts = \" , \"\nauth = \"nopassword\"\n").unwrap_err();
    match err {
        ConfigError::Invalid(issues) => assert_eq!(issues.len(), 2),
        other => panic!("unexpected error: {other}"),
    }
}
