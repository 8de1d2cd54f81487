//! Integration tests for MailgunClient against a mock server.

use integrations_mailgun::types::{EventType, SmtpErrorCode, TimeResolution, WebhookType};
use integrations_mailgun::{
    BounceRequest, DomainRequest, MailgunClient, MailgunConfig, MailgunError, MailingList,
    Route, StatsRequestBuilder, ValidationError, Webhook,
};
use wiremock::matchers::{body_string, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn setup() -> (MockServer, MailgunClient) {
    let server = MockServer::start().await;
    let config = MailgunConfig::builder()
        .api_key("key-integration")
        .base_url(format!("{}/v3", server.uri()))
        .user_agent("mailgun-tests/1.0")
        .build()
        .unwrap();
    let client = MailgunClient::new(config).unwrap();
    (server, client)
}

#[tokio::test]
async fn test_create_route() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path("/v3/routes"))
        .and(header("user-agent", "mailgun-tests/1.0"))
        .and(body_string(
            "priority=2&expression=match_recipient%28%22.*%40mg.example.com%22%29\
             &action=forward%28%22ops%40example.com%22%29&action=stop%28%29",
        ))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut route = Route::new();
    route
        .priority(2)
        .unwrap()
        .match_recipient(".*@mg.example.com")
        .unwrap()
        .forward("ops@example.com")
        .unwrap()
        .stop();

    let response = client.create_route(&route).await.unwrap();
    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
async fn test_create_webhook() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path("/v3/domains/mg.example.com/webhooks"))
        .and(body_string("id=unsubscribed&url=https%3A%2F%2Fhooks.example.com%2Fmg"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut webhook = Webhook::new();
    webhook.set_type(WebhookType::Unsubscribed);
    webhook.append_url("https://hooks.example.com/mg").unwrap();

    client.create_webhook("mg.example.com", &webhook).await.unwrap();
}

#[tokio::test]
async fn test_incomplete_webhook_is_not_sent() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let error = client
        .create_webhook("mg.example.com", &Webhook::new())
        .await
        .unwrap_err();
    assert!(matches!(
        error,
        MailgunError::Validation(ValidationError::InvalidOperation { .. })
    ));
}

#[tokio::test]
async fn test_get_stats() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/v3/mg.example.com/stats/total"))
        .and(query_param("event", "accepted"))
        .and(query_param("resolution", "month"))
        .and(query_param("duration", "3m"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"stats":[]}"#))
        .expect(1)
        .mount(&server)
        .await;

    let mut builder = StatsRequestBuilder::new();
    builder
        .add_event_type(EventType::Accepted)
        .resolution(TimeResolution::Month)
        .duration(3)
        .unwrap();

    let response = client
        .get_stats("mg.example.com", &builder.build().unwrap())
        .await
        .unwrap();
    assert_eq!(response.text().await.unwrap(), r#"{"stats":[]}"#);
}

#[tokio::test]
async fn test_create_domain() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path("/v3/domains"))
        .and(body_string_contains("name=mg.example.com"))
        .and(body_string_contains("wildcard=yes"))
        .and(body_string_contains("ips=192.0.2.1%2C192.0.2.2"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut domain = DomainRequest::new("MG.Example.com").unwrap();
    domain
        .wildcard(true)
        .add_ip("192.0.2.1")
        .unwrap()
        .add_ip("192.0.2.2")
        .unwrap();

    client.create_domain(&domain).await.unwrap();
}

#[tokio::test]
async fn test_add_bounces_as_json() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path("/v3/mg.example.com/bounces"))
        .and(header("content-type", "application/json"))
        .and(body_string(
            r#"[{"address":"a@example.com","code":"550"},{"address":"b@example.com"}]"#,
        ))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let bounces = vec![
        BounceRequest::new("a@example.com")
            .unwrap()
            .with_code(SmtpErrorCode::MailboxUnavailable),
        BounceRequest::new("b@example.com").unwrap(),
    ];

    client.add_bounces("mg.example.com", &bounces).await.unwrap();
}

#[tokio::test]
async fn test_error_status_is_returned_raw() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path("/v3/lists"))
        .respond_with(
            ResponseTemplate::new(400).set_body_string(r#"{"message":"Duplicate object"}"#),
        )
        .mount(&server)
        .await;

    let list = MailingList::new("devs@mg.example.com").unwrap();
    let response = client.create_mailing_list(&list).await.unwrap();
    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(
        response.text().await.unwrap(),
        r#"{"message":"Duplicate object"}"#
    );
}
