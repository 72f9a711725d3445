//! Tests for the reqwest transport against a local HTTP server.

use botblock_client::{
    ApiRequest, GetBotAction, GetListAction, GuildReport, ReportSubmitter, ReqwestTransport,
    Transport,
};
use botblock_error::{BotBlockErrorKind, TransportErrorKind};
use std::collections::BTreeMap;
use std::sync::Arc;
use wiremock::matchers::{body_json, header, method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const USER_AGENT: &str = "TestBot/1.0 DBots/1234";

async fn transport(server: &MockServer) -> ReqwestTransport {
    ReqwestTransport::new(&format!("{}/api", server.uri()), USER_AGENT)
        .expect("Failed to create transport")
}

#[tokio::test]
async fn test_get_sends_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/bots/1234"))
        .and(header("user-agent", USER_AGENT))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"id": "1234"}"#))
        .expect(1)
        .mount(&server)
        .await;

    let response = transport(&server)
        .await
        .send(ApiRequest::get("bots/1234"))
        .await
        .unwrap();

    assert_eq!(*response.status_code(), 200);
    assert_eq!(response.body(), r#"{"id": "1234"}"#);
}

#[tokio::test]
async fn test_query_string_is_kept() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/lists"))
        .and(query_param("filter", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(1)
        .mount(&server)
        .await;

    let response = transport(&server)
        .await
        .send(ApiRequest::get("lists?filter=true"))
        .await
        .unwrap();
    assert_eq!(*response.status_code(), 200);
}

#[tokio::test]
async fn test_post_sends_json_with_headers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/count"))
        .and(header("content-type", "application/json"))
        .and(header("user-agent", USER_AGENT))
        .and(body_json(serde_json::json!({
            "server_count": 7,
            "bot_id": "1234",
            "siteA": "tokenA",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"failure": {}}"#))
        .expect(1)
        .mount(&server)
        .await;

    let submitter = ReportSubmitter::new(Arc::new(transport(&server).await) as Arc<dyn Transport>);
    let credentials = BTreeMap::from([("siteA".to_string(), "tokenA".to_string())]);
    submitter
        .submit(&GuildReport::new("1234", 7), &credentials)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_empty_body_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/bots/1234"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let err = transport(&server)
        .await
        .send(ApiRequest::get("bots/1234"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, TransportErrorKind::EmptyBody { status_code: 200 });
}

#[tokio::test]
async fn test_retry_after_header_is_captured() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/count"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("retry-after", "17")
                .set_body_string("Too Many Requests"),
        )
        .mount(&server)
        .await;

    let submitter = ReportSubmitter::new(Arc::new(transport(&server).await) as Arc<dyn Transport>);
    let credentials = BTreeMap::from([("siteA".to_string(), "tokenA".to_string())]);
    let err = submitter
        .submit(&GuildReport::new("1234", 7), &credentials)
        .await
        .unwrap_err();

    let signal = err.rate_limit().unwrap();
    assert_eq!(signal.retry_after, 17);
    assert_eq!(signal.route, "unknown");
}

#[tokio::test]
async fn test_bot_lookup_over_http_is_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/bots/1234"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"username": "MyBot"}"#))
        .expect(1)
        .mount(&server)
        .await;

    let action = GetBotAction::new(Arc::new(transport(&server).await) as Arc<dyn Transport>, false);
    for _ in 0..3 {
        let info = action.get_bot("1234").await.unwrap().into_option().unwrap();
        assert_eq!(info.username().as_deref(), Some("MyBot"));
    }
    // `expect(1)` is verified when the server drops
}

#[tokio::test]
async fn test_bot_id_stays_one_path_segment() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/lists"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"hit": "lists"}"#))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/api/bots/[^/]+$"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"hit": "bot"}"#))
        .expect(2)
        .mount(&server)
        .await;

    let action = GetBotAction::new(Arc::new(transport(&server).await) as Arc<dyn Transport>, false);
    for id in ["../lists", "1?x=y"] {
        let json = action.get_bot_info(id).await.unwrap().into_option().unwrap();
        assert_eq!(json["hit"], "bot");
    }

    let requests = server.received_requests().await.unwrap();
    let urls: Vec<_> = requests
        .iter()
        .map(|request| (request.url.path().to_string(), request.url.query().map(str::to_string)))
        .collect();
    assert_eq!(
        urls,
        vec![
            ("/api/bots/..%2Flists".to_string(), None),
            ("/api/bots/1%3Fx%3Dy".to_string(), None),
        ]
    );
}

#[tokio::test]
async fn test_site_name_stays_one_path_segment() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/api/lists/[^/]+$"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"name": "Site A"}"#))
        .expect(1)
        .mount(&server)
        .await;

    let action = GetListAction::new(Arc::new(transport(&server).await) as Arc<dyn Transport>, false);
    action.get_list("site/a#top").await.unwrap();
    assert!(action.get_list("..").await.unwrap_err().is_precondition());

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.path(), "/api/lists/site%2Fa%23top");
}

#[tokio::test]
async fn test_server_error_maps_to_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/bots/1234"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let action = GetBotAction::new(Arc::new(transport(&server).await) as Arc<dyn Transport>, true);
    let value = action.get_bot_info("1234").await.unwrap();
    let err = value.into_result().unwrap_err();
    match err.kind() {
        BotBlockErrorKind::Transport(e) => assert_eq!(e.kind.status_code(), Some(500)),
        other => panic!("unexpected kind {:?}", other),
    }
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    // Nothing listens on port 9 (discard) in test environments
    let transport = ReqwestTransport::new("http://127.0.0.1:9/api/", USER_AGENT).unwrap();
    let err = transport
        .send(ApiRequest::get("bots/1234"))
        .await
        .unwrap_err();
    assert!(matches!(
        err.kind,
        TransportErrorKind::Network(_) | TransportErrorKind::Timeout(_)
    ));
}

#[test]
fn test_invalid_base_url_is_rejected() {
    let err = ReqwestTransport::new("not a url", USER_AGENT).unwrap_err();
    assert!(matches!(err.kind(), BotBlockErrorKind::Transport(_)));
}
