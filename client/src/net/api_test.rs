use super::*;
use dtos::{AuthType, ClientState};
use serde_json::json;
use wiremock::matchers::{body_string, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn setup() -> (MockServer, PortalClient) {
    let server = MockServer::start().await;
    let client = PortalClient::new(&server.uri(), ClientConfig::default()).unwrap();
    (server, client)
}

// =============================================================================
// pure helpers
// =============================================================================

#[test]
fn access_endpoint_formats_zone_segment() {
    assert_eq!(access_endpoint("status", "5"), "/api/captiveportal/access/status/5");
}

#[test]
fn access_endpoint_empty_zone_keeps_trailing_slash() {
    assert_eq!(access_endpoint("logoff", ""), "/api/captiveportal/access/logoff/");
}

#[test]
fn access_endpoint_percent_encodes_zone() {
    assert_eq!(access_endpoint("logon", "a b/c"), "/api/captiveportal/access/logon/a%20b%2Fc");
    assert_eq!(access_endpoint("logon", "z-1_(x)"), "/api/captiveportal/access/logon/z-1_(x)");
}

#[test]
fn form_body_includes_both_fields() {
    assert_eq!(form_body(&LogonRequest::new("maker", "s&cret")), "user=maker&password=s%26cret");
}

#[test]
fn form_body_omits_empty_fields() {
    assert_eq!(form_body(&LogonRequest::anonymous()), "");
    assert_eq!(form_body(&LogonRequest::new("maker", "")), "user=maker");
}

#[test]
fn parse_body_zero_content_length_is_none() {
    let parsed: Option<ClientStatusResponse> = parse_body(200, Some("0"), "application/json", b"{}").unwrap();
    assert!(parsed.is_none());
}

#[test]
fn parse_body_empty_body_is_none() {
    let parsed: Option<ClientStatusResponse> = parse_body(200, None, "application/json", b"  ").unwrap();
    assert!(parsed.is_none());
}

#[test]
fn parse_body_syntax_error_is_none() {
    let parsed: Option<ClientStatusResponse> = parse_body(200, None, "application/json", b"{\"clientState\":").unwrap();
    assert!(parsed.is_none());
    let html: Option<ClientStatusResponse> = parse_body(200, None, "text/html", b"<html>Not found</html>").unwrap();
    assert!(html.is_none());
}

#[test]
fn parse_body_ignores_declared_content_type_for_valid_json() {
    let parsed: Option<ClientStatusResponse> =
        parse_body(200, None, "text/plain", br#"{"clientState":"UNKNOWN","ipAddress":"1.2.3.4"}"#).unwrap();
    assert_eq!(parsed.map(|s| s.client_state()), Some(ClientState::Unknown));
}

#[test]
fn parse_body_wrong_shape_on_success_is_decode_error() {
    let err = parse_body::<ClientStatusResponse>(200, None, "application/json", br#"{"clientState":"AUTHORIZED"}"#)
        .unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}

#[test]
fn parse_body_wrong_shape_on_error_status_is_none() {
    let body = br#"{"errorMessage":"Endpoint not found","errorTitle":"Error"}"#;
    for status in [404, 500] {
        let parsed: Option<ClientStatusResponse> = parse_body(status, None, "application/json", body).unwrap();
        assert!(parsed.is_none(), "{status}");
    }
}

#[test]
fn from_reqwest_rejects_relative_base_url() {
    let err = PortalClient::from_reqwest("", reqwest::Client::new()).err().unwrap();
    assert!(matches!(err, ApiError::InvalidUrl(_)));
}

#[test]
fn from_reqwest_strips_trailing_slash() {
    let client = PortalClient::from_reqwest("http://portal.test/", reqwest::Client::new()).unwrap();
    assert_eq!(client.base_url(), "http://portal.test");
}

#[test]
fn api_response_ok_tracks_2xx() {
    assert!(ApiResponse::<()>::new(200, None).ok);
    assert!(ApiResponse::<()>::new(204, None).ok);
    assert!(!ApiResponse::<()>::new(404, None).ok);
    assert!(!ApiResponse::<()>::new(500, None).ok);
    assert_eq!(ApiResponse::new(500, Some(1)).into_ok_data(), None);
    assert_eq!(ApiResponse::new(200, Some(1)).into_ok_data(), Some(1));
}

// =============================================================================
// HTTP
// =============================================================================

#[tokio::test]
async fn get_client_status_sends_zone_header() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/captiveportal/access/status/3"))
        .and(header("zoneid", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "clientState": "NOT_AUTHORIZED",
            "ipAddress": "10.0.0.7",
            "authType": "none"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let res = client.get_client_status("3").await.unwrap();
    assert!(res.ok);
    assert_eq!(res.status, 200);
    let data = res.data.unwrap();
    assert_eq!(data.auth_type(), Some(AuthType::None));
}

#[tokio::test]
async fn get_client_status_empty_zone_uses_trailing_slash() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/captiveportal/access/status/"))
        .and(header_exists("zoneid"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "clientState": "UNKNOWN",
            "ipAddress": "10.0.0.7"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let res = client.get_client_status("").await.unwrap();
    assert_eq!(res.data.map(|d| d.client_state()), Some(ClientState::Unknown));
}

#[tokio::test]
async fn not_found_is_a_response_not_an_error() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/captiveportal/access/status/9"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not found"))
        .mount(&server)
        .await;

    let res = client.get_client_status("9").await.unwrap();
    assert!(!res.ok);
    assert_eq!(res.status, 404);
    assert!(res.data.is_none());
}

#[tokio::test]
async fn not_found_with_json_error_body_is_a_response() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/captiveportal/access/status/"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "errorMessage": "Endpoint not found",
            "errorTitle": "Error"
        })))
        .mount(&server)
        .await;

    let res = client.get_client_status("").await.unwrap();
    assert_eq!(res, ApiResponse { ok: false, status: 404, data: None });
}

#[tokio::test]
async fn json_error_bodies_on_both_zones_return_last_not_found() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "errorMessage": "Endpoint not found" })))
        .expect(2)
        .mount(&server)
        .await;

    let client = &client;
    let res = crate::net::zone::with_zone("5", |zone| async move { client.get_client_status(&zone).await })
        .await
        .unwrap();
    assert_eq!(res.status, 404);
    assert!(res.data.is_none());
}

#[tokio::test]
async fn unrecognized_client_state_is_unknown() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/captiveportal/access/status/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "clientState": "EXPIRED",
            "ipAddress": "10.0.0.7"
        })))
        .mount(&server)
        .await;

    let res = client.get_client_status("").await.unwrap();
    assert!(res.ok);
    assert_eq!(res.data.map(|d| d.client_state()), Some(ClientState::Unknown));
}

#[tokio::test]
async fn server_error_with_json_body_keeps_data() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/captiveportal/access/status/"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "clientState": "UNKNOWN",
            "ipAddress": "10.0.0.7"
        })))
        .mount(&server)
        .await;

    let res = client.get_client_status("").await.unwrap();
    assert!(!res.ok);
    assert_eq!(res.status, 500);
    assert!(res.data.is_some());
}

#[tokio::test]
async fn logon_posts_form_encoded_credentials() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path("/api/captiveportal/access/logon/0"))
        .and(header("zoneid", "0"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string("user=maker&password=secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "clientState": "AUTHORIZED",
            "ipAddress": "10.0.0.7",
            "macAddress": "02:00:00:00:00:11",
            "userName": "maker",
            "sessionId": "s-1",
            "startTime": 1_700_000_000
        })))
        .expect(1)
        .mount(&server)
        .await;

    let res = client.logon("0", &LogonRequest::new("maker", "secret")).await.unwrap();
    let status = res.data.unwrap();
    assert_eq!(status.as_authorized().map(|s| s.user_name.as_str()), Some("maker"));
}

#[tokio::test]
async fn anonymous_logon_sends_empty_body() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path("/api/captiveportal/access/logon/"))
        .and(body_string(""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "clientState": "NOT_AUTHORIZED",
            "ipAddress": "10.0.0.7"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let res = client.logon("", &LogonRequest::anonymous()).await.unwrap();
    assert_eq!(res.data.map(|d| d.client_state()), Some(ClientState::NotAuthorized));
}

#[tokio::test]
async fn logoff_posts_with_zone_header() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path("/api/captiveportal/access/logoff/7"))
        .and(header("zoneid", "7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "clientState": "NOT_AUTHORIZED",
            "ipAddress": "10.0.0.7"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let res = client.logoff("7").await.unwrap();
    assert!(res.ok);
}

#[tokio::test]
async fn rfc_status_requests_captive_json() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/captiveportal/access/api/"))
        .and(header("accept", "application/captive+json"))
        .and(header("zoneid", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"{"captive":true,"user-portal-url":"https://portal.test/"}"#, "application/captive+json"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let res = client.get_rfc_status("2").await.unwrap();
    let data = res.data.unwrap();
    assert!(data.captive);
    assert_eq!(data.user_portal_url.as_deref(), Some("https://portal.test/"));
}

#[tokio::test]
async fn transport_failure_is_an_error() {
    // Reserve a port, then free it so nothing is listening there.
    let port = std::net::TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port();

    let client = PortalClient::new(&format!("http://127.0.0.1:{port}"), ClientConfig::default()).unwrap();
    let err = client.get_client_status("").await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}

#[tokio::test]
async fn request_timeout_is_a_transport_error() {
    let (server, _) = setup().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(std::time::Duration::from_millis(500)))
        .mount(&server)
        .await;

    let config = ClientConfig {
        request_timeout: std::time::Duration::from_millis(50),
        connect_timeout: std::time::Duration::from_millis(50),
    };
    let client = PortalClient::new(&server.uri(), config).unwrap();
    let err = client.get_client_status("").await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}
