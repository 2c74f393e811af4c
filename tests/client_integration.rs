//! Integration tests for the Addy HTTP client using wiremock.
//!
//! These cover the liveness probe's status classification and the
//! authenticated request helper's handling of bodies, headers and errors.

use addy_provider::{AddyClient, ApiConfig, ProviderError};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use wiremock::matchers::{bearer_token, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN_DETAILS: &str =
    r#"{"name":"test","created_at":"2024-01-01T00:00:00Z","expires_at":null}"#;

async fn healthy_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    server
}

const ROOT_OK: &str = "HTTP/1.1 200 OK\r\nContent-Length: 0\r\nConnection: close\r\n\r\n";

async fn read_request_head(stream: &mut TcpStream) {
    let mut head = Vec::new();
    let mut chunk = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        head.extend_from_slice(&chunk[..n]);
    }
}

/// Answer one connection per canned response, then stop listening.
async fn raw_server(responses: Vec<&'static str>) -> (String, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let uri = format!("http://{}", listener.local_addr().unwrap());
    let handle = tokio::spawn(async move {
        for response in responses {
            let (mut stream, _) = listener.accept().await.unwrap();
            read_request_head(&mut stream).await;
            stream.write_all(response.as_bytes()).await.unwrap();
            let _ = stream.shutdown().await;
        }
    });
    (uri, handle)
}

async fn connect(server: &MockServer) -> AddyClient {
    AddyClient::connect(ApiConfig::new(server.uri(), "v1"))
        .await
        .expect("liveness probe should pass")
}

mod bootstrap_tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_accepts_2xx() {
        let server = healthy_server().await;
        let client = connect(&server).await;
        assert_eq!(client.config().base_url(), server.uri());
    }

    #[tokio::test]
    async fn test_connect_accepts_3xx_without_location() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(302))
            .expect(1)
            .mount(&server)
            .await;

        AddyClient::connect(ApiConfig::new(server.uri(), "v1"))
            .await
            .expect("redirect status should be accepted");
    }

    #[tokio::test]
    async fn test_connect_rejects_4xx() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = AddyClient::connect(ApiConfig::new(server.uri(), "v1"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::ClientStatus(404)));
        assert_eq!(err.to_string(), "Request side error status code: 404");
    }

    #[tokio::test]
    async fn test_connect_rejects_5xx() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = AddyClient::connect(ApiConfig::new(server.uri(), "v1"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::ServerStatus(503)));
    }

    #[tokio::test]
    async fn test_connect_rejects_status_outside_known_ranges() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(600))
            .mount(&server)
            .await;

        let err = AddyClient::connect(ApiConfig::new(server.uri(), "v1"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::UnexpectedStatus(600)));
        assert_eq!(err.to_string(), "Unexpected status code: 600");
    }

    #[tokio::test]
    async fn test_connect_with_malformed_base_url_is_build_error() {
        let err = AddyClient::connect(ApiConfig::new("", "v1"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::RequestBuild(_)), "{:?}", err);
    }

    #[tokio::test]
    async fn test_connect_probes_exactly_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = connect(&server).await;
        let _clone = client.clone();
        server.verify().await;
    }

    #[tokio::test]
    async fn test_connect_refused_is_connectivity_error() {
        // Bind then release a port so nothing is listening on it.
        let uri = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            format!("http://{}", listener.local_addr().unwrap())
        };

        let err = AddyClient::connect(ApiConfig::new(uri, "v1"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Connectivity(_)));
    }
}

mod request_tests {
    use super::*;

    #[tokio::test]
    async fn test_success_returns_exact_body_bytes() {
        let server = healthy_server().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/api-token-details"))
            .and(bearer_token("test-key"))
            .and(header("Content-Type", "application/json"))
            .and(header("X-Requested-With", "XMLHttpRequest"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(TOKEN_DETAILS, "application/json"))
            .expect(1)
            .mount(&server)
            .await;

        let client = connect(&server).await;
        let body = client
            .request("api-token-details", "GET", "test-key")
            .await
            .unwrap();

        assert_eq!(body, TOKEN_DETAILS.as_bytes());
    }

    #[tokio::test]
    async fn test_404_embeds_status_and_body() {
        let server = healthy_server().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/aliases/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
            .mount(&server)
            .await;

        let client = connect(&server).await;
        let err = client
            .request("aliases/missing", "GET", "test-key")
            .await
            .unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("404"), "{}", msg);
        assert!(msg.contains("not found"), "{}", msg);
        match err {
            ProviderError::ApiRequest { status, body } => {
                assert_eq!(status, 404);
                assert_eq!(body, "not found");
            },
            other => panic!("expected ApiRequest, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_every_non_2xx_status_is_an_error() {
        let server = healthy_server().await;
        let client = connect(&server).await;

        for status in [400u16, 401, 403, 409, 422, 429, 500, 502, 503] {
            let endpoint = format!("status-{}", status);
            let body = format!("failure {}", status);
            Mock::given(method("GET"))
                .and(path(format!("/api/v1/{}", endpoint)))
                .respond_with(ResponseTemplate::new(status).set_body_string(body.clone()))
                .mount(&server)
                .await;

            let err = client.request(&endpoint, "GET", "k").await.unwrap_err();
            assert_eq!(err.status(), Some(status));
            assert!(err.to_string().contains(&body));
        }
    }

    #[tokio::test]
    async fn test_repeated_get_is_idempotent() {
        let server = healthy_server().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/app-version"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(r#"{"version":"1.3.2","major":1,"minor":3,"patch":2}"#, "application/json"),
            )
            .expect(2)
            .mount(&server)
            .await;

        let client = connect(&server).await;
        let first = client.get("app-version", "k").await.unwrap();
        let second = client.get("app-version", "k").await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_method_is_forwarded() {
        let server = healthy_server().await;
        Mock::given(method("DELETE"))
            .and(path("/api/v1/aliases/50c9e585"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = connect(&server).await;
        let body = client
            .request("aliases/50c9e585", "DELETE", "k")
            .await
            .unwrap();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_method_fails_before_sending() {
        let server = healthy_server().await;
        Mock::given(path("/api/v1/api-token-details"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = connect(&server).await;
        let err = client
            .request("api-token-details", "GE T", "k")
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::RequestBuild(_)));
    }

    #[tokio::test]
    async fn test_invalid_token_header_fails_before_sending() {
        let server = healthy_server().await;
        Mock::given(path("/api/v1/api-token-details"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = connect(&server).await;
        let err = client
            .request("api-token-details", "GET", "bad\ntoken")
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::RequestBuild(_)));
    }

    #[tokio::test]
    async fn test_server_gone_after_connect_is_transport_error() {
        let (uri, server) = raw_server(vec![ROOT_OK]).await;
        let client = AddyClient::connect(ApiConfig::new(uri, "v1")).await.unwrap();
        server.await.unwrap();

        let err = client
            .request("api-token-details", "GET", "k")
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Transport(_)), "{:?}", err);
        assert!(err.to_string().starts_with("Failed to send request"));
    }

    #[tokio::test]
    async fn test_truncated_body_is_response_body_error() {
        let (uri, server) = raw_server(vec![
            ROOT_OK,
            "HTTP/1.1 200 OK\r\nContent-Length: 100\r\nConnection: close\r\n\r\n{\"name\":",
        ])
        .await;
        let client = AddyClient::connect(ApiConfig::new(uri, "v1")).await.unwrap();

        let err = client
            .request("api-token-details", "GET", "k")
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::ResponseBody(_)), "{:?}", err);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_get_json_reports_decode_errors() {
        let server = healthy_server().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/api-token-details"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;

        let client = connect(&server).await;
        let err = client
            .get_json::<serde_json::Value>("api-token-details", "k")
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Decode(_)));
    }
}
