//! HTTP transport for the open API
//!
//! Every call is a POST returning the uniform `{code, msg, data}`
//! envelope. No retry happens at this layer.

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, HOST};
use reqwest::multipart::{Form, Part};
use reqwest::{Client as HttpClient, Response};
use serde_json::Value;
use std::future::Future;
use std::path::Path;

use super::config::ClientConfig;
use crate::error::{Result, SdkError};
use crate::types::Envelope;

/// Issues requests against the open API and decodes the envelope.
///
/// Implementations report transport failures and non-2xx statuses as
/// errors; the envelope code is left for the caller to check.
pub trait Transport: Send + Sync {
    /// POSTs a JSON body to `path`.
    fn post_json(&self, path: &str, body: Value) -> impl Future<Output = Result<Envelope>> + Send;

    /// POSTs a multipart form with text `fields` and the file at `file` as the `file` part.
    fn post_file(
        &self,
        path: &str,
        fields: Vec<(&'static str, String)>,
        file: &Path,
    ) -> impl Future<Output = Result<Envelope>> + Send;
}

/// `reqwest` backed transport
#[derive(Clone, Debug)]
pub struct HttpTransport {
    base_url: String,
    http_client: HttpClient,
}

impl HttpTransport {
    /// Creates a transport for the configured host
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let host = HeaderValue::from_str(config.effective_host())
            .map_err(|e| SdkError::InvalidConfig(format!("invalid host header: {}", e)))?;
        headers.insert(HOST, host);

        let http_client = HttpClient::builder()
            .timeout(config.effective_timeout())
            .default_headers(headers)
            .build()?;

        Ok(Self {
            base_url: config.base_url(),
            http_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn decode(path: &str, response: Response) -> Result<Envelope> {
        let status = response.status();
        if !status.is_success() {
            log::warn!("POST {} returned status {}", path, status);
            return Err(SdkError::UnexpectedStatus(status.as_u16()));
        }
        let envelope: Envelope = response.json().await?;
        log::debug!("POST {} -> code {} ({})", path, envelope.code, envelope.msg);
        Ok(envelope)
    }
}

impl Transport for HttpTransport {
    async fn post_json(&self, path: &str, body: Value) -> Result<Envelope> {
        let url = format!("{}{}", self.base_url, path);
        log::debug!("POST {}", url);
        let response = self
            .http_client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await?;
        Self::decode(path, response).await
    }

    async fn post_file(
        &self,
        path: &str,
        fields: Vec<(&'static str, String)>,
        file: &Path,
    ) -> Result<Envelope> {
        let url = format!("{}{}", self.base_url, path);
        let bytes = tokio::fs::read(file).await?;
        let file_name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "file".to_string());
        log::debug!("POST {} (multipart, {} bytes from {})", url, bytes.len(), file.display());

        let mut form = Form::new();
        for (name, value) in fields {
            form = form.text(name, value);
        }
        form = form.part("file", Part::bytes(bytes).file_name(file_name));

        let response = self.http_client.post(&url).multipart(form).send().await?;
        Self::decode(path, response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn transport_for(server: &MockServer) -> HttpTransport {
        let config = ClientConfig::new("key").with_endpoint(&server.uri()).unwrap();
        HttpTransport::new(&config).unwrap()
    }

    #[test]
    fn test_transport_creation() {
        let transport = HttpTransport::new(&ClientConfig::new("key")).unwrap();
        assert_eq!(transport.base_url(), "https://www.runninghub.cn");
    }

    #[test]
    fn test_invalid_host_is_config_error() {
        let config = ClientConfig {
            host: "bad\nhost".to_string(),
            ..ClientConfig::new("key")
        };
        let err = HttpTransport::new(&config).unwrap_err();
        assert!(matches!(err, SdkError::InvalidConfig(_)));
    }

    #[tokio::test]
    async fn test_post_json_decodes_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/task/openapi/status"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({"taskId": "1", "apiKey": "key"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 0,
                "msg": "success",
                "data": "RUNNING"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let transport = transport_for(&server);
        let envelope = transport
            .post_json("/task/openapi/status", json!({"taskId": "1", "apiKey": "key"}))
            .await
            .unwrap();
        assert_eq!(envelope.code, 0);
        assert_eq!(envelope.data, json!("RUNNING"));
    }

    #[tokio::test]
    async fn test_host_header_is_sent() {
        let server = MockServer::start().await;
        let config = ClientConfig::new("key").with_endpoint(&server.uri()).unwrap();
        Mock::given(method("POST"))
            .and(header("host", config.effective_host()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 0,
                "msg": "success",
                "data": null
            })))
            .expect(1)
            .mount(&server)
            .await;

        let transport = HttpTransport::new(&config).unwrap();
        let envelope = transport.post_json("/uc/openapi/accountStatus", json!({})).await.unwrap();
        assert!(envelope.is_success());
    }

    #[tokio::test]
    async fn test_slow_response_hits_configured_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"code": 0, "msg": "success", "data": null}))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let config = ClientConfig::new("key")
            .with_endpoint(&server.uri())
            .unwrap()
            .with_timeout(Duration::from_millis(300));
        let transport = HttpTransport::new(&config).unwrap();

        let started = std::time::Instant::now();
        let err = transport.post_json("/task/openapi/status", json!({})).await.unwrap_err();
        match err {
            SdkError::Http(e) => assert!(e.is_timeout(), "expected timeout, got {}", e),
            other => panic!("expected http timeout, got {:?}", other),
        }
        assert!(started.elapsed() < Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_non_zero_code_is_returned_not_raised() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 802,
                "msg": "APIKEY_UNAUTHORIZED",
                "data": null
            })))
            .mount(&server)
            .await;

        let transport = transport_for(&server);
        let envelope = transport.post_json("/task/openapi/create", json!({})).await.unwrap();
        assert_eq!(envelope.code, 802);
        assert!(!envelope.is_success());
    }

    #[tokio::test]
    async fn test_non_2xx_status_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let transport = transport_for(&server);
        let err = transport.post_json("/task/openapi/status", json!({})).await.unwrap_err();
        assert!(matches!(err, SdkError::UnexpectedStatus(503)));
    }

    #[tokio::test]
    async fn test_undecodable_body_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let transport = transport_for(&server);
        let err = transport.post_json("/task/openapi/status", json!({})).await.unwrap_err();
        assert!(matches!(err, SdkError::Http(_)));
    }

    #[tokio::test]
    async fn test_post_file_sends_multipart() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/task/openapi/upload"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 0,
                "msg": "success",
                "data": {"fileName": "api/abc.png", "fileType": "input"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("cat.png");
        std::fs::write(&file, b"png-bytes").unwrap();

        let transport = transport_for(&server);
        let envelope = transport
            .post_file(
                "/task/openapi/upload",
                vec![("apiKey", "key".to_string()), ("fileType", "input".to_string())],
                &file,
            )
            .await
            .unwrap();
        assert_eq!(envelope.data["fileName"], "api/abc.png");

        let requests = server.received_requests().await.unwrap();
        let content_type = requests[0].headers.get("content-type").unwrap().to_str().unwrap();
        assert!(content_type.starts_with("multipart/form-data"));
        let body = String::from_utf8_lossy(&requests[0].body);
        assert!(body.contains("name=\"apiKey\""));
        assert!(body.contains("filename=\"cat.png\""));
        assert!(body.contains("png-bytes"));
    }
}
