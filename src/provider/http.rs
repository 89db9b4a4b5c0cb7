//! HTTP key service.
//!
//! Posts the request parameters form-encoded to `<base_url>/ephemeral_keys`
//! and returns the response unread, so the caller decides when (and on which
//! task) the body is consumed.

use async_trait::async_trait;
use reqwest::Url;

use super::{KeyError, KeyParams, KeyResponse, KeyService};

/// Route the backend serves ephemeral keys on, relative to its base URL.
pub const EPHEMERAL_KEYS_ROUTE: &str = "ephemeral_keys";

/// A [`KeyService`] backed by a [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct HttpKeyService {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpKeyService {
    /// Create a service for the backend at `base_url`.
    ///
    /// A missing trailing slash is added so that the route is appended to the
    /// base path instead of replacing its last segment.
    pub fn new(base_url: &str) -> Result<Self, KeyError> {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Same as [`new`](Self::new) with a preconfigured client (timeouts,
    /// proxies, TLS settings).
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Result<Self, KeyError> {
        let endpoint = endpoint_for(base_url)?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

fn endpoint_for(base_url: &str) -> Result<Url, KeyError> {
    let mut base = Url::parse(base_url).map_err(|e| KeyError::InvalidUrl(format!("{base_url}: {e}")))?;
    if base.cannot_be_a_base() {
        return Err(KeyError::InvalidUrl(base_url.to_string()));
    }
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(EPHEMERAL_KEYS_ROUTE)
        .map_err(|e| KeyError::InvalidUrl(format!("{base_url}: {e}")))
}

#[async_trait]
impl KeyService for HttpKeyService {
    async fn create_ephemeral_key(&self, params: &KeyParams) -> Result<KeyResponse, KeyError> {
        tracing::debug!(endpoint = %self.endpoint, api_version = params.api_version(), "posting key request");

        let response = self
            .client
            .post(self.endpoint.clone())
            .form(params.as_map())
            .send()
            .await
            .map_err(|e| KeyError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(KeyError::status(status));
        }

        Ok(KeyResponse::streaming(response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn endpoint_appends_route_to_base_path() {
        let svc = HttpKeyService::new("http://localhost:4242").unwrap();
        assert_eq!(svc.endpoint().as_str(), "http://localhost:4242/ephemeral_keys");

        let svc = HttpKeyService::new("https://example.com/api").unwrap();
        assert_eq!(svc.endpoint().as_str(), "https://example.com/api/ephemeral_keys");

        let svc = HttpKeyService::new("https://example.com/api/").unwrap();
        assert_eq!(svc.endpoint().as_str(), "https://example.com/api/ephemeral_keys");
    }

    #[test]
    fn rejects_unusable_urls() {
        assert!(matches!(
            HttpKeyService::new("not a url"),
            Err(KeyError::InvalidUrl(_))
        ));
        assert!(matches!(
            HttpKeyService::new("mailto:keys@example.com"),
            Err(KeyError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn posts_form_encoded_api_version() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ephemeral_keys"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(body_string("api_version=2017-06-05"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"id":"ephkey_123"}"#))
            .expect(1)
            .mount(&server)
            .await;

        let svc = HttpKeyService::new(&server.uri()).unwrap();
        let response = svc
            .create_ephemeral_key(&KeyParams::new("2017-06-05"))
            .await
            .unwrap();

        assert_eq!(response.head().status, 200);
        assert_eq!(response.text().await.unwrap(), r#"{"id":"ephkey_123"}"#);
    }

    #[tokio::test]
    async fn reports_content_type_in_head() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ephemeral_keys"))
            .respond_with(ResponseTemplate::new(200).set_body_raw("{}", "application/json"))
            .mount(&server)
            .await;

        let svc = HttpKeyService::new(&server.uri()).unwrap();
        let response = svc.create_ephemeral_key(&KeyParams::new("2017-06-05")).await.unwrap();

        assert_eq!(response.head().content_type.as_deref(), Some("application/json"));
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ephemeral_keys"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let svc = HttpKeyService::new(&server.uri()).unwrap();
        let err = svc
            .create_ephemeral_key(&KeyParams::new("2017-06-05"))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "HTTP 500 Internal Server Error");
    }

    #[tokio::test]
    async fn invalid_utf8_body_fails_on_read() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ephemeral_keys"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xff, 0xfe, 0xfd]))
            .mount(&server)
            .await;

        let svc = HttpKeyService::new(&server.uri()).unwrap();
        let response = svc.create_ephemeral_key(&KeyParams::new("2017-06-05")).await.unwrap();

        assert!(response.text().await.unwrap_err().is_body());
    }

    #[tokio::test]
    async fn connection_refused_is_a_transport_error() {
        // Bind then drop a listener so the port is known to be closed.
        let uri = {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            format!("http://{}", listener.local_addr().unwrap())
        };

        let svc = HttpKeyService::new(&uri).unwrap();
        let err = svc
            .create_ephemeral_key(&KeyParams::new("2017-06-05"))
            .await
            .unwrap_err();

        assert!(matches!(err, KeyError::Transport(_)), "got {err:?}");
    }
}
