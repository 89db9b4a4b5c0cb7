//! What a key service hands back, and what a request finally resolves to.

use bytes::Bytes;

use super::KeyError;

/// Status line and headers of interest, available before the body is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHead {
    pub status: u16,
    pub content_type: Option<String>,
}

impl ResponseHead {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            content_type: None,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

enum Body {
    Buffered(Bytes),
    Streaming(reqwest::Response),
}

/// A successful response whose body has not been read yet.
///
/// The body is consumed by [`KeyResponse::text`], which is where an
/// unreadable payload shows up.
pub struct KeyResponse {
    head: ResponseHead,
    body: Body,
}

impl KeyResponse {
    /// Response with an in-memory body. Used by services that already hold
    /// the payload (and by tests).
    pub fn buffered(head: ResponseHead, body: impl Into<Bytes>) -> Self {
        Self {
            head,
            body: Body::Buffered(body.into()),
        }
    }

    /// Wrap a live HTTP response; the body is streamed on [`text`](Self::text).
    pub fn streaming(response: reqwest::Response) -> Self {
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        Self {
            head: ResponseHead {
                status: response.status().as_u16(),
                content_type,
            },
            body: Body::Streaming(response),
        }
    }

    pub fn head(&self) -> &ResponseHead {
        &self.head
    }

    /// Read the whole body as UTF-8 text.
    pub async fn text(self) -> Result<String, KeyError> {
        let bytes = match self.body {
            Body::Buffered(bytes) => bytes,
            Body::Streaming(response) => response
                .bytes()
                .await
                .map_err(|e| KeyError::Body(e.to_string()))?,
        };
        String::from_utf8(bytes.to_vec()).map_err(|e| KeyError::Body(e.to_string()))
    }
}

impl std::fmt::Debug for KeyResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyResponse")
            .field("head", &self.head)
            .finish_non_exhaustive()
    }
}

/// Terminal outcome of one key request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyFetchResult {
    /// The raw key payload, opaque to this crate.
    Success(String),
    Failure(KeyError),
}

impl KeyFetchResult {
    /// Text shown to the user for this outcome: the raw key, or
    /// `"Error: <message>"`.
    pub fn display_text(&self) -> String {
        match self {
            KeyFetchResult::Success(raw_key) => raw_key.clone(),
            KeyFetchResult::Failure(err) => format!("Error: {err}"),
        }
    }
}

impl From<Result<String, KeyError>> for KeyFetchResult {
    fn from(result: Result<String, KeyError>) -> Self {
        match result {
            Ok(raw_key) => KeyFetchResult::Success(raw_key),
            Err(err) => KeyFetchResult::Failure(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn buffered_body_reads_as_text() {
        let response = KeyResponse::buffered(ResponseHead::new(200), "abc123");
        assert_eq!(response.head().status, 200);
        assert_eq!(response.text().await.unwrap(), "abc123");
    }

    #[tokio::test]
    async fn invalid_utf8_is_a_body_error() {
        let response = KeyResponse::buffered(ResponseHead::new(200), vec![0xff, 0xfe, 0xfd]);
        let err = response.text().await.unwrap_err();
        assert!(err.is_body(), "got {err:?}");
    }

    #[test]
    fn display_text_prefixes_failures() {
        let ok = KeyFetchResult::Success("abc123".into());
        let failed = KeyFetchResult::Failure(KeyError::Transport("timeout".into()));
        assert_eq!(ok.display_text(), "abc123");
        assert_eq!(failed.display_text(), "Error: timeout");
    }

    #[test]
    fn head_builder_sets_content_type() {
        let head = ResponseHead::new(201).with_content_type("application/json");
        assert_eq!(head.content_type.as_deref(), Some("application/json"));
    }
}
