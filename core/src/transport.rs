//! The I/O seam between resource clients and the network.
//!
//! # Design
//! Resource descriptors only build and parse plain data; a `Transport`
//! executes one request and returns the response as data, whatever its
//! status. `UreqTransport` is the production implementation; tests supply
//! stubs.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use ureq::Agent;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Executes one HTTP round-trip. Non-2xx statuses are returned as data;
/// connection failures become `ApiError::Network` and a body that cannot be
/// read as text becomes `ApiError::Deserialization`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// Blocking `ureq` agent driven from `spawn_blocking`.
///
/// Prefixes the configured base URL, applies the configured timeout and
/// attaches `Authorization: Bearer` while a session token is set.
#[derive(Clone)]
pub struct UreqTransport {
    agent: Agent,
    base_url: String,
    token: Arc<RwLock<Option<String>>>,
}

impl fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqTransport")
            .field("base_url", &self.base_url)
            .field("has_token", &self.token().is_some())
            .finish_non_exhaustive()
    }
}

impl UreqTransport {
    pub fn new(config: &ClientConfig) -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(config.timeout))
            .build()
            .new_agent();
        Self {
            agent,
            base_url: config.base_url.clone(),
            token: Arc::new(RwLock::new(config.token.clone())),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Start a session; later requests carry the bearer token.
    pub fn set_token(&self, token: impl Into<String>) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token.into());
    }

    pub fn clear_token(&self) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl Transport for UreqTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let agent = self.agent.clone();
        let url = request.url(&self.base_url);
        let token = self.token();
        tracing::debug!(method = request.method.as_str(), %url, "sending request");

        let response = tokio::task::spawn_blocking(move || call(&agent, &url, &request, token.as_deref()))
            .await
            .map_err(|e| ApiError::Network(e.to_string()))??;

        tracing::debug!(status = response.status, "received response");
        Ok(response)
    }
}

fn decorate<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
    token: Option<&str>,
) -> ureq::RequestBuilder<B> {
    builder = builder.header("accept", "application/json");
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder
}

fn network(err: ureq::Error) -> ApiError {
    ApiError::Network(err.to_string())
}

fn call(
    agent: &Agent,
    url: &str,
    request: &HttpRequest,
    token: Option<&str>,
) -> Result<HttpResponse, ApiError> {
    let headers = request.headers.as_slice();
    let body = request.body.as_ref().map(|b| b.to_bytes());

    let mut response = match request.method {
        HttpMethod::Get => decorate(agent.get(url), headers, token).call().map_err(network)?,
        HttpMethod::Delete => decorate(agent.delete(url), headers, token).call().map_err(network)?,
        HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch => {
            let builder = match request.method {
                HttpMethod::Post => agent.post(url),
                HttpMethod::Put => agent.put(url),
                _ => agent.patch(url),
            };
            let builder = decorate(builder, headers, token);
            match &body {
                Some(bytes) => builder.send(&bytes[..]).map_err(network)?,
                None => builder.send_empty().map_err(network)?,
            }
        }
    };

    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                value.to_str().unwrap_or_default().to_string(),
            )
        })
        .collect();
    // Past the status line, a read failure is about the payload.
    let body = response
        .body_mut()
        .read_to_string()
        .map_err(|e| ApiError::Deserialization(format!("unreadable response body: {e}")))?;

    Ok(HttpResponse {
        status,
        headers,
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_can_be_replaced_and_cleared() {
        let transport = UreqTransport::new(&ClientConfig::new("http://localhost:9/").with_token("abc"));
        assert_eq!(transport.base_url(), "http://localhost:9");
        assert_eq!(transport.token().as_deref(), Some("abc"));
        transport.set_token("def");
        assert_eq!(transport.token().as_deref(), Some("def"));
        transport.clear_token();
        assert_eq!(transport.token(), None);
    }

    #[tokio::test]
    async fn unreachable_host_is_network_error() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let transport = UreqTransport::new(
            &ClientConfig::new(&format!("http://127.0.0.1:{port}"))
                .with_timeout(std::time::Duration::from_secs(2)),
        );
        let err = transport
            .execute(HttpRequest::new(HttpMethod::Get, "/radio"))
            .await
            .unwrap_err();
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn non_utf8_body_is_not_retryable() {
        use std::io::{Read, Write};

        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let server = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut seen = Vec::new();
            let mut buf = [0u8; 512];
            while !seen.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                seen.extend_from_slice(&buf[..n]);
            }
            stream
                .write_all(b"HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 2\r\nconnection: close\r\n\r\n\xff\xfe")
                .unwrap();
        });
        let transport = UreqTransport::new(&ClientConfig::new(&format!("http://127.0.0.1:{port}")));

        let err = transport
            .execute(HttpRequest::new(HttpMethod::Get, "/radio"))
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Deserialization(_)), "{err:?}");
        assert!(!err.is_retryable());
        server.join().unwrap();
    }
}
