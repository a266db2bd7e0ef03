use crate::error::ClientError;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use std::future::Future;
use tracing::{debug, warn};

const JSON: &str = "application/json";
const USER_AGENT: &str = concat!("greenwave-client/", env!("CARGO_PKG_VERSION"));

/// One HTTP exchange: send, reject non-2xx, hand back the raw body.
///
/// Implementations apply no retry and no timeout.
pub trait Transport: Send + Sync {
    fn get(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, ClientError>> + Send;

    fn post_json(
        &self,
        url: &str,
        body: String,
    ) -> impl Future<Output = Result<Vec<u8>, ClientError>> + Send;
}

#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// # Errors
    /// Returns [`ClientError::Build`] if the TLS backend cannot be initialised.
    pub fn new() -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ClientError::Build(e.to_string()))?;
        Ok(Self { client })
    }

    #[must_use]
    pub const fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

fn request_failed(url: &str, error: &reqwest::Error) -> ClientError {
    warn!("request to {url} failed: {error}");
    ClientError::Request { url: url.to_string(), message: error.to_string() }
}

async fn read_body(url: &str, response: reqwest::Response) -> Result<Vec<u8>, ClientError> {
    let status = response.status();

    if !status.is_success() {
        warn!("HTTP {status} from {url}");
        let body = match response.bytes().await {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                warn!("could not read error body from {url}: {e}");
                String::new()
            }
        };
        return Err(ClientError::Status { status: status.as_u16(), url: url.to_string(), body });
    }

    let bytes = response.bytes().await.map_err(|e| request_failed(url, &e))?;
    debug!("HTTP {status} from {url} ({} bytes)", bytes.len());
    Ok(bytes.to_vec())
}

impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<Vec<u8>, ClientError> {
        debug!("GET {url}");
        let response = self
            .client
            .get(url)
            .header(ACCEPT, JSON)
            .send()
            .await
            .map_err(|e| request_failed(url, &e))?;
        read_body(url, response).await
    }

    async fn post_json(&self, url: &str, body: String) -> Result<Vec<u8>, ClientError> {
        debug!("POST {url} ({} bytes)", body.len());
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, JSON)
            .header(ACCEPT, JSON)
            .body(body)
            .send()
            .await
            .map_err(|e| request_failed(url, &e))?;
        read_body(url, response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves `reply` verbatim to the first connection and returns its base URL.
    async fn one_shot_server(reply: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            socket.write_all(reply.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });
        format!("http://{addr}")
    }

    fn transport() -> HttpTransport {
        HttpTransport::from_client(reqwest::Client::builder().no_proxy().build().unwrap())
    }

    #[tokio::test]
    async fn non_success_reply_becomes_status_error() {
        let base = one_shot_server(
            "HTTP/1.1 503 Service Unavailable\r\nContent-Length: 4\r\nConnection: close\r\n\r\ndown",
        )
        .await;

        let err = transport().get(&format!("{base}/health")).await.unwrap_err();

        assert_eq!(err.status(), Some(503));
        assert!(matches!(err, ClientError::Status { ref body, ref url, .. }
            if body == "down" && url.ends_with("/health")));
    }

    #[tokio::test]
    async fn success_reply_returns_body() {
        let base = one_shot_server(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 15\r\nConnection: close\r\n\r\n{\"message\":\"x\"}",
        )
        .await;

        let body = transport().get(&format!("{base}/health")).await.unwrap();

        assert_eq!(body, br#"{"message":"x"}"#);
    }
}
