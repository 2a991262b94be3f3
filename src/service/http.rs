//! Raw HTTP downloads for pages and images.

use reqwest::header::CONTENT_TYPE;
use serenity::async_trait;
use url::Url;

use crate::error::import::FetchError;

/// A successful (2xx) response, possibly cut short by a byte ceiling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedResponse {
    /// URL that answered, after redirects.
    pub final_url: Url,
    /// `Content-Type` header, if the server sent one.
    pub content_type: Option<String>,
    /// `Content-Length` header, if the server sent one.
    pub content_length: Option<u64>,
    /// Bytes read before the ceiling, if any, was crossed.
    pub body: Vec<u8>,
    /// Reading stopped because the response exceeded the ceiling.
    pub exceeded_limit: bool,
}

#[cfg(test)]
impl FetchedResponse {
    /// Builds a complete response with the given body and declared type.
    pub fn new(final_url: Url, content_type: Option<&str>, body: Vec<u8>) -> Self {
        Self {
            final_url,
            content_type: content_type.map(str::to_string),
            content_length: Some(body.len() as u64),
            body,
            exceeded_limit: false,
        }
    }
}

#[async_trait]
pub trait HttpFetcher: Send + Sync {
    /// Issues a GET request.
    ///
    /// # Arguments
    /// - `url` - Absolute http(s) URL
    /// - `max_bytes` - Stop reading once the body grows past this many bytes
    ///
    /// # Returns
    /// - `Ok(FetchedResponse)` - Server answered 2xx
    /// - `Err(FetchError::Status)` - Server answered with any other status; body not read
    /// - `Err(FetchError::Network)` - No response (DNS, TLS, timeout, too many redirects)
    async fn fetch(&self, url: &Url, max_bytes: Option<u64>)
        -> Result<FetchedResponse, FetchError>;
}

/// `HttpFetcher` backed by a shared reqwest client.
///
/// Timeouts and the redirect policy are configured on the client itself, see
/// `startup::setup_reqwest_client`.
pub struct ReqwestFetcher {
    client: reqwest::Client,
}

impl ReqwestFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpFetcher for ReqwestFetcher {
    async fn fetch(
        &self,
        url: &Url,
        max_bytes: Option<u64>,
    ) -> Result<FetchedResponse, FetchError> {
        let mut response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("GET {} returned {}", url, status);
            return Err(FetchError::Status(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let content_length = response.content_length();
        let final_url = response.url().clone();

        // Don't download what we already know we will reject
        if let (Some(limit), Some(declared)) = (max_bytes, content_length) {
            if declared > limit {
                return Ok(FetchedResponse {
                    final_url,
                    content_type,
                    content_length,
                    body: Vec::new(),
                    exceeded_limit: true,
                });
            }
        }

        let mut body = Vec::new();
        let mut exceeded_limit = false;
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?
        {
            body.extend_from_slice(&chunk);
            if max_bytes.is_some_and(|limit| body.len() as u64 > limit) {
                exceeded_limit = true;
                break;
            }
        }

        Ok(FetchedResponse {
            final_url,
            content_type,
            content_length,
            body,
            exceeded_limit,
        })
    }
}
