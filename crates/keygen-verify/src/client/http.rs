//! HTTP layer: sends a request and captures the raw response.

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use tracing::debug;
use url::Url;

use crate::error::{VerifyError, VerifyResult};
use crate::response::SignedResponse;

use super::JSON_API_MEDIA_TYPE;

#[derive(Debug, Clone)]
pub(crate) struct HttpBackend {
    pub(crate) client: reqwest::Client,
}

impl HttpBackend {
    /// Send a JSON:API request and collect status, headers and body bytes.
    ///
    /// The body is kept as raw bytes; the digest must be computed over exactly
    /// what the server sent.
    pub(crate) async fn send(
        &self,
        method: reqwest::Method,
        url: &Url,
        body: Vec<u8>,
    ) -> VerifyResult<SignedResponse> {
        let response = self
            .client
            .request(method.clone(), url.clone())
            .header(CONTENT_TYPE, JSON_API_MEDIA_TYPE)
            .header(ACCEPT, JSON_API_MEDIA_TYPE)
            .body(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let bytes = response.bytes().await.map_err(|e| VerifyError::Network {
            message: format!("failed to read response body: {}", e),
        })?;

        debug!(status, len = bytes.len(), "received response");

        SignedResponse::from_parts(
            status,
            &headers,
            bytes.to_vec(),
            method.as_str(),
            &request_path(url),
        )
    }
}

/// Path and query of the request as issued.
fn request_path(url: &Url) -> String {
    match url.query() {
        Some(q) => format!("{}?{}", url.path(), q),
        None => url.path().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_path() {
        let url = Url::parse("https://api.example/v1/licenses/actions/validate-key").unwrap();
        assert_eq!(request_path(&url), "/v1/licenses/actions/validate-key");

        let url = Url::parse("https://api.example/v1/me?include=policy").unwrap();
        assert_eq!(request_path(&url), "/v1/me?include=policy");
    }
}
