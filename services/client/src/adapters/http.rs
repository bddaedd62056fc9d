//! services/client/src/adapters/http.rs
//!
//! The shared HTTP transport used by every backend adapter. It owns the
//! `reqwest` client, attaches the bearer token, and turns non-success
//! responses into `PortError`s.

use std::time::Duration;

use phishing_quiz_core::ports::{PortError, PortResult};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

/// Error body returned by the backend. Either field may carry the message.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    title: Option<String>,
    message: Option<String>,
}

//=========================================================================================
// The Transport Struct
//=========================================================================================

#[derive(Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
    access_token: Option<String>,
}

impl HttpBackend {
    /// Creates a new `HttpBackend`. `base_url` includes the `/api` prefix.
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        access_token: Option<String>,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}{}", self.base_url, path));
        match &self.access_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> PortResult<Response> {
        let response = builder
            .send()
            .await
            .map_err(|e| PortError::Unexpected(format!("Request failed: {}", e)))?;
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(error_from_response(response).await)
        }
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> PortResult<T> {
        response
            .json::<T>()
            .await
            .map_err(|e| PortError::Unexpected(format!("Malformed response: {}", e)))
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> PortResult<T> {
        debug!(path, "GET");
        let response = self.send(self.request(Method::GET, path).query(query)).await?;
        Self::read_json(response).await
    }

    /// Like `get_json`, but a 404 yields `None`.
    pub async fn get_json_opt<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> PortResult<Option<T>> {
        match self.get_json(path, query).await {
            Ok(value) => Ok(Some(value)),
            Err(PortError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> PortResult<T> {
        debug!(path, "POST");
        let response = self.send(self.request(Method::POST, path).json(body)).await?;
        Self::read_json(response).await
    }

    /// Like `post_json`, but an empty success body yields `None`.
    pub async fn post_json_opt<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> PortResult<Option<T>> {
        debug!(path, "POST");
        let response = self.send(self.request(Method::POST, path).json(body)).await?;
        let text = response
            .text()
            .await
            .map_err(|e| PortError::Unexpected(format!("Failed to read response: {}", e)))?;
        if text.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| PortError::Unexpected(format!("Malformed response: {}", e)))
    }

    /// Sends a body and ignores whatever comes back on success.
    pub async fn send_unit<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> PortResult<()> {
        debug!(path, %method, "sending");
        let builder = self.request(method, path);
        let builder = match body {
            Some(body) => builder.json(body),
            None => builder,
        };
        self.send(builder).await.map(|_| ())
    }

    pub async fn delete(&self, path: &str) -> PortResult<()> {
        self.send_unit::<()>(Method::DELETE, path, None).await
    }
}

/// Maps a failed response onto the port error vocabulary.
async fn error_from_response(response: Response) -> PortError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .ok()
        .and_then(|body| body.title.or(body.message))
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        });

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => PortError::Unauthorized,
        StatusCode::NOT_FOUND => PortError::NotFound(message),
        s if s.is_client_error() => PortError::Rejected(message),
        s => {
            warn!(status = %s, "backend error: {}", message);
            PortError::Unexpected(format!("{} {}", s.as_u16(), message))
        }
    }
}
