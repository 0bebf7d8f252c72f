use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::config::Config;
use crate::error::ServiceError;
use crate::models::Page;

/// Longest slice of an error body kept in `ServiceError::Server`.
const ERROR_BODY_LIMIT: usize = 512;

/// Shared HTTP plumbing for every resource service. Cloning is cheap: the
/// underlying `reqwest::Client` pools connections behind an `Arc`.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    /// Build a client for the configured backend.
    pub fn new(config: &Config) -> Result<Self, ServiceError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self::with_client(http, &config.backend_url))
    }

    /// Reuse an existing `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Start a request against `path`, which must begin with `/`.
    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, format!("{}{}", self.base_url, path))
    }

    pub(crate) fn page_request(&self, path: &str, page: usize, size: usize) -> RequestBuilder {
        self.request(Method::GET, path)
            .query(&[("page", page), ("size", size)])
    }

    pub(crate) fn json_request<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> RequestBuilder {
        self.request(method, path).json(body)
    }

    pub(crate) async fn fetch_page<T: DeserializeOwned>(
        &self,
        path: &str,
        page: usize,
        size: usize,
    ) -> Result<Page<T>, ServiceError> {
        self.send_json(self.page_request(path, page, size)).await
    }

    /// Send the request and decode a JSON body. Decoding is done from the raw
    /// text so a wrong shape surfaces as [`ServiceError::Shape`] rather than a
    /// transport error.
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, ServiceError> {
        let response = Self::ensure_success(builder.send().await?).await?;
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Send the request and discard whatever body comes back.
    pub(crate) async fn send_empty(&self, builder: RequestBuilder) -> Result<(), ServiceError> {
        Self::ensure_success(builder.send().await?).await?;
        Ok(())
    }

    async fn ensure_success(response: Response) -> Result<Response, ServiceError> {
        let status = response.status();
        debug!(url = %response.url(), %status, "backend responded");
        if status.is_success() {
            return Ok(response);
        }
        let mut body = response.text().await.unwrap_or_default();
        if body.len() > ERROR_BODY_LIMIT {
            let mut cut = ERROR_BODY_LIMIT;
            while !body.is_char_boundary(cut) {
                cut -= 1;
            }
            body.truncate(cut);
        }
        Err(ServiceError::Server {
            status: status.as_u16(),
            body: body.trim().to_string(),
        })
    }
}
