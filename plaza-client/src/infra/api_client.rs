use plaza_config::ClientConfig;
use plaza_model::ApiResponse;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::error::{ClientError, ClientResult};

/// API client with bearer token support
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token_store: Arc<RwLock<Option<String>>>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field(
                "has_token",
                &self
                    .token_store
                    .try_read()
                    .map(|t| t.is_some())
                    .unwrap_or(false),
            )
            .finish()
    }
}

/// Add `http://` when no scheme was given and drop trailing slashes, so
/// `localhost:3000/` and `http://localhost:3000` build the same URLs.
fn normalize_base_url(raw: &str) -> ClientResult<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ClientError::InvalidBaseUrl(raw.to_string()));
    }
    let with_scheme = if trimmed.starts_with("http://")
        || trimmed.starts_with("https://")
    {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    };
    if with_scheme != raw {
        debug!(
            "[ApiClient] Normalized base URL from '{}' to '{}'",
            raw, with_scheme
        );
    }
    url::Url::parse(&with_scheme)
        .map_err(|_| ClientError::InvalidBaseUrl(raw.to_string()))?;
    Ok(with_scheme)
}

impl ApiClient {
    /// Create a new API client
    pub fn new(base_url: &str, timeout: Duration) -> ClientResult<Self> {
        Self::with_token(base_url, timeout, None)
    }

    /// Build a client from resolved configuration, seeding the token store.
    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        Self::with_token(
            config.server.url.as_str(),
            config.server.request_timeout,
            config.auth.token.clone(),
        )
    }

    fn with_token(
        base_url: &str,
        timeout: Duration,
        token: Option<String>,
    ) -> ClientResult<Self> {
        let base_url = normalize_base_url(base_url)?;
        let client = Client::builder().timeout(timeout).build()?;

        info!(
            "[ApiClient] Creating new API client with base URL: {}",
            base_url
        );

        Ok(Self {
            client,
            base_url,
            token_store: Arc::new(RwLock::new(token)),
        })
    }

    /// Build an absolute URL for an API path
    pub fn build_url(&self, path: impl AsRef<str>) -> String {
        let p = path.as_ref();
        if p.starts_with("http://") || p.starts_with("https://") {
            return p.to_string();
        }
        format!("{}/{}", self.base_url, p.trim_start_matches('/'))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn set_token(&self, token: Option<String>) {
        *self.token_store.write().await = token;
    }

    pub async fn get_token(&self) -> Option<String> {
        self.token_store.read().await.clone()
    }

    /// Attach the bearer header when a token is present
    pub async fn build_request(
        &self,
        builder: RequestBuilder,
    ) -> RequestBuilder {
        if let Some(token) = self.token_store.read().await.as_ref() {
            builder.bearer_auth(token)
        } else {
            builder
        }
    }

    /// Send a request and unwrap the `ApiResponse` envelope
    async fn execute_request<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> ClientResult<T> {
        let envelope: ApiResponse<T> = self.execute_envelope(request).await?;
        envelope.data.ok_or(ClientError::EmptyResponse)
    }

    /// Like [`Self::execute_request`] for endpoints that answer without data
    async fn execute_no_content(
        &self,
        request: RequestBuilder,
    ) -> ClientResult<()> {
        let response = request.send().await?;
        let response = self.check_status(response).await?;
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(());
        }
        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Ok(());
        }
        let envelope: ApiResponse<serde_json::Value> = decode(&bytes)?;
        reject_unsuccessful(&envelope)
    }

    async fn execute_envelope<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> ClientResult<ApiResponse<T>> {
        let response = request.send().await?;
        let response = self.check_status(response).await?;
        if response.status() == StatusCode::NO_CONTENT {
            return Err(ClientError::EmptyResponse);
        }
        let bytes = response.bytes().await?;
        let envelope: ApiResponse<T> = decode(&bytes)?;
        reject_unsuccessful(&envelope)?;
        Ok(envelope)
    }

    /// Map 401 and other non-2xx statuses to errors, keeping the server's
    /// explanation when the body carries one.
    async fn check_status(&self, response: Response) -> ClientResult<Response> {
        match response.status() {
            status if status.is_success() => Ok(response),
            StatusCode::UNAUTHORIZED => Err(self.unauthorized().await),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(ClientError::Status {
                    status: status.as_u16(),
                    message: explain_body(&body),
                })
            }
        }
    }

    async fn unauthorized(&self) -> ClientError {
        warn!("[ApiClient] Request unauthorized, clearing token");
        self.set_token(None).await;
        ClientError::Unauthorized
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let url = self.build_url(path);
        debug!("[ApiClient] GET {}", url);
        let request = self.build_request(self.client.get(&url)).await;
        self.execute_request(request).await
    }

    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let url = self.build_url(path);
        debug!("[ApiClient] PUT {}", url);
        let request = self.build_request(self.client.put(&url).json(body)).await;
        self.execute_request(request).await
    }

    pub async fn put_no_content<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<()> {
        let url = self.build_url(path);
        debug!("[ApiClient] PUT {}", url);
        let request = self.build_request(self.client.put(&url).json(body)).await;
        self.execute_no_content(request).await
    }

    pub async fn delete(&self, path: &str) -> ClientResult<()> {
        let url = self.build_url(path);
        debug!("[ApiClient] DELETE {}", url);
        let request = self.build_request(self.client.delete(&url)).await;
        self.execute_no_content(request).await
    }

    /// GET an endpoint that answers with a bare JSON object instead of the
    /// envelope. Error statuses whose body still decodes as `T` are returned
    /// as `Ok` so callers can read the server's own failure fields.
    pub async fn get_raw<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> ClientResult<T> {
        let url = self.build_url(path);
        debug!("[ApiClient] GET {}", url);
        let request = self.build_request(self.client.get(&url)).await;
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            return Err(self.unauthorized().await);
        }

        let bytes = response.bytes().await?;
        match serde_json::from_slice::<T>(&bytes) {
            Ok(value) => Ok(value),
            Err(err) if status.is_success() => {
                Err(ClientError::Decode(err.to_string()))
            }
            Err(_) => Err(ClientError::Status {
                status: status.as_u16(),
                message: explain_body(&String::from_utf8_lossy(&bytes)),
            }),
        }
    }
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> ClientResult<T> {
    serde_json::from_slice(bytes).map_err(|err| ClientError::Decode(err.to_string()))
}

fn reject_unsuccessful<T>(envelope: &ApiResponse<T>) -> ClientResult<()> {
    if envelope.is_success() {
        return Ok(());
    }
    Err(ClientError::Rejected(
        envelope
            .explanation()
            .unwrap_or("Request was not accepted")
            .to_string(),
    ))
}

/// Server explanation from an error body: the envelope's error/message when
/// it parses, otherwise the trimmed text.
fn explain_body(body: &str) -> Option<String> {
    if let Ok(envelope) =
        serde_json::from_str::<ApiResponse<serde_json::Value>>(body)
        && let Some(explanation) = envelope.explanation()
    {
        return Some(explanation.to_string());
    }
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body)
        && let Some(message) = value.get("message").and_then(|m| m.as_str())
    {
        return Some(message.to_string());
    }
    let trimmed = body.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
