use std::time::Duration;

use reqwest::{multipart, Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, FieldErrors, Result};

const USER_AGENT_STRING: &str = concat!("redbud-console/", env!("CARGO_PKG_VERSION"));

/// List endpoints may answer paginated or as a bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Listing<T> {
    Paged { results: Vec<T> },
    Bare(Vec<T>),
}

impl<T> Listing<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            Listing::Paged { results } => results,
            Listing::Bare(items) => items,
        }
    }
}

/// JSON client for the Redbud REST API.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        url::Url::parse(base_url)
            .map_err(|e| AppError::Config(format!("invalid API base URL {:?}: {}", base_url, e)))?;

        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(USER_AGENT_STRING)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Same client, authenticating every request with `token`.
    pub fn with_token(&self, token: impl Into<String>) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token: Some(token.into()),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = send(self.request(Method::GET, path), path).await?;
        decode(response).await
    }

    pub async fn get_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let listing: Listing<T> = self.get_json(path).await?;
        Ok(listing.into_vec())
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = send(self.request(Method::POST, path).json(body), path).await?;
        decode(response).await
    }

    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: multipart::Form,
    ) -> Result<T> {
        let response = send(self.request(Method::POST, path).multipart(form), path).await?;
        decode(response).await
    }

    pub async fn delete(&self, path: &str) -> Result<()> {
        send(self.request(Method::DELETE, path), path).await?;
        Ok(())
    }
}

async fn send(builder: RequestBuilder, path: &str) -> Result<Response> {
    let response = builder.send().await?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    tracing::debug!(%status, path, "API request failed");
    Err(error_for_status(status, &body, path))
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes)
        .map_err(|e| AppError::Transport(format!("unexpected response body: {}", e)))
}

/// Map a non-success status to the crate error taxonomy.
pub fn error_for_status(status: StatusCode, body: &str, path: &str) -> AppError {
    match status {
        StatusCode::NOT_FOUND => AppError::NotFound(path.to_string()),
        StatusCode::UNAUTHORIZED => AppError::Unauthorized,
        s if s.is_client_error() => {
            let mut errors = FieldErrors::from_body(body);
            if errors.is_empty() {
                errors.add(crate::error::NON_FIELD, format!("Request rejected (HTTP {})", s.as_u16()));
            }
            AppError::Validation(errors)
        }
        s => AppError::Transport(format!("HTTP {}", s.as_u16())),
    }
}
