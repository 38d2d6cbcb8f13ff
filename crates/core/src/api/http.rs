use crate::api::error::{ApiError, ApiErrorKind};
use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const SUCCESS: &str = "success";

/// JSON-over-HTTP plumbing shared by the grow and build clients.
///
/// Bodies are decoded straight from the response text so that object key
/// order survives into types that care about it (VC schedules).
#[derive(Debug, Clone)]
pub struct JsonHttp {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl JsonHttp {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        anyhow::ensure!(!base_url.trim().is_empty(), "base url must be non-empty");

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build reqwest client")?;

        Ok(Self {
            http,
            base_url: base_url.trim().trim_end_matches('/').to_string(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> anyhow::Result<T> {
        tracing::debug!(path, "GET");
        let req = self.http.get(self.url(path));
        self.execute(path, req).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> anyhow::Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        tracing::debug!(path, "POST");
        let req = self.http.post(self.url(path)).json(body);
        self.execute(path, req).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        path: &str,
        req: reqwest::RequestBuilder,
    ) -> anyhow::Result<T> {
        let res = req
            .send()
            .await
            .map_err(|e| ApiError::new(path, ApiErrorKind::Transport, e.to_string()))?;

        let status = res.status();
        let text = res.text().await.map_err(|e| {
            ApiError::new(
                path,
                ApiErrorKind::Transport,
                format!("failed to read response body: {e}"),
            )
        })?;

        Ok(decode(path, status.as_u16(), &text)?)
    }
}

/// Applies the response contract: 2xx, JSON, `status: "success"`, then the
/// typed shape.
pub fn decode<T: DeserializeOwned>(path: &str, http_status: u16, text: &str) -> Result<T, ApiError> {
    if !(200..300).contains(&http_status) {
        return Err(ApiError::new(
            path,
            ApiErrorKind::HttpStatus(http_status),
            format!("status={http_status}"),
        )
        .with_body(text));
    }

    let envelope = serde_json::from_str::<Envelope>(text).map_err(|e| {
        ApiError::new(
            path,
            ApiErrorKind::Malformed,
            format!("response is not a JSON object: {e}"),
        )
        .with_body(text)
    })?;

    if envelope.status.as_deref() != Some(SUCCESS) {
        let detail = match (envelope.status, envelope.error) {
            (_, Some(error)) => error,
            (Some(status), None) => format!("status={status}"),
            (None, None) => "missing status marker".to_string(),
        };
        return Err(ApiError::new(path, ApiErrorKind::NotSuccess, detail).with_body(text));
    }

    serde_json::from_str::<T>(text).map_err(|e| {
        ApiError::new(path, ApiErrorKind::Malformed, e.to_string()).with_body(text)
    })
}
