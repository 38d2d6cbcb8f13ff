use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// The request never produced a response (connect, timeout, body read).
    Transport,
    HttpStatus(u16),
    /// 2xx response without `status: "success"`.
    NotSuccess,
    /// Success marker present but the expected fields are missing or mistyped.
    Malformed,
}

#[derive(Debug, Clone)]
pub struct ApiError {
    pub endpoint: String,
    pub kind: ApiErrorKind,
    pub detail: String,
    pub raw_body: Option<String>,
}

impl ApiError {
    pub fn new(endpoint: impl Into<String>, kind: ApiErrorKind, detail: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            kind,
            detail: detail.into(),
            raw_body: None,
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.raw_body = Some(body.into());
        self
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            ApiErrorKind::Transport => "transport".to_string(),
            ApiErrorKind::HttpStatus(code) => format!("http {code}"),
            ApiErrorKind::NotSuccess => "not_success".to_string(),
            ApiErrorKind::Malformed => "malformed".to_string(),
        };
        write!(
            f,
            "API error (endpoint={}, kind={kind}): {}",
            self.endpoint, self.detail
        )
    }
}

impl std::error::Error for ApiError {}

/// Kind of the first `ApiError` in an `anyhow` chain, if any.
pub fn kind_of(err: &anyhow::Error) -> Option<ApiErrorKind> {
    err.chain()
        .find_map(|e| e.downcast_ref::<ApiError>())
        .map(|e| e.kind)
}
