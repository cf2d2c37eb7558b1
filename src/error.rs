use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::rate_limit::RateLimitResult;
use crate::url_validator::UrlRejection;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited(RateLimitResult),

    #[error("{0}")]
    InvalidUrl(#[from] UrlRejection),

    #[error("Failed to fetch URL: {0}")]
    Upstream(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Response too large (max {max} bytes)")]
    TooLarge { max: usize },

    #[error("Unsupported content type: {0}")]
    UnsupportedContent(String),
}

impl ScrapeError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            Self::InvalidUrl(_) => StatusCode::BAD_REQUEST,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::Timeout => StatusCode::GATEWAY_TIMEOUT,
            Self::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::UnsupportedContent(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        }
    }
}

impl IntoResponse for ScrapeError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        let mut response = (self.status(), body).into_response();

        if let Self::RateLimited(result) = &self {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(result.reset_in));
        }

        response
    }
}
