use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Body text of the response returned when no handler can answer an exception.
pub const FALLBACK_BODY: &str = "Server Error occurred, we will work on fixing it ..!!";

/// Response produced by an exception handler or by the fallback.
///
/// Unlike a raw axum [`Response`], this value can be compared and cloned,
/// which keeps handlers easy to test in isolation.
///
/// # Example
/// ```
/// use advisor::common::AdviceResponse;
/// use axum::http::StatusCode;
///
/// let response = AdviceResponse::text(StatusCode::BAD_REQUEST, "Bad Request");
/// assert_eq!(response.status, StatusCode::BAD_REQUEST);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdviceResponse {
    pub status: StatusCode,
    pub body: ResponseBody,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseBody {
    /// Rendered as `text/plain; charset=utf-8`
    Text(String),
    /// Rendered as `application/json`
    Json(serde_json::Value),
}

impl AdviceResponse {
    pub fn new(status: StatusCode, body: ResponseBody) -> Self {
        Self { status, body }
    }

    /// Create a plain-text response
    pub fn text(status: StatusCode, body: impl Into<String>) -> Self {
        Self::new(status, ResponseBody::Text(body.into()))
    }

    /// Create a JSON response from any serializable payload
    ///
    /// Fails only when the payload itself cannot be serialized
    /// (e.g. a map with non-string keys).
    pub fn json<T: Serialize>(status: StatusCode, payload: &T) -> serde_json::Result<Self> {
        Ok(Self::new(status, ResponseBody::Json(serde_json::to_value(payload)?)))
    }

    /// The fixed 500 response used when dispatch cannot produce anything better
    pub fn fallback() -> Self {
        Self::text(StatusCode::INTERNAL_SERVER_ERROR, FALLBACK_BODY)
    }

    pub fn is_fallback(&self) -> bool {
        *self == Self::fallback()
    }
}

impl IntoResponse for AdviceResponse {
    fn into_response(self) -> Response {
        match self.body {
            ResponseBody::Text(text) => (self.status, text).into_response(),
            ResponseBody::Json(value) => (self.status, Json(value)).into_response(),
        }
    }
}
