use std::convert::Infallible;

use axum::extract::FromRequestParts;

pub const SESSION_HEADER: &str = "x-session-id";
const ANONYMOUS_SESSION: &str = "anon";

/// Opaque cart session identifier supplied by the storefront client. Absent
/// or blank headers fall back to the shared anonymous sentinel.
#[derive(Debug, Clone)]
pub struct SessionId(pub String);

impl<S> FromRequestParts<S> for SessionId
where
    S: Send + Sync,
{
    type Rejection = Infallible;
    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let session_id = parts
            .headers
            .get(SESSION_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(ANONYMOUS_SESSION);

        Ok(SessionId(session_id.to_string()))
    }
}
