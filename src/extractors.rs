use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};

pub const USER_ID_HEADER: &str = "x-user-id";

/// Caller's user id, set by the fronting proxy or bot gateway.
#[derive(Debug, Clone, Copy)]
pub struct UserId(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for UserId
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, String);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|h| h.to_str().ok())
            .ok_or((StatusCode::UNAUTHORIZED, "missing X-User-Id header".to_string()))?;

        let id = raw
            .trim()
            .parse::<i64>()
            .map_err(|_| (StatusCode::UNAUTHORIZED, "invalid X-User-Id header".to_string()))?;

        Ok(UserId(id))
    }
}
