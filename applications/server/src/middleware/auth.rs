/// Bearer token authentication
use crate::{error::ServerError, services::AuthService};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use harmony_core::types::UserId;
use std::sync::Arc;

/// Caller identity placed in request extensions by [`auth_middleware`]
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser(pub UserId);

impl AuthenticatedUser {
    pub fn user_id(&self) -> UserId {
        self.0
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Rejects the request with 401 unless it carries a valid access token
pub async fn auth_middleware(
    State(auth_service): State<Arc<AuthService>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let token = bearer_token(request.headers())
        .ok_or_else(|| ServerError::Auth("Missing bearer token".to_string()))?;

    let user_id = auth_service.verify_access_token(token).map_err(|e| {
        tracing::warn!(error = %e, "Rejected access token");
        ServerError::Auth("Invalid token".to_string())
    })?;

    request.extensions_mut().insert(AuthenticatedUser(user_id));

    Ok(next.run(request).await)
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .copied()
            .ok_or_else(|| ServerError::Auth("Not authenticated".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_is_extracted() {
        assert_eq!(bearer_token(&headers_with("Bearer abc.def")), Some("abc.def"));
    }

    #[test]
    fn test_other_schemes_and_blank_tokens_are_ignored() {
        assert_eq!(bearer_token(&headers_with("Basic dXNlcjpwYXNz")), None);
        assert_eq!(bearer_token(&headers_with("Bearer   ")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
