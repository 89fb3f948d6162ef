use super::error_response;
use crate::server::token::{now_unix_seconds, TokenIssuer};
use axum::{
    extract::{Extension, Request},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::debug;

/// Reject requests without a valid `Authorization: Bearer <token>` header and
/// hand the verified claims to the handler as an extension.
pub async fn require_bearer(
    issuer: Extension<Arc<TokenIssuer>>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = bearer_token(&request) else {
        return error_response(StatusCode::UNAUTHORIZED, "Missing bearer token");
    };

    match issuer.verify(token, now_unix_seconds()) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(e) => {
            debug!("Rejected token: {}", e);
            error_response(StatusCode::UNAUTHORIZED, format!("Invalid token: {e}"))
        }
    }
}

fn bearer_token(request: &Request) -> Option<&str> {
    let value = request.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn with_auth(value: &str) -> Request {
        Request::builder()
            .header(AUTHORIZATION, value)
            .body(Body::empty())
            .unwrap_or_default()
    }

    #[test]
    fn bearer_token_parses_scheme_case_insensitively() {
        assert_eq!(bearer_token(&with_auth("Bearer abc")), Some("abc"));
        assert_eq!(bearer_token(&with_auth("bearer  abc ")), Some("abc"));
        assert_eq!(bearer_token(&with_auth("Basic abc")), None);
        assert_eq!(bearer_token(&with_auth("Bearer ")), None);
        assert_eq!(bearer_token(&Request::new(Body::empty())), None);
    }
}
