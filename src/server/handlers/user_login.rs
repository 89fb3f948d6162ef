use super::error_response;
use crate::server::{
    store::UserStore,
    token::{now_unix_seconds, TokenIssuer},
};
use crate::types::{ErrorPayload, LoginRequest};
use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::{debug, error, instrument, warn};

#[utoipa::path(
    post,
    path= "/user/login",
    request_body = LoginRequest,
    responses (
        (status = 200, description = "Login successful, the body is the bearer token", body = String, content_type = "text/plain"),
        (status = 400, description = "Missing or malformed payload", body = ErrorPayload),
        (status = 401, description = "Unknown login or wrong password", body = ErrorPayload),
    ),
    tag= "user"
)]
#[instrument(skip(store, issuer, payload))]
pub async fn login(
    store: Extension<UserStore>,
    issuer: Extension<Arc<TokenIssuer>>,
    payload: Option<Json<LoginRequest>>,
) -> impl IntoResponse {
    let request: LoginRequest = match payload {
        Some(Json(payload)) => payload,
        None => return error_response(StatusCode::BAD_REQUEST, "Missing payload"),
    };

    debug!("login attempt: {:?}", request);

    let Some(user) = store.authenticate(request.login.trim(), &request.password).await else {
        warn!("Invalid credentials for {}", request.login);
        return error_response(StatusCode::UNAUTHORIZED, "Invalid login or password");
    };

    match issuer.issue(&user, now_unix_seconds()) {
        Ok(token) => (StatusCode::OK, token).into_response(),
        Err(e) => {
            error!("Error issuing token: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to issue token")
        }
    }
}
