use super::error_response;
use crate::server::{store::UserStore, token::Claims};
use crate::types::{ErrorPayload, UserProfile};
use axum::{
    extract::Extension,
    http::{StatusCode, Uri},
    response::{IntoResponse, Json, Response},
};

#[utoipa::path(
    get,
    path = "/user/me",
    responses(
        (status = 200, description = "Profile of the token owner", body = UserProfile),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorPayload),
        (status = 404, description = "Token owner no longer exists", body = ErrorPayload),
    ),
    security(("bearer" = [])),
    tag = "user"
)]
pub async fn me(Extension(claims): Extension<Claims>, store: Extension<UserStore>) -> Response {
    match store.find(&claims.sub).await {
        Some(user) => (StatusCode::OK, Json(user.profile())).into_response(),
        None => error_response(StatusCode::NOT_FOUND, "User not found"),
    }
}

#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "All registered users", body = [UserProfile]),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorPayload),
    ),
    security(("bearer" = [])),
    tag = "user"
)]
pub async fn users(Extension(_claims): Extension<Claims>, store: Extension<UserStore>) -> Response {
    (StatusCode::OK, Json(store.profiles().await)).into_response()
}

/// Authenticated requests for unknown routes.
pub async fn not_found(uri: Uri) -> Response {
    error_response(StatusCode::NOT_FOUND, format!("No route for {}", uri.path()))
}
