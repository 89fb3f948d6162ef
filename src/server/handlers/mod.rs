pub mod auth;
pub use self::auth::require_bearer;

pub mod health;
pub use self::health::health;

pub mod user_login;
pub use self::user_login::login;

pub mod user_register;
pub use self::user_register::register;

pub mod users;
pub use self::users::{me, not_found, users};

// common functions for the handlers
use crate::types::ErrorPayload;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

/// Every failing route answers with `{status, message}`.
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorPayload {
            status: status.as_u16(),
            message: message.into(),
        }),
    )
        .into_response()
}
