use super::error_response;
use crate::server::{
    store::{StoreError, UserStore},
    token::{now_unix_seconds, TokenIssuer},
};
use crate::types::{ErrorPayload, RegisterRequest};
use crate::ui::i18n::{Catalog, Translate};
use crate::validation::{validate_email, validate_require};
use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

#[utoipa::path(
    post,
    path= "/user/register",
    request_body = RegisterRequest,
    responses (
        (status = 201, description = "Registration successful, the body is the bearer token", body = String, content_type = "text/plain"),
        (status = 400, description = "Missing payload or invalid fields", body = ErrorPayload),
        (status = 409, description = "Login or email already registered", body = ErrorPayload),
    ),
    tag= "user"
)]
#[instrument(skip(store, issuer, payload))]
pub async fn register(
    store: Extension<UserStore>,
    issuer: Extension<Arc<TokenIssuer>>,
    payload: Option<Json<RegisterRequest>>,
) -> impl IntoResponse {
    let request: RegisterRequest = match payload {
        Some(Json(payload)) => payload,
        None => return error_response(StatusCode::BAD_REQUEST, "Missing payload"),
    };

    debug!("register: {:?}", request);

    let problems = invalid_fields(&request);
    if !problems.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, problems.join("\n"));
    }

    let user = match store
        .register(&request.login, &request.password, &request.email)
        .await
    {
        Ok(user) => user,
        Err(StoreError::Conflict(conflicts)) => {
            return error_response(StatusCode::CONFLICT, conflicts.join("\n"));
        }
        Err(e) => {
            error!("Error registering user: {}", e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to register user");
        }
    };

    info!("Registered user {}", user.login);

    match issuer.issue(&user, now_unix_seconds()) {
        Ok(token) => (StatusCode::CREATED, token).into_response(),
        Err(e) => {
            error!("Error issuing token: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to issue token")
        }
    }
}

/// Run the same rules the registration form runs, one line per bad field.
fn invalid_fields(request: &RegisterRequest) -> Vec<String> {
    let catalog = Catalog::new();
    [
        ("login", validate_require(&request.login)),
        ("password", validate_require(&request.password)),
        ("email", validate_email(&request.email)),
    ]
    .into_iter()
    .filter_map(|(name, key)| key.map(|key| format!("{name}: {}", catalog.translate(key))))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_fields_names_each_field() {
        let request = RegisterRequest {
            login: " ".to_string(),
            password: "pw".to_string(),
            email: "nope".to_string(),
        };
        assert_eq!(
            invalid_fields(&request),
            vec![
                "login: This field is required".to_string(),
                "email: Please enter a valid email address".to_string(),
            ]
        );
    }

    #[test]
    fn valid_request_has_no_problems() {
        let request = RegisterRequest {
            login: "bob".to_string(),
            password: "pw".to_string(),
            email: "bob@example.com".to_string(),
        };
        assert!(invalid_fields(&request).is_empty());
    }
}
