//! Client for the user API.
//!
//! [`UserService`] is the seam the top bar talks to; [`HttpUserService`] is the
//! reqwest implementation. Tokens and passwords pass through but are never
//! logged.

mod errors;

pub use self::errors::ServiceError;

use crate::types::{ErrorPayload, LoginRequest, RegisterRequest, UserProfile};
use crate::APP_USER_AGENT;
use reqwest::{Client, Response};
use serde::Serialize;
use tracing::{debug, instrument};
use url::Url;

/// Maximum number of error body characters surfaced to the UI.
const MAX_ERROR_CHARS: usize = 200;

/// Login and sign-up calls. Both resolve to a bearer token.
#[allow(async_fn_in_trait)]
pub trait UserService {
    async fn login(&self, login: &str, password: &str) -> Result<String, ServiceError>;

    async fn sign_up(&self, login: &str, password: &str, email: &str)
        -> Result<String, ServiceError>;
}

#[derive(Clone, Debug)]
pub struct HttpUserService {
    client: Client,
    base_url: String,
}

impl HttpUserService {
    /// # Errors
    /// Returns an error if `base_url` is not an absolute URL or the HTTP client
    /// cannot be built.
    pub fn new(base_url: &str) -> Result<Self, ServiceError> {
        let parsed = Url::parse(base_url.trim()).map_err(|e| ServiceError::Url(e.to_string()))?;

        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .build()
            .map_err(|e| ServiceError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: parsed.to_string(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the profile the token belongs to.
    ///
    /// # Errors
    /// Returns an error if the request fails or the token is rejected.
    #[instrument(skip(self, token))]
    pub async fn me(&self, token: &str) -> Result<UserProfile, ServiceError> {
        let url = build_url(&self.base_url, "/user/me")?;
        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(map_request_error)?;

        if response.status().is_success() {
            response
                .json::<UserProfile>()
                .await
                .map_err(|e| ServiceError::Parse(e.to_string()))
        } else {
            Err(error_from_response(response).await)
        }
    }

    async fn post_for_token<B: Serialize>(&self, path: &str, body: &B) -> Result<String, ServiceError> {
        let url = build_url(&self.base_url, path)?;
        debug!("POST {url}");

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(map_request_error)?;

        if response.status().is_success() {
            response
                .text()
                .await
                .map_err(|e| ServiceError::Parse(e.to_string()))
        } else {
            Err(error_from_response(response).await)
        }
    }
}

impl UserService for HttpUserService {
    #[instrument(skip(self, password))]
    async fn login(&self, login: &str, password: &str) -> Result<String, ServiceError> {
        let body = LoginRequest {
            login: login.to_string(),
            password: password.to_string(),
        };
        self.post_for_token("/user/login", &body).await
    }

    #[instrument(skip(self, password))]
    async fn sign_up(
        &self,
        login: &str,
        password: &str,
        email: &str,
    ) -> Result<String, ServiceError> {
        let body = RegisterRequest {
            login: login.to_string(),
            password: password.to_string(),
            email: email.to_string(),
        };
        self.post_for_token("/user/register", &body).await
    }
}

/// Join the base URL and a path without doubling or dropping the slash.
fn build_url(base_url: &str, path: &str) -> Result<Url, ServiceError> {
    let base = base_url.trim().trim_end_matches('/');
    let joined = format!("{}/{}", base, path.trim().trim_start_matches('/'));
    Url::parse(&joined).map_err(|e| ServiceError::Url(e.to_string()))
}

fn map_request_error(err: reqwest::Error) -> ServiceError {
    ServiceError::Network(err.to_string())
}

/// Turn a failed response into an error. A `{status, message}` body gives the
/// message; any other body is trimmed and truncated instead.
async fn error_from_response(response: Response) -> ServiceError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorPayload>(&body)
        .map_or_else(|_| sanitize_body(&body), |payload| payload.message);

    ServiceError::Http {
        status: status.as_u16(),
        status_text: status.canonical_reason().unwrap_or_default().to_string(),
        message,
    }
}

fn sanitize_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "Request failed.".to_string()
    } else {
        trimmed.chars().take(MAX_ERROR_CHARS).collect()
    }
}
