//! Mock authentication API.
//!
//! `POST /user/login` (alias `/auth/login`) and `POST /user/register` answer
//! with a bare bearer token. `/health` and the OpenAPI docs are public; every
//! other route, including unknown ones, needs a valid bearer token first.

pub mod handlers;
pub mod store;
pub mod token;

use self::store::UserStore;
use self::token::TokenIssuer;
use anyhow::Result;
use axum::{
    body::Body,
    extract::MatchedPath,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderName, HeaderValue, Method, Request,
    },
    middleware,
    routing::{get, post},
    Extension, Router,
};
use std::{future::Future, sync::Arc};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::PropagateRequestIdLayer,
    set_header::SetRequestHeaderLayer,
    trace::TraceLayer,
};
use tracing::{info, info_span, Span};
use ulid::Ulid;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health,
        handlers::user_login::login,
        handlers::user_register::register,
        handlers::users::me,
        handlers::users::users,
    ),
    components(schemas(
        handlers::health::Health,
        crate::types::LoginRequest,
        crate::types::RegisterRequest,
        crate::types::ErrorPayload,
        crate::types::UserProfile,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "user", description = "Login, registration and profiles"),
        (name = "health", description = "Liveness"),
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}

/// Build the application with every route and layer attached.
pub fn router(store: UserStore, issuer: Arc<TokenIssuer>) -> Router {
    let protected = Router::new()
        .route("/user/me", get(handlers::me))
        .route("/users", get(handlers::users))
        .fallback(handlers::not_found)
        .layer(middleware::from_fn(handlers::require_bearer));

    let cors = CorsLayer::new()
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_origin(Any);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(handlers::health).options(handlers::health))
        .route("/user/login", post(handlers::login))
        .route("/auth/login", post(handlers::login))
        .route("/user/register", post(handlers::register))
        .merge(protected)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(cors)
                .layer(Extension(issuer))
                .layer(Extension(store)),
        )
}

/// Start the server on `port` and run until Ctrl-C.
/// # Errors
/// Return error if failed to start the server
pub async fn new(port: u16, store: UserStore, issuer: Arc<TokenIssuer>) -> Result<()> {
    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    serve(listener, store, issuer, async {
        let _ = tokio::signal::ctrl_c().await;
        info!("Gracefully shutdown");
    })
    .await
}

/// Serve on an already bound listener until `shutdown` resolves.
/// # Errors
/// Return error if the server fails while running
pub async fn serve(
    listener: TcpListener,
    store: UserStore,
    issuer: Arc<TokenIssuer>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let app = router(store, issuer);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}
