use crate::server::{
    self,
    store::UserStore,
    token::{TokenIssuer, DEFAULT_SECRET},
};
use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};
use std::{path::PathBuf, sync::Arc};
use tracing::{info, warn};

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub users: Option<PathBuf>,
    pub secret: SecretString,
    pub token_ttl_seconds: i64,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the user store cannot be loaded or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    log_startup_args(&args);

    let store = match &args.users {
        Some(path) => UserStore::load(path)
            .await
            .with_context(|| format!("Failed to load user store: {}", path.display()))?,
        None => UserStore::default(),
    };

    info!("Loaded {} users", store.len().await);

    let issuer = Arc::new(TokenIssuer::new(args.secret, args.token_ttl_seconds));

    server::new(args.port, store, issuer).await
}

fn log_startup_args(args: &Args) {
    let users = args
        .users
        .as_ref()
        .map_or_else(|| "in-memory".to_string(), |p| p.display().to_string());

    info!(
        port = args.port,
        users = %users,
        token_ttl_seconds = args.token_ttl_seconds,
        "Starting mock authentication API"
    );

    if args.secret.expose_secret() == DEFAULT_SECRET {
        warn!("Signing tokens with the built-in development secret");
    }
}
