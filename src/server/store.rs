//! In-memory user store, optionally backed by a JSON file of the form
//! `{"users": [...]}`. Handlers receive it through an axum `Extension`.

use crate::types::UserProfile;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info};
use ulid::Ulid;

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub login: String,
    pub email: String,
    pub password: String,
}

impl User {
    #[must_use]
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id.clone(),
            login: self.login.clone(),
            email: self.email.clone(),
        }
    }
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("login", &self.login)
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Default, Serialize, Deserialize)]
struct Document {
    #[serde(default)]
    users: Vec<User>,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access user store: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid user store json: {0}")]
    Json(#[from] serde_json::Error),
    /// Every reason the registration clashes with an existing user.
    #[error("{}", .0.join("\n"))]
    Conflict(Vec<String>),
}

#[derive(Clone, Debug, Default)]
pub struct UserStore {
    users: Arc<RwLock<Vec<User>>>,
    path: Option<PathBuf>,
}

impl UserStore {
    #[must_use]
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users: Arc::new(RwLock::new(users)),
            path: None,
        }
    }

    /// Parse a `{"users": [...]}` document.
    ///
    /// # Errors
    /// Returns an error if the document is not valid JSON of that shape.
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let document: Document = serde_json::from_str(json)?;
        Ok(Self::new(document.users))
    }

    /// Load the store from `path` and write registrations back to it. A
    /// missing file starts an empty store.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let mut store = match tokio::fs::read_to_string(path).await {
            Ok(json) => Self::from_json(&json)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("User store {} not found, starting empty", path.display());
                Self::default()
            }
            Err(e) => return Err(e.into()),
        };
        store.path = Some(path.to_path_buf());
        Ok(store)
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }

    pub async fn find(&self, login: &str) -> Option<User> {
        self.users
            .read()
            .await
            .iter()
            .find(|user| user.login == login)
            .cloned()
    }

    /// Return the user only when both login and password match.
    pub async fn authenticate(&self, login: &str, password: &str) -> Option<User> {
        self.users
            .read()
            .await
            .iter()
            .find(|user| user.login == login && user.password == password)
            .cloned()
    }

    pub async fn profiles(&self) -> Vec<UserProfile> {
        self.users.read().await.iter().map(User::profile).collect()
    }

    /// Add a user. Login and email must both be unused; when either is taken
    /// the error lists every clash.
    ///
    /// # Errors
    /// Returns [`StoreError::Conflict`] on duplicates, or an I/O error if the
    /// backing file cannot be written.
    pub async fn register(
        &self,
        login: &str,
        password: &str,
        email: &str,
    ) -> Result<User, StoreError> {
        let login = login.trim();
        let email = email.trim().to_lowercase();

        let mut users = self.users.write().await;

        let mut conflicts = Vec::new();
        if users.iter().any(|user| user.login == login) {
            conflicts.push(format!("Login {login} is already taken"));
        }
        if users.iter().any(|user| user.email.eq_ignore_ascii_case(&email)) {
            conflicts.push(format!("Email {email} is already registered"));
        }
        if !conflicts.is_empty() {
            return Err(StoreError::Conflict(conflicts));
        }

        let user = User {
            id: Ulid::new().to_string(),
            login: login.to_string(),
            email,
            password: password.to_string(),
        };
        // memory only changes once the file holds the new user
        if let Some(path) = &self.path {
            let mut next = users.clone();
            next.push(user.clone());
            let document = Document { users: next };
            tokio::fs::write(path, serde_json::to_vec_pretty(&document)?).await?;
            debug!("User store written to {}", path.display());
        }

        users.push(user.clone());

        Ok(user)
    }
}
