//! # Frontdoor (login and registration front end)
//!
//! `frontdoor` models a small single-page login/registration UI as plain Rust
//! state machines and ships the mock authentication API it talks to.
//!
//! ## Validation
//!
//! Fields validate themselves with two pure rules, `required` and `email`
//! (see [`validation`]). Rules return a message key, never an error value;
//! the field localizes and joins the messages for display.
//!
//! ## Components
//!
//! [`ui::field::Field`] is a controlled input whose validators are derived from
//! its props. [`ui::modal::ModalProvider`] hosts a single dialog and
//! [`ui::topbar::TopBar`] wires the login and registration forms into it and
//! calls the [`client::UserService`].
//!
//! ## Mock server
//!
//! [`server`] serves `/user/login` and `/user/register` from a JSON user store
//! and signs HS256 bearer tokens with a development secret. Every other route
//! requires `Authorization: Bearer <token>`.

pub mod cli;
pub mod client;
pub mod server;
pub mod types;
pub mod ui;
pub mod validation;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
