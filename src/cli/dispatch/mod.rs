//! Map parsed arguments to an [`Action`].

use crate::cli::actions::{server, session, Action};
use crate::cli::commands;
use crate::ui::topbar::AuthMode;
use anyhow::{anyhow, Result};

/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    match matches.subcommand() {
        Some((commands::server::NAME, sub_m)) => {
            let opts = commands::server::Options::parse(sub_m)?;
            Ok(Action::Server(server::Args {
                port: opts.port,
                users: opts.users,
                secret: opts.secret,
                token_ttl_seconds: opts.token_ttl_seconds,
            }))
        }
        Some((commands::session::LOGIN, sub_m)) => session_action(AuthMode::Login, sub_m),
        Some((commands::session::REGISTER, sub_m)) => {
            session_action(AuthMode::Registration, sub_m)
        }
        Some((name, _)) => Err(anyhow!("unknown subcommand: {name}")),
        None => Err(anyhow!("missing subcommand")),
    }
}

fn session_action(mode: AuthMode, matches: &clap::ArgMatches) -> Result<Action> {
    let opts = commands::session::Options::parse(mode, matches)?;
    Ok(Action::Session(session::Args {
        url: opts.url,
        mode: opts.mode,
        login: opts.login,
        password: opts.password,
        email: opts.email,
        profile: opts.profile,
    }))
}
