use crate::ui::topbar::AuthMode;
use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use secrecy::SecretString;

pub const LOGIN: &str = "login";
pub const REGISTER: &str = "register";

fn with_common_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("url")
                .long("url")
                .help("Base URL of the authentication API")
                .default_value("http://localhost:8080")
                .env("FRONTDOOR_URL"),
        )
        .arg(
            Arg::new("login")
                .short('l')
                .long("login")
                .help("Login name")
                .required(true),
        )
        .arg(
            Arg::new("password")
                .short('P')
                .long("password")
                .help("Password")
                .env("FRONTDOOR_PASSWORD")
                .hide_env_values(true)
                .required(true),
        )
        .arg(
            Arg::new("profile")
                .long("profile")
                .help("Fetch /user/me with the new token and print it")
                .action(ArgAction::SetTrue),
        )
}

#[must_use]
pub fn login_subcommand() -> Command {
    with_common_args(Command::new(LOGIN).about("Sign in through the login dialog"))
}

#[must_use]
pub fn register_subcommand() -> Command {
    with_common_args(Command::new(REGISTER).about("Create an account through the registration dialog"))
        .arg(
            Arg::new("email")
                .short('e')
                .long("email")
                .help("Email address")
                .required(true),
        )
}

#[derive(Debug)]
pub struct Options {
    pub url: String,
    pub mode: AuthMode,
    pub login: String,
    pub password: SecretString,
    pub email: String,
    pub profile: bool,
}

impl Options {
    /// # Errors
    /// Returns an error if a required argument is missing.
    pub fn parse(mode: AuthMode, matches: &ArgMatches) -> Result<Self> {
        let email = match mode {
            AuthMode::Login => String::new(),
            AuthMode::Registration => matches
                .get_one::<String>("email")
                .cloned()
                .context("missing required argument: --email")?,
        };

        Ok(Self {
            url: matches
                .get_one::<String>("url")
                .cloned()
                .context("missing required argument: --url")?,
            mode,
            login: matches
                .get_one::<String>("login")
                .cloned()
                .context("missing required argument: --login")?,
            password: matches
                .get_one::<String>("password")
                .map(|s| SecretString::from(s.as_str()))
                .context("missing required argument: --password")?,
            email,
            profile: matches.get_flag("profile"),
        })
    }
}
