use crate::server::token::{DEFAULT_SECRET, DEFAULT_TTL_SECONDS, MAX_TTL_SECONDS};
use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use secrecy::SecretString;
use std::path::PathBuf;

pub const NAME: &str = "server";

#[must_use]
pub fn subcommand() -> Command {
    Command::new(NAME)
        .about("Run the mock authentication API")
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("8080")
                .env("FRONTDOOR_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new("users")
                .short('u')
                .long("users")
                .help("JSON user store, example: {\"users\": [...]}")
                .long_help(
                    "JSON user store. A missing file starts empty; registrations are written back to it. Without this option users live in memory only.",
                )
                .env("FRONTDOOR_USERS")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("secret")
                .long("secret")
                .help("HMAC secret used to sign bearer tokens")
                .env("FRONTDOOR_SECRET")
                .hide_env_values(true)
                .default_value(DEFAULT_SECRET),
        )
        .arg(
            Arg::new("token-ttl")
                .long("token-ttl")
                .help("Token lifetime in seconds, at most one year")
                .env("FRONTDOOR_TOKEN_TTL")
                .default_value("3600")
                .value_parser(clap::value_parser!(i64).range(1..=MAX_TTL_SECONDS)),
        )
}

#[derive(Debug)]
pub struct Options {
    pub port: u16,
    pub users: Option<PathBuf>,
    pub secret: SecretString,
    pub token_ttl_seconds: i64,
}

impl Options {
    /// # Errors
    /// Returns an error if a defaulted argument is missing.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        Ok(Self {
            port: matches.get_one::<u16>("port").copied().unwrap_or(8080),
            users: matches.get_one::<PathBuf>("users").cloned(),
            secret: matches
                .get_one::<String>("secret")
                .map(|s| SecretString::from(s.as_str()))
                .context("missing required argument: --secret")?,
            token_ttl_seconds: matches
                .get_one::<i64>("token-ttl")
                .copied()
                .unwrap_or(DEFAULT_TTL_SECONDS),
        })
    }
}
