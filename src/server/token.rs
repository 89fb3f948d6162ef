//! HS256 bearer tokens issued by the mock server.
//!
//! The format is a compact JWT: `base64url(header).base64url(claims).base64url(sig)`
//! with no padding. Only `alg = HS256` is accepted.

use super::store::User;
use base64ct::{Base64UrlUnpadded, Encoding};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use sha2::Sha256;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use ulid::Ulid;

type HmacSha256 = Hmac<Sha256>;

pub const DEFAULT_TTL_SECONDS: i64 = 3600;

/// One year. The CLI refuses anything longer.
pub const MAX_TTL_SECONDS: i64 = 31_536_000;

/// Used when no secret is configured. Fine for a local mock, nothing else.
pub const DEFAULT_SECRET: &str = "frontdoor-development-secret";

const ALG: &str = "HS256";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("invalid token format")]
    InvalidFormat,
    #[error("invalid base64")]
    InvalidBase64,
    #[error("invalid json: {0}")]
    InvalidJson(String),
    #[error("unsupported alg: {0}")]
    UnsupportedAlg(String),
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("invalid signing key")]
    InvalidKey,
    #[error("token lifetime of {0}s overflows the expiry")]
    InvalidTtl(i64),
}

#[derive(Debug, Serialize, Deserialize)]
struct Header {
    alg: String,
    typ: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Login of the token owner.
    pub sub: String,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

#[derive(Debug)]
pub struct TokenIssuer {
    secret: SecretString,
    ttl_seconds: i64,
}

impl TokenIssuer {
    #[must_use]
    pub fn new(secret: SecretString, ttl_seconds: i64) -> Self {
        Self {
            secret,
            ttl_seconds,
        }
    }

    #[must_use]
    pub fn ttl_seconds(&self) -> i64 {
        self.ttl_seconds
    }

    /// # Errors
    /// Returns an error if the claims cannot be encoded or the key is unusable.
    pub fn issue(&self, user: &User, now: i64) -> Result<String, TokenError> {
        let header = Header {
            alg: ALG.to_string(),
            typ: "JWT".to_string(),
        };
        let exp = now
            .checked_add(self.ttl_seconds)
            .ok_or(TokenError::InvalidTtl(self.ttl_seconds))?;
        let claims = Claims {
            sub: user.login.clone(),
            email: user.email.clone(),
            iat: now,
            exp,
            jti: Ulid::new().to_string(),
        };

        let signing_input = format!("{}.{}", b64e_json(&header)?, b64e_json(&claims)?);
        let signature = self.mac(signing_input.as_bytes())?.finalize().into_bytes();

        Ok(format!(
            "{signing_input}.{}",
            Base64UrlUnpadded::encode_string(&signature)
        ))
    }

    /// Check the signature and expiry and return the claims.
    ///
    /// # Errors
    /// Returns an error for malformed, forged, or expired tokens.
    pub fn verify(&self, token: &str, now: i64) -> Result<Claims, TokenError> {
        let mut parts = token.split('.');
        let (Some(h64), Some(c64), Some(s64), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(TokenError::InvalidFormat);
        };

        let header: Header = b64d_json(h64)?;
        if header.alg != ALG {
            return Err(TokenError::UnsupportedAlg(header.alg));
        }

        let signature =
            Base64UrlUnpadded::decode_vec(s64).map_err(|_| TokenError::InvalidBase64)?;
        let signing_input = format!("{h64}.{c64}");
        self.mac(signing_input.as_bytes())?
            .verify_slice(&signature)
            .map_err(|_| TokenError::InvalidSignature)?;

        let claims: Claims = b64d_json(c64)?;
        if now >= claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }

    fn mac(&self, input: &[u8]) -> Result<HmacSha256, TokenError> {
        let mut mac = HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .map_err(|_| TokenError::InvalidKey)?;
        mac.update(input);
        Ok(mac)
    }
}

#[must_use]
pub fn now_unix_seconds() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
}

fn b64e_json<T: Serialize>(value: &T) -> Result<String, TokenError> {
    let json = serde_json::to_vec(value).map_err(|e| TokenError::InvalidJson(e.to_string()))?;
    Ok(Base64UrlUnpadded::encode_string(&json))
}

fn b64d_json<T: DeserializeOwned>(input: &str) -> Result<T, TokenError> {
    let bytes = Base64UrlUnpadded::decode_vec(input).map_err(|_| TokenError::InvalidBase64)?;
    serde_json::from_slice(&bytes).map_err(|e| TokenError::InvalidJson(e.to_string()))
}
