//! Message keys and the built-in English catalog. Components only ever hold
//! keys; text is resolved at render time through [`Translate`].

use std::collections::HashMap;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MessageKey {
    RequiredError,
    EmailError,
    Cancel,
    Confirm,
    LoginTitle,
    RegistrationTitle,
    LoginLabel,
    PasswordLabel,
    EmailLabel,
    SwitchToRegistration,
    SwitchToLogin,
    LoginSuccess,
    RegistrationSuccess,
}

impl MessageKey {
    pub const ALL: [Self; 13] = [
        Self::RequiredError,
        Self::EmailError,
        Self::Cancel,
        Self::Confirm,
        Self::LoginTitle,
        Self::RegistrationTitle,
        Self::LoginLabel,
        Self::PasswordLabel,
        Self::EmailLabel,
        Self::SwitchToRegistration,
        Self::SwitchToLogin,
        Self::LoginSuccess,
        Self::RegistrationSuccess,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RequiredError => "COMMON.REQUIRED_ERROR",
            Self::EmailError => "COMMON.EMAIL_ERROR",
            Self::Cancel => "COMMON.CANCEL",
            Self::Confirm => "COMMON.CONFIRM",
            Self::LoginTitle => "LOGIN.TITLE",
            Self::RegistrationTitle => "REGISTRATION.TITLE",
            Self::LoginLabel => "LOGIN.LOGIN",
            Self::PasswordLabel => "LOGIN.PASSWORD",
            Self::EmailLabel => "REGISTRATION.EMAIL",
            Self::SwitchToRegistration => "LOGIN.SIGN_UP",
            Self::SwitchToLogin => "REGISTRATION.SIGN_IN",
            Self::LoginSuccess => "LOGIN.SUCCESS",
            Self::RegistrationSuccess => "REGISTRATION.SUCCESS",
        }
    }

    const fn english(self) -> &'static str {
        match self {
            Self::RequiredError => "This field is required",
            Self::EmailError => "Please enter a valid email address",
            Self::Cancel => "Cancel",
            Self::Confirm => "Confirm",
            Self::LoginTitle => "Sign in",
            Self::RegistrationTitle => "Create an account",
            Self::LoginLabel => "Login",
            Self::PasswordLabel => "Password",
            Self::EmailLabel => "Email",
            Self::SwitchToRegistration => "Sign up",
            Self::SwitchToLogin => "I already have an account",
            Self::LoginSuccess => "Signed in",
            Self::RegistrationSuccess => "Account created",
        }
    }
}

impl fmt::Display for MessageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolves a key to display text.
pub trait Translate {
    fn translate(&self, key: MessageKey) -> String;
}

/// English messages with optional per-key overrides.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    overrides: HashMap<MessageKey, String>,
}

impl Catalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_message(mut self, key: MessageKey, text: impl Into<String>) -> Self {
        self.overrides.insert(key, text.into());
        self
    }
}

impl Translate for Catalog {
    fn translate(&self, key: MessageKey) -> String {
        self.overrides
            .get(&key)
            .cloned()
            .unwrap_or_else(|| key.english().to_string())
    }
}

/// Renders keys verbatim, handy when asserting on which rule fired.
#[derive(Clone, Copy, Debug, Default)]
pub struct KeysOnly;

impl Translate for KeysOnly {
    fn translate(&self, key: MessageKey) -> String {
        key.as_str().to_string()
    }
}
