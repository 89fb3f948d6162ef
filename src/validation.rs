//! Field validation rules.
//!
//! A rule returns `None` when the value is acceptable and the key of the
//! message to show otherwise. Rules never fail and never touch state, so they
//! can run on every keystroke and again on the server.

use crate::ui::i18n::MessageKey;
use regex::Regex;

/// RFC 5322 inspired address pattern, applied to the lower-cased value.
/// Bracketed literal domains only check the shape of each group, not its range.
const EMAIL_PATTERN: &str = r#"^(([^<>()\[\]\\.,;:\s@"]+(\.[^<>()\[\]\\.,;:\s@"]+)*)|(".+"))@((\[[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\])|(([a-zA-Z\-0-9]+\.)+[a-zA-Z]{2,}))$"#;

/// A validation rule a field can activate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Validator {
    Require,
    Email,
}

impl Validator {
    #[must_use]
    pub fn validate(self, value: &str) -> Option<MessageKey> {
        match self {
            Self::Require => validate_require(value),
            Self::Email => validate_email(value),
        }
    }
}

fn trim_blank(value: &str) -> &str {
    value.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

/// Rejects values that are empty once surrounding whitespace is removed.
#[must_use]
pub fn validate_require(value: &str) -> Option<MessageKey> {
    if trim_blank(value).is_empty() {
        Some(MessageKey::RequiredError)
    } else {
        None
    }
}

/// Rejects blank values (with the required message) and values that are not
/// an email address.
#[must_use]
pub fn validate_email(value: &str) -> Option<MessageKey> {
    if let Some(required) = validate_require(value) {
        return Some(required);
    }

    let lowered = value.to_lowercase();
    if Regex::new(EMAIL_PATTERN).is_ok_and(|re| re.is_match(&lowered)) {
        None
    } else {
        Some(MessageKey::EmailError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLANKS: [&str; 10] = [
        "",
        " ",
        "\t",
        "\n",
        "\u{0b}",
        "\u{0c}",
        "\r",
        "\u{a0}",
        " \t\r\n\u{a0} ",
        "\u{feff}\u{0b}\u{0c}",
    ];

    #[test]
    fn require_rejects_whitespace_only() {
        for blank in BLANKS {
            assert_eq!(
                validate_require(blank),
                Some(MessageKey::RequiredError),
                "{blank:?} should be rejected"
            );
        }
    }

    #[test]
    fn require_accepts_any_visible_character() {
        for value in ["a", " a ", "\t0\n", "\u{a0}.\u{a0}", "   -"] {
            assert_eq!(validate_require(value), None, "{value:?} should pass");
        }
    }

    #[test]
    fn email_accepts_common_addresses() {
        let valid = [
            "john.doe@example.com",
            "a@b.co",
            "user+tag@sub.example.org",
            "first_last@my-host.io",
            "UPPER.Case@EXAMPLE.COM",
            "x@123.example.net",
            "\"quoted local part\"@example.com",
            "\"john..doe\"@example.com",
        ];
        for email in valid {
            assert_eq!(validate_email(email), None, "{email} should be valid");
        }
    }

    #[test]
    fn email_rejects_disallowed_local_characters() {
        for c in ['<', '>', '(', ')', '[', ']', '\\', ',', ';', ':', ' ', '"', '@'] {
            let email = format!("jo{c}hn@example.com");
            assert_eq!(
                validate_email(&email),
                Some(MessageKey::EmailError),
                "{email} should be invalid"
            );
        }
    }

    #[test]
    fn email_rejects_misplaced_dots() {
        for email in [
            "john..doe@example.com",
            ".john@example.com",
            "john.@example.com",
        ] {
            assert_eq!(validate_email(email), Some(MessageKey::EmailError));
        }
    }

    #[test]
    fn email_rejects_bad_domains() {
        for email in [
            "john@example",
            "john@example.c",
            "john@example.c0m",
            "john@exa_mple.com",
            "john@exa!mple.com",
            "john@example..com",
            "john@",
            "@example.com",
        ] {
            assert_eq!(
                validate_email(email),
                Some(MessageKey::EmailError),
                "{email} should be invalid"
            );
        }
    }

    #[test]
    fn email_accepts_bracketed_literals_without_range_checks() {
        for email in ["x@[1.2.3.4]", "x@[127.0.0.1]", "x@[999.999.999.999]"] {
            assert_eq!(validate_email(email), None, "{email} should be valid");
        }
    }

    #[test]
    fn email_rejects_malformed_bracketed_literals() {
        for email in [
            "x@[1.2.3]",
            "x@[1234.1.1.1]",
            "x@[1.1.1.1000]",
            "x@[.1.1.1]",
            "x@[1.1.1.1",
            "x@[a.b.c.d]",
        ] {
            assert_eq!(
                validate_email(email),
                Some(MessageKey::EmailError),
                "{email} should be invalid"
            );
        }
    }

    #[test]
    fn email_is_anchored() {
        assert_eq!(
            validate_email("john@example.com and more"),
            Some(MessageKey::EmailError)
        );
        assert_eq!(
            validate_email("<john@example.com>"),
            Some(MessageKey::EmailError)
        );
    }

    #[test]
    fn email_short_circuits_through_require() {
        for blank in BLANKS {
            assert_eq!(validate_email(blank), Some(MessageKey::RequiredError));
        }
    }

    #[test]
    fn validator_dispatch() {
        assert_eq!(Validator::Require.validate(""), Some(MessageKey::RequiredError));
        assert_eq!(Validator::Require.validate("x"), None);
        assert_eq!(Validator::Email.validate("x"), Some(MessageKey::EmailError));
        assert_eq!(Validator::Email.validate("x@y.zz"), None);
    }
}
