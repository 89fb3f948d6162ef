//! Transient notifications.

use std::fmt;
use tracing::{error, info};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Error,
}

impl fmt::Display for ToastLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => f.write_str("success"),
            Self::Error => f.write_str("error"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
}

pub trait Toaster {
    fn push(&mut self, toast: Toast);

    fn success(&mut self, message: impl Into<String>) {
        self.push(Toast {
            level: ToastLevel::Success,
            message: message.into(),
        });
    }

    fn error(&mut self, message: impl Into<String>) {
        self.push(Toast {
            level: ToastLevel::Error,
            message: message.into(),
        });
    }
}

/// Keeps every toast until it is dismissed.
#[derive(Clone, Debug, Default)]
pub struct ToastProvider {
    toasts: Vec<Toast>,
}

impl ToastProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn dismiss(&mut self, index: usize) -> Option<Toast> {
        (index < self.toasts.len()).then(|| self.toasts.remove(index))
    }

    pub fn drain(&mut self) -> Vec<Toast> {
        std::mem::take(&mut self.toasts)
    }
}

impl Toaster for ToastProvider {
    fn push(&mut self, toast: Toast) {
        match toast.level {
            ToastLevel::Success => info!("{}", toast.message),
            ToastLevel::Error => error!("{}", toast.message),
        }
        self.toasts.push(toast);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toasts_are_kept_in_order() {
        let mut toasts = ToastProvider::new();
        toasts.success("saved");
        toasts.error("boom");
        assert_eq!(
            toasts.toasts().iter().map(|t| t.level).collect::<Vec<_>>(),
            vec![ToastLevel::Success, ToastLevel::Error]
        );
    }

    #[test]
    fn dismiss_removes_one() {
        let mut toasts = ToastProvider::new();
        toasts.error("a");
        toasts.error("b");
        assert_eq!(toasts.dismiss(0).map(|t| t.message), Some("a".to_string()));
        assert_eq!(toasts.dismiss(5), None);
        assert_eq!(toasts.drain().len(), 1);
        assert!(toasts.toasts().is_empty());
    }
}
