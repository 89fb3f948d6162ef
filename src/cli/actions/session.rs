//! Drive the top bar dialog from the command line.
//!
//! The dialog is opened, filled and confirmed through the same events a UI
//! would send, so the outcome (token or error toast) is exactly what a user
//! would see.

use crate::client::{HttpUserService, UserService};
use crate::ui::{
    forms::Credentials,
    modal::{ButtonRow, ModalEvent, ModalHost, ModalProvider},
    toast::{Toast, ToastLevel, ToastProvider, Toaster},
    topbar::{AuthMode, TopBar, TopBarEvent},
};
use anyhow::{anyhow, Result};
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{debug, info};

/// Index of the confirm button in the dialog's right row.
const CONFIRM_BUTTON: usize = 1;

#[derive(Debug)]
pub struct Args {
    pub url: String,
    pub mode: AuthMode,
    pub login: String,
    pub password: SecretString,
    pub email: String,
    pub profile: bool,
}

/// Execute the login or register action, printing the token on success.
/// # Errors
/// Returns an error carrying the toast text when the server refuses, or when
/// the dialog does not allow confirmation.
pub async fn execute(args: Args) -> Result<()> {
    let service = HttpUserService::new(&args.url)?;
    let credentials = Credentials {
        login: args.login.clone(),
        password: args.password.expose_secret().to_string(),
        email: args.email.clone(),
    };

    let token = submit(service.clone(), args.mode, &credentials).await?;
    println!("{token}");

    if args.profile {
        let profile = service.me(&token).await?;
        println!("{}", serde_json::to_string_pretty(&profile)?);
    }

    Ok(())
}

/// Open the dialog for `mode`, type `credentials` into it and press confirm.
/// # Errors
/// Returns the error toasts joined by newlines when no token was obtained.
pub async fn submit<S: UserService>(
    service: S,
    mode: AuthMode,
    credentials: &Credentials,
) -> Result<String> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut top_bar = TopBar::new(service, ModalProvider::new(), ToastProvider::new(), tx.clone());

    tx.send(TopBarEvent::Open(mode))?;
    for &name in mode.fields() {
        tx.send(TopBarEvent::Input(name, credentials.get(name).to_string()))?;
    }
    pump(&mut top_bar, &mut rx).await;

    if let Some(view) = top_bar.modal().render() {
        debug!("{}\n{}", view.title, view.body);
    }

    let pressed = top_bar
        .modal_mut()
        .handle(ModalEvent::Button(ButtonRow::Right, CONFIRM_BUTTON));
    if !pressed {
        let errors = top_bar
            .modal()
            .render()
            .map(|view| view.body)
            .unwrap_or_default();
        return Err(anyhow!("Confirmation is disabled:\n{errors}"));
    }
    pump(&mut top_bar, &mut rx).await;

    let toasts = top_bar.toaster_mut().drain();
    for toast in &toasts {
        info!("{}: {}", toast.level, toast.message);
    }

    match top_bar.token() {
        Some(token) if !top_bar.modal().is_open() => Ok(token.to_string()),
        _ => Err(anyhow!(error_text(&toasts))),
    }
}

async fn pump<S: UserService, M: ModalHost, T: Toaster>(
    top_bar: &mut TopBar<S, M, T>,
    rx: &mut UnboundedReceiver<TopBarEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        top_bar.handle(event).await;
    }
}

fn error_text(toasts: &[Toast]) -> String {
    let errors: Vec<&str> = toasts
        .iter()
        .filter(|toast| toast.level == ToastLevel::Error)
        .map(|toast| toast.message.as_str())
        .collect();

    if errors.is_empty() {
        "No token received".to_string()
    } else {
        errors.join("\n")
    }
}
