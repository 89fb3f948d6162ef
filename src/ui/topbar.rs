//! Top bar: opens the login/registration dialog, owns the drafts and talks to
//! the user service.
//!
//! Dialog buttons and keys are turned into [`TopBarEvent`]s sent over an
//! unbounded channel; the host feeds them back through [`TopBar::handle`] one
//! at a time.

use super::forms::{Credentials, Form, FormField, LoginForm, RegistrationForm};
use super::i18n::{Catalog, MessageKey, Translate};
use super::modal::{BodyParams, ModalButton, ModalConfig, ModalHost, ModalProvider, ModalUpdate};
use super::toast::{ToastProvider, Toaster};
use crate::client::UserService;
use crate::validation::validate_require;
use serde_json::{json, Value};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, instrument};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Registration,
}

impl AuthMode {
    #[must_use]
    pub const fn fields(self) -> &'static [FormField] {
        match self {
            Self::Login => LoginForm::FIELDS,
            Self::Registration => RegistrationForm::FIELDS,
        }
    }

    const fn title(self) -> MessageKey {
        match self {
            Self::Login => MessageKey::LoginTitle,
            Self::Registration => MessageKey::RegistrationTitle,
        }
    }

    const fn other(self) -> Self {
        match self {
            Self::Login => Self::Registration,
            Self::Registration => Self::Login,
        }
    }

    const fn switch_label(self) -> MessageKey {
        match self {
            Self::Login => MessageKey::SwitchToRegistration,
            Self::Registration => MessageKey::SwitchToLogin,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TopBarEvent {
    Open(AuthMode),
    Input(FormField, String),
    Confirm,
    Cancel,
}

#[derive(Debug)]
enum ActiveForm {
    Login(LoginForm),
    Registration(RegistrationForm),
}

impl ActiveForm {
    fn new(mode: AuthMode, values: &Credentials, translate: &dyn Translate) -> Self {
        match mode {
            AuthMode::Login => Self::Login(LoginForm::new(values, translate)),
            AuthMode::Registration => Self::Registration(RegistrationForm::new(values, translate)),
        }
    }

    fn change(
        &mut self,
        name: FormField,
        value: String,
        translate: &dyn Translate,
        on_change: impl FnOnce(FormField, String),
    ) {
        match self {
            Self::Login(form) => form.change(name, value, translate, on_change),
            Self::Registration(form) => form.change(name, value, translate, on_change),
        }
    }

    fn render(&mut self, values: &Credentials, translate: &dyn Translate) {
        match self {
            Self::Login(form) => form.render(values, translate),
            Self::Registration(form) => form.render(values, translate),
        }
    }

    fn error(&self, name: FormField) -> String {
        let field = match self {
            Self::Login(form) => form.field(name),
            Self::Registration(form) => form.field(name),
        };
        field.map(|f| f.error().to_string()).unwrap_or_default()
    }
}

/// `true` when any field the mode needs is still blank. Blank follows
/// `validate_require`, so a whitespace-only draft counts as empty.
#[must_use]
pub fn confirmation_disabled(mode: AuthMode, drafts: &Credentials) -> bool {
    mode.fields()
        .iter()
        .any(|&name| validate_require(drafts.get(name)).is_some())
}

pub struct TopBar<S, M = ModalProvider, T = ToastProvider> {
    service: S,
    modal: M,
    toaster: T,
    catalog: Catalog,
    events: UnboundedSender<TopBarEvent>,
    mode: AuthMode,
    drafts: Credentials,
    disabled_confirmation: bool,
    form: Option<ActiveForm>,
    token: Option<String>,
}

impl<S: UserService, M: ModalHost, T: Toaster> TopBar<S, M, T> {
    pub fn new(service: S, modal: M, toaster: T, events: UnboundedSender<TopBarEvent>) -> Self {
        Self {
            service,
            modal,
            toaster,
            catalog: Catalog::new(),
            events,
            mode: AuthMode::Login,
            drafts: Credentials::default(),
            disabled_confirmation: true,
            form: None,
            token: None,
        }
    }

    #[must_use]
    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub async fn handle(&mut self, event: TopBarEvent) {
        match event {
            TopBarEvent::Open(mode) => self.open(mode),
            TopBarEvent::Input(name, value) => self.input(name, value),
            TopBarEvent::Confirm => self.confirm().await,
            TopBarEvent::Cancel => self.cancel(),
        }
    }

    /// Show the dialog for `mode`. Drafts survive switching between modes.
    pub fn open(&mut self, mode: AuthMode) {
        debug!("Opening {:?} dialog", mode);
        self.mode = mode;
        self.form = Some(ActiveForm::new(mode, &self.drafts, &self.catalog));
        self.disabled_confirmation = confirmation_disabled(mode, &self.drafts);
        let config = self.modal_config();
        self.modal.configure(config);
    }

    /// Route an edit through the form, store the draft and refresh the dialog.
    pub fn input(&mut self, name: FormField, value: String) {
        let Some(form) = self.form.as_mut() else {
            debug!("Ignoring input for {name}, no dialog is open");
            return;
        };

        let drafts = &mut self.drafts;
        let mut accepted = false;
        form.change(name, value, &self.catalog, |name, value| {
            drafts.set(name, value);
            accepted = true;
        });
        if !accepted {
            return;
        }

        form.render(&self.drafts, &self.catalog);
        self.disabled_confirmation = confirmation_disabled(self.mode, &self.drafts);

        let mut entry = BodyParams::new();
        entry.insert(
            name.as_str().to_string(),
            json!({ "value": self.drafts.get(name), "error": form.error(name) }),
        );
        let mut params = BodyParams::new();
        params.insert("fields".to_string(), Value::Object(entry));

        let right_buttons = self.right_buttons();
        self.modal.update(
            ModalUpdate::new()
                .body_params(params)
                .right_buttons(right_buttons),
        );
    }

    /// Submit the drafts. Success keeps the token and closes the dialog;
    /// failure is toasted and leaves the dialog and drafts untouched.
    #[instrument(skip(self), fields(mode = ?self.mode))]
    pub async fn confirm(&mut self) {
        if self.form.is_none() || self.disabled_confirmation {
            debug!("Confirmation ignored");
            return;
        }

        let result = match self.mode {
            AuthMode::Login => {
                self.service
                    .login(&self.drafts.login, &self.drafts.password)
                    .await
            }
            AuthMode::Registration => {
                self.service
                    .sign_up(&self.drafts.login, &self.drafts.password, &self.drafts.email)
                    .await
            }
        };

        match result {
            Ok(token) => {
                info!("Authenticated as {}", self.drafts.login);
                self.token = Some(token);
                let message = match self.mode {
                    AuthMode::Login => MessageKey::LoginSuccess,
                    AuthMode::Registration => MessageKey::RegistrationSuccess,
                };
                self.toaster.success(self.catalog.translate(message));
                self.form = None;
                self.modal.close();
            }
            Err(err) => {
                self.toaster.error(err.message());
            }
        }
    }

    pub fn cancel(&mut self) {
        self.form = None;
        self.modal.close();
    }

    #[must_use]
    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    #[must_use]
    pub fn drafts(&self) -> &Credentials {
        &self.drafts
    }

    #[must_use]
    pub fn is_confirmation_disabled(&self) -> bool {
        self.disabled_confirmation
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    #[must_use]
    pub fn modal(&self) -> &M {
        &self.modal
    }

    pub fn modal_mut(&mut self) -> &mut M {
        &mut self.modal
    }

    #[must_use]
    pub fn toaster(&self) -> &T {
        &self.toaster
    }

    pub fn toaster_mut(&mut self) -> &mut T {
        &mut self.toaster
    }

    fn right_buttons(&self) -> Vec<ModalButton> {
        vec![
            ModalButton::new(
                self.catalog.translate(MessageKey::Cancel),
                emit(&self.events, TopBarEvent::Cancel),
            ),
            ModalButton::new(
                self.catalog.translate(MessageKey::Confirm),
                emit(&self.events, TopBarEvent::Confirm),
            )
            .disabled(self.disabled_confirmation),
        ]
    }

    fn modal_config(&self) -> ModalConfig {
        let mode = self.mode;
        let labels: Vec<(FormField, String)> = mode
            .fields()
            .iter()
            .map(|&name| (name, self.catalog.translate(name.label())))
            .collect();

        let mut fields = BodyParams::new();
        for &name in mode.fields() {
            fields.insert(
                name.as_str().to_string(),
                json!({ "value": self.drafts.get(name), "error": "" }),
            );
        }
        let mut params = BodyParams::new();
        params.insert("fields".to_string(), Value::Object(fields));

        let mut config = ModalConfig::new(self.catalog.translate(mode.title()), move |params| {
            render_body(&labels, params)
        })
        .with_body_params(params)
        .left_button(ModalButton::new(
            self.catalog.translate(mode.switch_label()),
            emit(&self.events, TopBarEvent::Open(mode.other())),
        ))
        .on_cancel(emit(&self.events, TopBarEvent::Cancel))
        .on_enter_pressed(emit(&self.events, TopBarEvent::Confirm));

        config.right_buttons = self.right_buttons();
        config
    }
}

/// Callback that sends `event` to the top bar's channel.
fn emit(
    events: &UnboundedSender<TopBarEvent>,
    event: TopBarEvent,
) -> impl Fn() + Send + Sync + 'static {
    let events = events.clone();
    move || {
        if events.send(event.clone()).is_err() {
            debug!("Top bar event dropped, receiver is gone");
        }
    }
}

/// Text rendering of the form: one line per field, errors indented below.
fn render_body(labels: &[(FormField, String)], params: &BodyParams) -> String {
    let fields = params.get("fields");
    let mut lines = Vec::new();

    for (name, label) in labels {
        let entry = fields.and_then(|f| f.get(name.as_str()));
        let value = entry
            .and_then(|e| e.get("value"))
            .and_then(Value::as_str)
            .unwrap_or_default();
        let shown = if *name == FormField::Password {
            "*".repeat(value.chars().count())
        } else {
            value.to_string()
        };
        lines.push(format!("{label}: {shown}"));

        let error = entry
            .and_then(|e| e.get("error"))
            .and_then(Value::as_str)
            .unwrap_or_default();
        for line in error.lines() {
            lines.push(format!("  ! {line}"));
        }
    }

    lines.join("\n")
}
