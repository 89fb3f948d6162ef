//! Single-dialog modal host.
//!
//! Callers get a [`ModalHost`] and describe what to show with a
//! [`ModalConfig`]. `update` merges a [`ModalUpdate`] into the open dialog:
//! top-level fields are replaced, `body_params` is merged recursively.

use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

pub type Callback = Arc<dyn Fn() + Send + Sync>;
pub type BodyParams = Map<String, Value>;
pub type BodyRenderer = Arc<dyn Fn(&BodyParams) -> String + Send + Sync>;

#[derive(Clone)]
pub struct ModalButton {
    pub label: String,
    pub on_click: Callback,
    pub disabled: bool,
}

impl ModalButton {
    pub fn new(label: impl Into<String>, on_click: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            label: label.into(),
            on_click: Arc::new(on_click),
            disabled: false,
        }
    }

    #[must_use]
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

impl fmt::Debug for ModalButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModalButton")
            .field("label", &self.label)
            .field("disabled", &self.disabled)
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
pub struct ModalConfig {
    pub title: String,
    pub body: BodyRenderer,
    pub body_params: BodyParams,
    pub left_buttons: Vec<ModalButton>,
    pub right_buttons: Vec<ModalButton>,
    pub on_cancel: Option<Callback>,
    pub on_enter_pressed: Option<Callback>,
}

impl ModalConfig {
    pub fn new(
        title: impl Into<String>,
        body: impl Fn(&BodyParams) -> String + Send + Sync + 'static,
    ) -> Self {
        Self {
            title: title.into(),
            body: Arc::new(body),
            body_params: BodyParams::new(),
            left_buttons: Vec::new(),
            right_buttons: Vec::new(),
            on_cancel: None,
            on_enter_pressed: None,
        }
    }

    #[must_use]
    pub fn with_body_params(mut self, params: BodyParams) -> Self {
        self.body_params = params;
        self
    }

    #[must_use]
    pub fn left_button(mut self, button: ModalButton) -> Self {
        self.left_buttons.push(button);
        self
    }

    #[must_use]
    pub fn right_button(mut self, button: ModalButton) -> Self {
        self.right_buttons.push(button);
        self
    }

    #[must_use]
    pub fn on_cancel(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_cancel = Some(Arc::new(callback));
        self
    }

    #[must_use]
    pub fn on_enter_pressed(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_enter_pressed = Some(Arc::new(callback));
        self
    }

    fn merge(&mut self, patch: ModalUpdate) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(body) = patch.body {
            self.body = body;
        }
        if let Some(params) = patch.body_params {
            deep_merge(&mut self.body_params, params);
        }
        if let Some(buttons) = patch.left_buttons {
            self.left_buttons = buttons;
        }
        if let Some(buttons) = patch.right_buttons {
            self.right_buttons = buttons;
        }
        if let Some(callback) = patch.on_cancel {
            self.on_cancel = Some(callback);
        }
        if let Some(callback) = patch.on_enter_pressed {
            self.on_enter_pressed = Some(callback);
        }
    }
}

impl fmt::Debug for ModalConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModalConfig")
            .field("title", &self.title)
            .field("body_params", &self.body_params)
            .field("left_buttons", &self.left_buttons)
            .field("right_buttons", &self.right_buttons)
            .field("on_cancel", &self.on_cancel.is_some())
            .field("on_enter_pressed", &self.on_enter_pressed.is_some())
            .finish_non_exhaustive()
    }
}

/// Partial configuration for [`ModalHost::update`]. Unset fields are kept.
#[derive(Clone, Default)]
pub struct ModalUpdate {
    pub title: Option<String>,
    pub body: Option<BodyRenderer>,
    pub body_params: Option<BodyParams>,
    pub left_buttons: Option<Vec<ModalButton>>,
    pub right_buttons: Option<Vec<ModalButton>>,
    pub on_cancel: Option<Callback>,
    pub on_enter_pressed: Option<Callback>,
}

impl ModalUpdate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn body_params(mut self, params: BodyParams) -> Self {
        self.body_params = Some(params);
        self
    }

    #[must_use]
    pub fn left_buttons(mut self, buttons: Vec<ModalButton>) -> Self {
        self.left_buttons = Some(buttons);
        self
    }

    #[must_use]
    pub fn right_buttons(mut self, buttons: Vec<ModalButton>) -> Self {
        self.right_buttons = Some(buttons);
        self
    }
}

/// Merge `patch` into `target`. Objects present on both sides are merged key
/// by key; anything else in `patch` replaces what `target` had.
pub fn deep_merge(target: &mut BodyParams, patch: BodyParams) {
    for (key, value) in patch {
        match (target.get_mut(&key), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                deep_merge(existing, incoming);
            }
            (_, value) => {
                target.insert(key, value);
            }
        }
    }
}

/// Capability handed to components that want to show a dialog.
pub trait ModalHost {
    /// Install `config` and open the dialog, replacing any open one.
    fn configure(&mut self, config: ModalConfig);

    /// Merge `patch` into the open dialog. Does nothing when closed.
    fn update(&mut self, patch: ModalUpdate);

    /// Close the dialog. Closing a closed dialog is fine.
    fn close(&mut self);

    fn is_open(&self) -> bool;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonRow {
    Left,
    Right,
}

/// User input the host reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModalEvent {
    /// Click on the backdrop, outside the content box.
    OutsideClick,
    /// Click inside the content box; ignored.
    ContentClick,
    Escape,
    Enter,
    Button(ButtonRow, usize),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ButtonView {
    pub label: String,
    pub disabled: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModalView {
    pub title: String,
    pub body: String,
    pub left_buttons: Vec<ButtonView>,
    pub right_buttons: Vec<ButtonView>,
}

#[derive(Debug, Default)]
pub struct ModalProvider {
    current: Option<ModalConfig>,
}

impl ModalProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn config(&self) -> Option<&ModalConfig> {
        self.current.as_ref()
    }

    /// Dispatch user input. Returns `true` when the event did something.
    pub fn handle(&mut self, event: ModalEvent) -> bool {
        let Some(config) = self.current.as_ref() else {
            return false;
        };

        match event {
            ModalEvent::OutsideClick | ModalEvent::Escape => {
                let on_cancel = config.on_cancel.clone();
                self.close();
                if let Some(callback) = on_cancel {
                    callback();
                }
                true
            }
            ModalEvent::ContentClick => false,
            ModalEvent::Enter => match config.on_enter_pressed.clone() {
                Some(callback) => {
                    callback();
                    true
                }
                None => false,
            },
            ModalEvent::Button(row, index) => {
                let buttons = match row {
                    ButtonRow::Left => &config.left_buttons,
                    ButtonRow::Right => &config.right_buttons,
                };
                match buttons.get(index) {
                    Some(button) if !button.disabled => {
                        let on_click = Arc::clone(&button.on_click);
                        on_click();
                        true
                    }
                    _ => false,
                }
            }
        }
    }

    #[must_use]
    pub fn render(&self) -> Option<ModalView> {
        let config = self.current.as_ref()?;
        let buttons = |row: &[ModalButton]| -> Vec<ButtonView> {
            row.iter()
                .map(|button| ButtonView {
                    label: button.label.clone(),
                    disabled: button.disabled,
                })
                .collect()
        };

        Some(ModalView {
            title: config.title.clone(),
            body: (config.body)(&config.body_params),
            left_buttons: buttons(&config.left_buttons),
            right_buttons: buttons(&config.right_buttons),
        })
    }
}

impl ModalHost for ModalProvider {
    fn configure(&mut self, config: ModalConfig) {
        debug!("Opening modal: {}", config.title);
        self.current = Some(config);
    }

    fn update(&mut self, patch: ModalUpdate) {
        match self.current.as_mut() {
            Some(config) => config.merge(patch),
            None => debug!("Ignoring modal update, no modal is open"),
        }
    }

    fn close(&mut self) {
        if self.current.take().is_some() {
            debug!("Modal closed");
        }
    }

    fn is_open(&self) -> bool {
        self.current.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn params(value: Value) -> BodyParams {
        match value {
            Value::Object(map) => map,
            _ => BodyParams::new(),
        }
    }

    fn greeting() -> ModalConfig {
        ModalConfig::new("Hello", |params: &BodyParams| {
            format!(
                "{} {}",
                params.get("greeting").and_then(Value::as_str).unwrap_or(""),
                params.get("name").and_then(Value::as_str).unwrap_or("")
            )
        })
        .with_body_params(params(json!({ "greeting": "hi", "name": "ann", "nested": { "a": 1 } })))
    }

    fn counter() -> (Arc<AtomicUsize>, impl Fn() + Send + Sync + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let inner = Arc::clone(&count);
        (count, move || {
            inner.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn configure_opens_and_renders() {
        let mut modal = ModalProvider::new();
        assert!(!modal.is_open());
        assert!(modal.render().is_none());

        modal.configure(greeting().right_button(ModalButton::new("Ok", || {})));
        let view = modal.render();
        assert_eq!(view.as_ref().map(|v| v.body.as_str()), Some("hi ann"));
        assert_eq!(
            view.map(|v| v.right_buttons),
            Some(vec![ButtonView {
                label: "Ok".to_string(),
                disabled: false
            }])
        );
    }

    #[test]
    fn successive_updates_union_body_params() {
        let mut modal = ModalProvider::new();
        modal.configure(greeting());

        modal.update(ModalUpdate::new().body_params(params(json!({ "name": "bob", "x": 1, "nested": { "b": 2 } }))));
        modal.update(ModalUpdate::new().body_params(params(json!({ "x": 2, "y": 3 }))));

        let body_params = modal.config().map(|c| Value::Object(c.body_params.clone()));
        assert_eq!(
            body_params,
            Some(json!({
                "greeting": "hi",
                "name": "bob",
                "x": 2,
                "y": 3,
                "nested": { "a": 1, "b": 2 }
            }))
        );
    }

    #[test]
    fn update_replaces_top_level_fields_only_when_given() {
        let mut modal = ModalProvider::new();
        modal.configure(greeting().left_button(ModalButton::new("Back", || {})));

        modal.update(ModalUpdate::new().title("Bye"));
        let view = modal.render();
        assert_eq!(view.as_ref().map(|v| v.title.as_str()), Some("Bye"));
        assert_eq!(view.map(|v| v.left_buttons.len()), Some(1));

        modal.update(ModalUpdate::new().left_buttons(Vec::new()));
        assert_eq!(modal.render().map(|v| v.left_buttons.len()), Some(0));
    }

    #[test]
    fn update_without_modal_is_ignored() {
        let mut modal = ModalProvider::new();
        modal.update(ModalUpdate::new().title("ghost"));
        assert!(!modal.is_open());
    }

    #[test]
    fn close_is_idempotent() {
        let mut modal = ModalProvider::new();
        modal.configure(greeting());
        modal.close();
        modal.close();
        assert!(!modal.is_open());
    }

    #[test]
    fn escape_and_outside_click_close_and_cancel() {
        for event in [ModalEvent::Escape, ModalEvent::OutsideClick] {
            let (cancelled, on_cancel) = counter();
            let mut modal = ModalProvider::new();
            modal.configure(greeting().on_cancel(on_cancel));

            assert!(modal.handle(event));
            assert!(!modal.is_open());
            assert_eq!(cancelled.load(Ordering::SeqCst), 1);

            // nothing left to cancel
            assert!(!modal.handle(event));
            assert_eq!(cancelled.load(Ordering::SeqCst), 1);
        }
    }

    #[test]
    fn escape_without_on_cancel_still_closes() {
        let mut modal = ModalProvider::new();
        modal.configure(greeting());
        assert!(modal.handle(ModalEvent::Escape));
        assert!(!modal.is_open());
    }

    #[test]
    fn content_click_keeps_modal_open() {
        let mut modal = ModalProvider::new();
        modal.configure(greeting());
        assert!(!modal.handle(ModalEvent::ContentClick));
        assert!(modal.is_open());
    }

    #[test]
    fn enter_calls_on_enter_pressed() {
        let (pressed, on_enter) = counter();
        let mut modal = ModalProvider::new();
        modal.configure(greeting());
        assert!(!modal.handle(ModalEvent::Enter));

        modal.configure(greeting().on_enter_pressed(on_enter));
        assert!(modal.handle(ModalEvent::Enter));
        assert_eq!(pressed.load(Ordering::SeqCst), 1);
        assert!(modal.is_open());
    }

    #[test]
    fn disabled_buttons_do_not_fire() {
        let (clicked, on_click) = counter();
        let on_click = Arc::new(on_click);
        let enabled = Arc::clone(&on_click);
        let mut modal = ModalProvider::new();
        modal.configure(
            greeting()
                .right_button(ModalButton::new("Cancel", || {}))
                .right_button(ModalButton::new("Ok", move || on_click()).disabled(true)),
        );

        assert!(!modal.handle(ModalEvent::Button(ButtonRow::Right, 1)));
        assert!(!modal.handle(ModalEvent::Button(ButtonRow::Left, 0)));
        assert_eq!(clicked.load(Ordering::SeqCst), 0);

        modal.update(ModalUpdate::new().right_buttons(vec![ModalButton::new("Ok", move || enabled())]));
        assert!(modal.handle(ModalEvent::Button(ButtonRow::Right, 0)));
        assert_eq!(clicked.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn deep_merge_replaces_non_objects() {
        let mut target = params(json!({ "a": { "b": 1 }, "c": [1] }));
        deep_merge(&mut target, params(json!({ "a": 5, "c": { "d": 1 } })));
        assert_eq!(Value::Object(target), json!({ "a": 5, "c": { "d": 1 } }));
    }
}
