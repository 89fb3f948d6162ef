//! Controlled input with validators derived from its props.
//!
//! The value lives with the parent. A [`Field`] only keeps what it derives
//! from props (validators, rendered type, class name) and the error string of
//! the last change. Derivation is a pure reducer, [`derive_state`], so any host
//! can drive it by handing over the previous and next props.

use super::i18n::Translate;
use crate::validation::Validator;
use std::sync::Arc;

const BASE_CLASS: &str = "field";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FieldType {
    #[default]
    Text,
    Password,
    Email,
}

impl FieldType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Password => "password",
            Self::Email => "email",
        }
    }

    /// Email inputs render as plain text so the browser's own email checks
    /// never run; the email rule still applies.
    #[must_use]
    pub const fn rendered(self) -> Self {
        match self {
            Self::Email => Self::Text,
            other => other,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldProps {
    pub value: String,
    pub label: String,
    pub class_name: Option<String>,
    pub required: bool,
    pub field_type: Option<FieldType>,
}

impl FieldProps {
    #[must_use]
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    #[must_use]
    pub fn with_type(mut self, field_type: FieldType) -> Self {
        self.field_type = Some(field_type);
        self
    }

    #[must_use]
    pub fn with_class(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    fn field_type(&self) -> FieldType {
        self.field_type.unwrap_or_default()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldState {
    pub validators: Arc<[Validator]>,
    pub input_type: FieldType,
    pub class_name: String,
    pub error: String,
}

impl Default for FieldState {
    fn default() -> Self {
        Self {
            validators: Arc::from(Vec::new()),
            input_type: FieldType::Text,
            class_name: BASE_CLASS.to_string(),
            error: String::new(),
        }
    }
}

/// Changes [`derive_state`] wants applied. `None` keeps the current value,
/// including the identity of the validator list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldStatePatch {
    pub validators: Option<Arc<[Validator]>>,
    pub input_type: Option<FieldType>,
    pub class_name: Option<String>,
}

impl FieldStatePatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.validators.is_none() && self.input_type.is_none() && self.class_name.is_none()
    }

    pub fn apply(self, state: &mut FieldState) {
        if let Some(validators) = self.validators {
            state.validators = validators;
        }
        if let Some(input_type) = self.input_type {
            state.input_type = input_type;
        }
        if let Some(class_name) = self.class_name {
            state.class_name = class_name;
        }
    }
}

#[must_use]
pub fn active_validators(props: &FieldProps) -> Vec<Validator> {
    let mut validators = Vec::with_capacity(2);
    if props.required {
        validators.push(Validator::Require);
    }
    if props.field_type() == FieldType::Email {
        validators.push(Validator::Email);
    }
    validators
}

#[must_use]
pub fn compose_class_name(class_name: Option<&str>) -> String {
    match class_name {
        Some(extra) if !extra.is_empty() => format!("{BASE_CLASS} {extra}"),
        _ => BASE_CLASS.to_string(),
    }
}

/// Diff `prev_props` against `next_props` and return the state patch.
///
/// Validators and the rendered type are only recomputed when `required` or
/// `field_type` changed (or on mount, when there are no previous props).
#[must_use]
pub fn derive_state(
    prev_props: Option<&FieldProps>,
    prev_state: Option<&FieldState>,
    next_props: &FieldProps,
) -> FieldStatePatch {
    let rules_changed = prev_props.map_or(true, |prev| {
        prev.required != next_props.required || prev.field_type() != next_props.field_type()
    });

    let mut patch = FieldStatePatch::default();

    if rules_changed {
        let validators = active_validators(next_props);
        let same_members = prev_state.is_some_and(|state| *state.validators == *validators);
        if !same_members {
            patch.validators = Some(Arc::from(validators));
        }

        let input_type = next_props.field_type().rendered();
        if prev_state.map_or(true, |state| state.input_type != input_type) {
            patch.input_type = Some(input_type);
        }
    }

    let class_name = compose_class_name(next_props.class_name.as_deref());
    if prev_state.map_or(true, |state| state.class_name != class_name) {
        patch.class_name = Some(class_name);
    }

    patch
}

/// Where a field shows its error.
pub trait Tooltip {
    fn show(&mut self, message: &str);
    fn hide(&mut self);
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TooltipState {
    pub visible: bool,
}

impl Tooltip for TooltipState {
    fn show(&mut self, _message: &str) {
        self.visible = true;
    }

    fn hide(&mut self) {
        self.visible = false;
    }
}

/// What a renderer needs to draw the input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputView {
    pub class_name: String,
    pub input_type: &'static str,
    pub label: String,
    pub value: String,
    pub tooltip: Option<String>,
}

#[derive(Debug)]
pub struct Field<T = TooltipState> {
    props: FieldProps,
    state: FieldState,
    tooltip: T,
    tooltip_visible: bool,
}

impl Field<TooltipState> {
    #[must_use]
    pub fn new(props: FieldProps) -> Self {
        Self::mount(props, TooltipState::default())
    }
}

impl<T: Tooltip> Field<T> {
    #[must_use]
    pub fn mount(props: FieldProps, tooltip: T) -> Self {
        let mut state = FieldState::default();
        derive_state(None, None, &props).apply(&mut state);

        Self {
            props,
            state,
            tooltip,
            tooltip_visible: false,
        }
    }

    /// Receive new props from the parent.
    pub fn set_props(&mut self, next: FieldProps) {
        derive_state(Some(&self.props), Some(&self.state), &next).apply(&mut self.state);
        self.props = next;
    }

    /// Handle an edit: validate, store the error, notify the parent, then
    /// commit the tooltip.
    pub fn change(
        &mut self,
        value: impl Into<String>,
        translate: &dyn Translate,
        on_change: impl FnOnce(String),
    ) {
        let value = value.into();
        self.state.error = self.validate(&value, translate);
        on_change(value);
        self.commit();
    }

    /// Run the active validators and join their messages, skipping a message
    /// that is already present.
    #[must_use]
    pub fn validate(&self, value: &str, translate: &dyn Translate) -> String {
        let mut messages: Vec<String> = Vec::new();
        for validator in self.state.validators.iter() {
            if let Some(key) = validator.validate(value) {
                let message = translate.translate(key);
                if !messages.contains(&message) {
                    messages.push(message);
                }
            }
        }
        messages.join("\n")
    }

    fn commit(&mut self) {
        let visible = !self.state.error.is_empty();
        if visible == self.tooltip_visible {
            return;
        }

        if visible {
            self.tooltip.show(&self.state.error);
        } else {
            self.tooltip.hide();
        }
        self.tooltip_visible = visible;
    }

    #[must_use]
    pub fn props(&self) -> &FieldProps {
        &self.props
    }

    #[must_use]
    pub fn state(&self) -> &FieldState {
        &self.state
    }

    #[must_use]
    pub fn error(&self) -> &str {
        &self.state.error
    }

    #[must_use]
    pub fn tooltip(&self) -> &T {
        &self.tooltip
    }

    #[must_use]
    pub fn view(&self) -> InputView {
        InputView {
            class_name: self.state.class_name.clone(),
            input_type: self.state.input_type.as_str(),
            label: self.props.label.clone(),
            value: self.props.value.clone(),
            tooltip: (!self.state.error.is_empty()).then(|| self.state.error.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::i18n::{Catalog, KeysOnly, MessageKey};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<String>>>);

    impl Recorder {
        fn push(&self, entry: impl Into<String>) {
            self.0.borrow_mut().push(entry.into());
        }

        fn entries(&self) -> Vec<String> {
            self.0.borrow().clone()
        }
    }

    impl Tooltip for Recorder {
        fn show(&mut self, message: &str) {
            self.push(format!("show:{message}"));
        }

        fn hide(&mut self) {
            self.push("hide");
        }
    }

    #[test]
    fn email_type_renders_as_text_but_validates_email() {
        let field = Field::new(FieldProps::new("Email", "").with_type(FieldType::Email));
        assert_eq!(field.state().input_type, FieldType::Text);
        assert_eq!(&*field.state().validators, &[Validator::Email]);
        assert_eq!(field.view().input_type, "text");
    }

    #[test]
    fn unset_type_defaults_to_text() {
        let field = Field::new(FieldProps::new("Login", ""));
        assert_eq!(field.state().input_type, FieldType::Text);
        assert!(field.state().validators.is_empty());

        let password = Field::new(FieldProps::new("Password", "").with_type(FieldType::Password));
        assert_eq!(password.view().input_type, "password");
    }

    #[test]
    fn required_runs_before_email() {
        let props = FieldProps::new("Email", "")
            .required(true)
            .with_type(FieldType::Email);
        assert_eq!(
            active_validators(&props),
            vec![Validator::Require, Validator::Email]
        );
    }

    #[test]
    fn class_name_is_appended_verbatim() {
        assert_eq!(compose_class_name(None), "field");
        assert_eq!(compose_class_name(Some("")), "field");
        assert_eq!(compose_class_name(Some("wide")), "field wide");
        assert_eq!(
            compose_class_name(Some("wide  dark")),
            "field wide  dark"
        );
    }

    #[test]
    fn derive_keeps_validator_identity_when_members_are_unchanged() {
        let mut field = Field::new(FieldProps::new("Login", "").required(true));
        let before = Arc::clone(&field.state().validators);

        // value and label changes do not touch the rules
        field.set_props(FieldProps::new("Login!", "abc").required(true));
        assert!(Arc::ptr_eq(&before, &field.state().validators));

        // type changes, but the member set stays [Require]
        field.set_props(
            FieldProps::new("Login", "abc")
                .required(true)
                .with_type(FieldType::Password),
        );
        assert!(Arc::ptr_eq(&before, &field.state().validators));
        assert_eq!(field.state().input_type, FieldType::Password);

        field.set_props(
            FieldProps::new("Login", "abc")
                .required(true)
                .with_type(FieldType::Email),
        );
        assert!(!Arc::ptr_eq(&before, &field.state().validators));
        assert_eq!(
            &*field.state().validators,
            &[Validator::Require, Validator::Email]
        );
    }

    #[test]
    fn derive_is_idempotent() {
        let props = FieldProps::new("Email", "a")
            .required(true)
            .with_type(FieldType::Email)
            .with_class("wide");
        let mut state = FieldState::default();
        derive_state(None, None, &props).apply(&mut state);

        let patch = derive_state(Some(&props), Some(&state), &props);
        assert!(patch.is_empty());
    }

    #[test]
    fn derive_skips_rules_when_required_and_type_are_unchanged() {
        let prev = FieldProps::new("Login", "").required(true);
        let mut state = FieldState::default();
        derive_state(None, None, &prev).apply(&mut state);

        // a stale state is left alone as long as the rule props did not move
        state.validators = Arc::from(Vec::new());
        let next = FieldProps::new("Login", "x").required(true).with_class("dark");
        let patch = derive_state(Some(&prev), Some(&state), &next);
        assert!(patch.validators.is_none());
        assert!(patch.input_type.is_none());
        assert_eq!(patch.class_name.as_deref(), Some("field dark"));
    }

    #[test]
    fn empty_required_email_reports_only_the_required_message() {
        let mut field = Field::new(
            FieldProps::new("Email", "x")
                .required(true)
                .with_type(FieldType::Email),
        );
        field.change("", &KeysOnly, |_| {});
        assert_eq!(field.error(), MessageKey::RequiredError.as_str());

        // both validators run, the email check repeats the required key
        struct Keys(RefCell<Vec<MessageKey>>);
        impl Translate for Keys {
            fn translate(&self, key: MessageKey) -> String {
                self.0.borrow_mut().push(key);
                key.as_str().to_string()
            }
        }
        let keys = Keys(RefCell::new(Vec::new()));
        assert_eq!(&*field.state().validators, &[Validator::Require, Validator::Email]);
        assert_eq!(field.validate("", &keys), MessageKey::RequiredError.as_str());
        assert_eq!(
            keys.0.into_inner(),
            vec![MessageKey::RequiredError, MessageKey::RequiredError]
        );
        assert_eq!(Validator::Email.validate(""), Some(MessageKey::RequiredError));
    }

    #[test]
    fn messages_are_joined_with_newlines() {
        let mut field = Field::new(FieldProps::new("Email", "").with_type(FieldType::Email));
        field.change("nope", &Catalog::new(), |_| {});
        assert_eq!(field.error(), "Please enter a valid email address");

        field.change("ok@example.com", &Catalog::new(), |_| {});
        assert_eq!(field.error(), "");
    }

    #[test]
    fn change_validates_then_notifies_then_shows_tooltip() {
        let log = Recorder::default();
        let mut field = Field::mount(FieldProps::new("Login", "a").required(true), log.clone());

        let seen = log.clone();
        field.change("  ", &KeysOnly, move |value| {
            seen.push(format!("change:{value:?}"));
        });

        assert_eq!(
            log.entries(),
            vec![
                "change:\"  \"".to_string(),
                "show:COMMON.REQUIRED_ERROR".to_string(),
            ]
        );
    }

    #[test]
    fn tooltip_toggles_only_on_transitions() {
        let log = Recorder::default();
        let mut field = Field::mount(
            FieldProps::new("Email", "").with_type(FieldType::Email),
            log.clone(),
        );

        field.change("a", &KeysOnly, |_| {});
        field.change("ab", &KeysOnly, |_| {});
        field.change("ab@cd.ef", &KeysOnly, |_| {});
        field.change("ab@cd.eg", &KeysOnly, |_| {});
        field.change("", &KeysOnly, |_| {});

        assert_eq!(
            log.entries(),
            vec![
                "show:COMMON.EMAIL_ERROR".to_string(),
                "hide".to_string(),
                "show:COMMON.REQUIRED_ERROR".to_string(),
            ]
        );
    }

    #[test]
    fn view_carries_error_as_tooltip_payload() {
        let mut field = Field::new(FieldProps::new("Login", "").required(true).with_class("a b"));
        assert_eq!(field.view().tooltip, None);

        field.change("", &KeysOnly, |_| {});
        let view = field.view();
        assert_eq!(view.class_name, "field a b");
        assert_eq!(view.tooltip.as_deref(), Some("COMMON.REQUIRED_ERROR"));
        assert!(field.tooltip().visible);
    }
}
