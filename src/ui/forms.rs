//! Login and registration forms. They only arrange fields and pass edits up;
//! every rule lives in the fields themselves.

use super::field::{Field, FieldProps, FieldType, InputView};
use super::i18n::{MessageKey, Translate};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FormField {
    Login,
    Password,
    Email,
}

impl FormField {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Password => "password",
            Self::Email => "email",
        }
    }

    #[must_use]
    pub const fn label(self) -> MessageKey {
        match self {
            Self::Login => MessageKey::LoginLabel,
            Self::Password => MessageKey::PasswordLabel,
            Self::Email => MessageKey::EmailLabel,
        }
    }

    const fn field_type(self) -> FieldType {
        match self {
            Self::Login => FieldType::Text,
            Self::Password => FieldType::Password,
            Self::Email => FieldType::Email,
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Draft values owned by whoever hosts the form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Credentials {
    pub login: String,
    pub password: String,
    pub email: String,
}

impl Credentials {
    #[must_use]
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Login => &self.login,
            FormField::Password => &self.password,
            FormField::Email => &self.email,
        }
    }

    pub fn set(&mut self, field: FormField, value: String) {
        match field {
            FormField::Login => self.login = value,
            FormField::Password => self.password = value,
            FormField::Email => self.email = value,
        }
    }
}

fn field_props(field: FormField, values: &Credentials, translate: &dyn Translate) -> FieldProps {
    FieldProps::new(translate.translate(field.label()), values.get(field))
        .required(true)
        .with_type(field.field_type())
        .with_class(field.as_str())
}

/// Shared behaviour of the two forms.
pub trait Form {
    /// Fields in display order.
    const FIELDS: &'static [FormField];

    fn field(&self, field: FormField) -> Option<&Field>;

    fn field_mut(&mut self, field: FormField) -> Option<&mut Field>;

    /// Push the parent's current values down as props.
    fn render(&mut self, values: &Credentials, translate: &dyn Translate) {
        for &name in Self::FIELDS {
            if let Some(field) = self.field_mut(name) {
                field.set_props(field_props(name, values, translate));
            }
        }
    }

    /// Route an edit to the matching field, which validates it and then
    /// calls `on_change`. Edits for fields the form does not show are dropped.
    fn change(
        &mut self,
        name: FormField,
        value: String,
        translate: &dyn Translate,
        on_change: impl FnOnce(FormField, String),
    ) {
        if let Some(field) = self.field_mut(name) {
            field.change(value, translate, |value| on_change(name, value));
        }
    }

    fn view(&self) -> Vec<InputView> {
        Self::FIELDS
            .iter()
            .filter_map(|&name| self.field(name).map(Field::view))
            .collect()
    }

    /// Error text per field, for fields that currently have one.
    fn errors(&self) -> Vec<(FormField, String)> {
        Self::FIELDS
            .iter()
            .filter_map(|&name| {
                let field = self.field(name)?;
                (!field.error().is_empty()).then(|| (name, field.error().to_string()))
            })
            .collect()
    }
}

#[derive(Debug)]
pub struct LoginForm {
    login: Field,
    password: Field,
}

impl LoginForm {
    #[must_use]
    pub fn new(values: &Credentials, translate: &dyn Translate) -> Self {
        Self {
            login: Field::new(field_props(FormField::Login, values, translate)),
            password: Field::new(field_props(FormField::Password, values, translate)),
        }
    }
}

impl Form for LoginForm {
    const FIELDS: &'static [FormField] = &[FormField::Login, FormField::Password];

    fn field(&self, field: FormField) -> Option<&Field> {
        match field {
            FormField::Login => Some(&self.login),
            FormField::Password => Some(&self.password),
            FormField::Email => None,
        }
    }

    fn field_mut(&mut self, field: FormField) -> Option<&mut Field> {
        match field {
            FormField::Login => Some(&mut self.login),
            FormField::Password => Some(&mut self.password),
            FormField::Email => None,
        }
    }
}

#[derive(Debug)]
pub struct RegistrationForm {
    login: Field,
    password: Field,
    email: Field,
}

impl RegistrationForm {
    #[must_use]
    pub fn new(values: &Credentials, translate: &dyn Translate) -> Self {
        Self {
            login: Field::new(field_props(FormField::Login, values, translate)),
            password: Field::new(field_props(FormField::Password, values, translate)),
            email: Field::new(field_props(FormField::Email, values, translate)),
        }
    }
}

impl Form for RegistrationForm {
    const FIELDS: &'static [FormField] =
        &[FormField::Login, FormField::Password, FormField::Email];

    fn field(&self, field: FormField) -> Option<&Field> {
        match field {
            FormField::Login => Some(&self.login),
            FormField::Password => Some(&self.password),
            FormField::Email => Some(&self.email),
        }
    }

    fn field_mut(&mut self, field: FormField) -> Option<&mut Field> {
        match field {
            FormField::Login => Some(&mut self.login),
            FormField::Password => Some(&mut self.password),
            FormField::Email => Some(&mut self.email),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::i18n::{Catalog, KeysOnly};
    use crate::validation::Validator;

    #[test]
    fn login_form_shows_two_required_fields() {
        let form = LoginForm::new(&Credentials::default(), &Catalog::new());
        let view = form.view();
        assert_eq!(view.len(), 2);
        assert_eq!(view[0].label, "Login");
        assert_eq!(view[0].input_type, "text");
        assert_eq!(view[1].label, "Password");
        assert_eq!(view[1].input_type, "password");
        for name in LoginForm::FIELDS {
            let field = form.field(*name).map(|f| f.state().validators.to_vec());
            assert_eq!(field, Some(vec![Validator::Require]));
        }
    }

    #[test]
    fn registration_email_field_validates_email() {
        let form = RegistrationForm::new(&Credentials::default(), &Catalog::new());
        let view = form.view();
        assert_eq!(view.len(), 3);
        assert_eq!(view[2].input_type, "text");
        assert_eq!(view[2].class_name, "field email");
        let email = form.field(FormField::Email).map(|f| f.state().validators.to_vec());
        assert_eq!(email, Some(vec![Validator::Require, Validator::Email]));
    }

    #[test]
    fn change_is_forwarded_with_the_field_name() {
        let mut form = RegistrationForm::new(&Credentials::default(), &KeysOnly);
        let mut received = None;
        form.change(FormField::Email, "bad".to_string(), &KeysOnly, |name, value| {
            received = Some((name, value));
        });
        assert_eq!(received, Some((FormField::Email, "bad".to_string())));
        assert_eq!(
            form.errors(),
            vec![(FormField::Email, "COMMON.EMAIL_ERROR".to_string())]
        );
    }

    #[test]
    fn login_form_ignores_email_edits() {
        let mut form = LoginForm::new(&Credentials::default(), &KeysOnly);
        let mut called = false;
        form.change(FormField::Email, "a@b.cd".to_string(), &KeysOnly, |_, _| {
            called = true;
        });
        assert!(!called);
    }

    #[test]
    fn render_pushes_values_down() {
        let mut form = LoginForm::new(&Credentials::default(), &KeysOnly);
        let mut values = Credentials::default();
        values.set(FormField::Login, "alice".to_string());
        form.render(&values, &KeysOnly);
        assert_eq!(form.view()[0].value, "alice");
        assert_eq!(values.get(FormField::Login), "alice");
    }
}
