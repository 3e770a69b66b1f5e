use serde_json::Value;

use super::FieldDef;
use crate::messages::ErrorKind;

/// A single checkbox.
///
/// A required checkbox must actually be checked; browsers omit unchecked
/// checkboxes from the post entirely, so a missing key reads as `false`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BoolField;

impl BoolField {
    pub fn new() -> Self {
        Self
    }

    pub(crate) fn clean(
        &self,
        raw: Option<&str>,
        def: &FieldDef,
    ) -> Result<Value, Vec<String>> {
        let value = match raw {
            None => false,
            Some(s) => {
                let s = s.trim();
                !(s.is_empty() || s.eq_ignore_ascii_case("false") || s == "0")
            }
        };
        if def.required && !value {
            return Err(vec![def
                .messages
                .for_kind(ErrorKind::Required, || "This field is required.".into())]);
        }
        Ok(Value::Bool(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{FieldKind, WidgetKind};
    use crate::messages::Messages;

    fn def(required: bool) -> FieldDef {
        FieldDef {
            name: "agree".into(),
            label: "Agree".into(),
            help_text: String::new(),
            placeholder: String::new(),
            initial: None,
            required,
            disabled: false,
            css_classes: Vec::new(),
            input_css_classes: Vec::new(),
            messages: Messages::default(),
            widget: WidgetKind::CheckboxInput,
            kind: FieldKind::Boolean(BoolField),
        }
    }

    #[test]
    fn truthy_and_falsy_forms() {
        let field = BoolField::new();
        assert_eq!(field.clean(Some("on"), &def(false)).unwrap(), Value::Bool(true));
        assert_eq!(field.clean(Some("true"), &def(false)).unwrap(), Value::Bool(true));
        assert_eq!(field.clean(Some("1"), &def(false)).unwrap(), Value::Bool(true));
        assert_eq!(field.clean(Some("false"), &def(false)).unwrap(), Value::Bool(false));
        assert_eq!(field.clean(Some("False"), &def(false)).unwrap(), Value::Bool(false));
        assert_eq!(field.clean(Some("0"), &def(false)).unwrap(), Value::Bool(false));
        assert_eq!(field.clean(None, &def(false)).unwrap(), Value::Bool(false));
    }

    #[test]
    fn required_checkbox_must_be_checked() {
        let field = BoolField::new();
        assert!(field.clean(Some("on"), &def(true)).is_ok());
        let errors = field.clean(None, &def(true)).unwrap_err();
        assert_eq!(errors, vec!["This field is required."]);
    }
}
