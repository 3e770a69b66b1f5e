use serde_json::Value;

use super::FieldDef;
use crate::messages::ErrorKind;
use crate::spec::text_of;

/// One (raw value, display label) pair of a choice field.
#[derive(Clone, Debug, PartialEq)]
pub struct Choice {
    pub value: Value,
    pub label: String,
}

/// Single-select field: `select` and the radio form types.
///
/// Submitted values are compared against the text form of each raw choice
/// value. When `coerce_int` is set (integer-typed schemas), the accepted
/// value is converted back to an integer before it lands in cleaned data.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChoiceField {
    pub choices: Vec<Choice>,
    pub coerce_int: bool,
}

impl ChoiceField {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn clean(
        &self,
        raw: Option<&str>,
        def: &FieldDef,
    ) -> Result<Value, Vec<String>> {
        let value = raw.unwrap_or("");
        if value.is_empty() {
            if def.required {
                return Err(vec![def
                    .messages
                    .for_kind(ErrorKind::Required, || "This field is required.".into())]);
            }
            return Ok(Value::String(String::new()));
        }
        if !self.choices.iter().any(|c| text_of(&c.value) == value) {
            return Err(vec![invalid_choice(def, value)]);
        }
        coerce(value, self.coerce_int, def)
    }
}

/// Multi-select field: the `checkboxes` form type.
///
/// Arrives as repeated keys in the post data; cleans to a list, empty when
/// the optional field was left untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MultiChoiceField {
    pub choices: Vec<Choice>,
    pub coerce_int: bool,
}

impl MultiChoiceField {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn clean(
        &self,
        raw: Option<Vec<String>>,
        def: &FieldDef,
    ) -> Result<Value, Vec<String>> {
        let values: Vec<String> = raw
            .unwrap_or_default()
            .into_iter()
            .filter(|v| !v.is_empty())
            .collect();
        if values.is_empty() {
            if def.required {
                return Err(vec![def
                    .messages
                    .for_kind(ErrorKind::Required, || "This field is required.".into())]);
            }
            return Ok(Value::Array(Vec::new()));
        }
        let mut cleaned = Vec::with_capacity(values.len());
        for value in &values {
            if !self.choices.iter().any(|c| text_of(&c.value) == *value) {
                return Err(vec![invalid_choice(def, value)]);
            }
            cleaned.push(coerce(value, self.coerce_int, def)?);
        }
        Ok(Value::Array(cleaned))
    }
}

fn invalid_choice(def: &FieldDef, value: &str) -> String {
    def.messages.for_kind(ErrorKind::InvalidChoice, || {
        format!(
            "Select a valid choice. {} is not one of the available choices.",
            value
        )
    })
}

fn coerce(value: &str, coerce_int: bool, def: &FieldDef) -> Result<Value, Vec<String>> {
    if coerce_int {
        match value.parse::<i64>() {
            Ok(n) => Ok(Value::Number(n.into())),
            Err(_) => Err(vec![invalid_choice(def, value)]),
        }
    } else {
        Ok(Value::String(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{FieldKind, WidgetKind};
    use crate::messages::Messages;
    use serde_json::json;

    fn choices(values: &[Value]) -> Vec<Choice> {
        values
            .iter()
            .map(|v| Choice {
                value: v.clone(),
                label: text_of(v),
            })
            .collect()
    }

    fn def(kind: FieldKind, required: bool) -> FieldDef {
        FieldDef {
            name: "rating".into(),
            label: "Rating".into(),
            help_text: String::new(),
            placeholder: String::new(),
            initial: None,
            required,
            disabled: false,
            css_classes: Vec::new(),
            input_css_classes: Vec::new(),
            messages: Messages::default(),
            widget: WidgetKind::Select,
            kind,
        }
    }

    #[test]
    fn accepts_member_values() {
        let field = ChoiceField {
            choices: choices(&[json!("a"), json!("b")]),
            coerce_int: false,
        };
        let d = def(FieldKind::Choice(field.clone()), true);
        assert_eq!(field.clean(Some("a"), &d).unwrap(), json!("a"));
    }

    #[test]
    fn rejects_non_members() {
        let field = ChoiceField {
            choices: choices(&[json!("a"), json!("b")]),
            coerce_int: false,
        };
        let d = def(FieldKind::Choice(field.clone()), true);
        let errors = field.clean(Some("c"), &d).unwrap_err();
        assert_eq!(
            errors,
            vec!["Select a valid choice. c is not one of the available choices."]
        );
    }

    #[test]
    fn integer_choices_compare_and_coerce() {
        let field = ChoiceField {
            choices: choices(&[json!(1), json!(2), json!(3)]),
            coerce_int: true,
        };
        let d = def(FieldKind::Choice(field.clone()), true);
        assert_eq!(field.clean(Some("2"), &d).unwrap(), json!(2));
        assert!(field.clean(Some("4"), &d).is_err());
    }

    #[test]
    fn optional_empty_single_choice() {
        let field = ChoiceField {
            choices: choices(&[json!("a")]),
            coerce_int: false,
        };
        let d = def(FieldKind::Choice(field.clone()), false);
        assert_eq!(field.clean(None, &d).unwrap(), json!(""));
    }

    #[test]
    fn multi_choice_cleans_to_list() {
        let field = MultiChoiceField {
            choices: choices(&[json!(1), json!(2), json!(3)]),
            coerce_int: true,
        };
        let d = def(FieldKind::MultiChoice(field.clone()), false);
        let cleaned = field
            .clean(Some(vec!["1".into(), "3".into()]), &d)
            .unwrap();
        assert_eq!(cleaned, json!([1, 3]));
        assert_eq!(field.clean(None, &d).unwrap(), json!([]));
    }

    #[test]
    fn multi_choice_rejects_any_bad_value() {
        let field = MultiChoiceField {
            choices: choices(&[json!("a"), json!("b")]),
            coerce_int: false,
        };
        let d = def(FieldKind::MultiChoice(field.clone()), false);
        let errors = field
            .clean(Some(vec!["a".into(), "x".into()]), &d)
            .unwrap_err();
        assert_eq!(
            errors,
            vec!["Select a valid choice. x is not one of the available choices."]
        );
    }
}
