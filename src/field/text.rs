use educe::Educe;
use regex::Regex;

use serde_json::Value;

use super::FieldDef;
use crate::messages::ErrorKind;

/// Free-text field: `text`, `textarea` and `password` form types.
///
/// Length bounds count characters, not bytes. The pattern, when present,
/// must match somewhere in the submitted value.
#[derive(Educe, Clone, Debug)]
#[educe(PartialEq, Default)]
pub struct TextField {
    #[educe(Default(expression = usize::MAX))]
    pub max_length: usize,
    pub min_length: usize,
    #[educe(PartialEq(ignore))]
    pub pattern: Option<Regex>,
}

impl TextField {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn clean(
        &self,
        raw: Option<&str>,
        def: &FieldDef,
    ) -> Result<Value, Vec<String>> {
        let value = raw.unwrap_or("").trim();
        if value.is_empty() {
            if def.required {
                return Err(vec![def
                    .messages
                    .for_kind(ErrorKind::Required, || "This field is required.".into())]);
            }
            // an empty optional answer is still an answer, unlike a null
            return Ok(Value::String(String::new()));
        }

        let mut errors = Vec::new();
        let len = bytecount::num_chars(value.as_bytes());
        if len > self.max_length {
            errors.push(def.messages.for_kind(ErrorKind::MaxLength, || {
                format!(
                    "Ensure this value has at most {} characters (it has {}).",
                    self.max_length, len
                )
            }));
        }
        if len < self.min_length {
            errors.push(def.messages.for_kind(ErrorKind::MinLength, || {
                format!(
                    "Ensure this value has at least {} characters (it has {}).",
                    self.min_length, len
                )
            }));
        }
        if let Some(pattern) = &self.pattern {
            if !pattern.is_match(value) {
                errors.push(def.messages.for_kind(ErrorKind::Pattern, || {
                    format!("Field doesn't match regex pattern '{}'.", pattern.as_str())
                }));
            }
        }

        if errors.is_empty() {
            Ok(Value::String(value.to_string()))
        } else {
            Err(errors)
        }
    }
}
