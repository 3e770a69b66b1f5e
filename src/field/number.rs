use educe::Educe;
use serde_json::Value;

use super::FieldDef;
use crate::messages::ErrorKind;

/// Whole-number field with optional inclusive bounds.
///
/// Exclusive schema bounds are folded into these at resolution time, so by
/// the time a value is validated the bounds are always inclusive.
#[derive(Educe, Clone, Copy, Debug)]
#[educe(PartialEq, Default)]
pub struct NumberField {
    #[educe(Default(expression = i64::MIN))]
    pub min_value: i64,
    #[educe(Default(expression = i64::MAX))]
    pub max_value: i64,
}

impl NumberField {
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
            return Ok(Value::Null);
        }

        let number: i64 = match value.parse() {
            Ok(n) => n,
            Err(_) => {
                return Err(vec![def
                    .messages
                    .for_kind(ErrorKind::Invalid, || "Enter a whole number.".into())])
            }
        };

        let mut errors = Vec::new();
        if number > self.max_value {
            errors.push(def.messages.for_kind(ErrorKind::MaxValue, || {
                format!(
                    "Ensure this value is less than or equal to {}.",
                    self.max_value
                )
            }));
        }
        if number < self.min_value {
            errors.push(def.messages.for_kind(ErrorKind::MinValue, || {
                format!(
                    "Ensure this value is greater than or equal to {}.",
                    self.min_value
                )
            }));
        }

        if errors.is_empty() {
            Ok(Value::Number(number.into()))
        } else {
            Err(errors)
        }
    }
}
