use serde_json::Value;

use super::FieldDef;

/// Static help text shown between real fields: the `static`/`help` form
/// type. Carries no value, so cleaning always yields null and the entry is
/// dropped from cleaned data.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LabelField;

impl LabelField {
    pub fn new() -> Self {
        Self
    }

    pub(crate) fn clean(&self, _def: &FieldDef) -> Result<Value, Vec<String>> {
        Ok(Value::Null)
    }
}
