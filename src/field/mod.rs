//! Concrete field descriptors, one module per kind.
//!
//! These are the compiled counterparts of schema field declarations. Each
//! kind struct holds the validation rules resolved for one field, and the
//! [`FieldKind`] enum ties them together for dispatch, mirroring how the
//! engine treats a field uniformly regardless of its kind:
//!
//! - [`TextField`] - free text (text, textarea, password).
//! - [`NumberField`] - whole numbers with optional bounds.
//! - [`BoolField`] - a single checkbox.
//! - [`ChoiceField`] - one value out of a fixed set (select, radio variants).
//! - [`MultiChoiceField`] - any subset of a fixed set (checkbox list).
//! - [`LabelField`] - static help text that never carries a value.

mod boolean;
mod choice;
mod label;
mod number;
mod text;

pub use self::boolean::*;
pub use self::choice::*;
pub use self::label::*;
pub use self::number::*;
pub use self::text::*;

use serde_json::Value;

use crate::form::FormData;
use crate::messages::Messages;
use crate::spec::text_of;

/// How a field is presented. The engine renders nothing itself; the widget
/// kind is metadata for whatever does.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WidgetKind {
    TextInput,
    Textarea,
    PasswordInput,
    NumberInput,
    CheckboxInput,
    CheckboxSelectMultiple,
    Select,
    RadioSelect,
    RadioSelectInline,
    LabelText,
}

/// A compiled field of some concrete kind.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldKind {
    Text(TextField),
    Number(NumberField),
    Boolean(BoolField),
    Choice(ChoiceField),
    MultiChoice(MultiChoiceField),
    Label(LabelField),
}

impl FieldKind {
    /// Whether this is a free-text kind. Free-text answers are what the
    /// review-workflow metadata is computed over.
    pub fn is_text(&self) -> bool {
        matches!(self, FieldKind::Text(_))
    }
}

/// One entry in a compiled form: common presentation options plus the
/// kind-specific validation rules.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldDef {
    pub name: String,
    pub label: String,
    pub help_text: String,
    pub placeholder: String,
    pub initial: Option<Value>,
    pub required: bool,
    pub disabled: bool,
    /// Cleaned css classes from `htmlClass`, for the field row.
    pub css_classes: Vec<String>,
    /// Cleaned css classes from `fieldHtmlClass`, for the input element.
    pub input_css_classes: Vec<String>,
    pub messages: Messages,
    pub widget: WidgetKind,
    pub kind: FieldKind,
}

impl FieldDef {
    pub fn is_text(&self) -> bool {
        self.kind.is_text()
    }

    /// Validate and clean this field's value out of a submitted data bag.
    ///
    /// `Ok(Value::Null)` means the field produced no value at all (help
    /// fields, empty optional numbers); the form drops those entries from
    /// the cleaned data.
    pub(crate) fn clean(&self, data: &FormData) -> Result<Value, Vec<String>> {
        match &self.kind {
            FieldKind::Label(field) => field.clean(self),
            FieldKind::Text(field) => field.clean(self.raw_single(data).as_deref(), self),
            FieldKind::Number(field) => field.clean(self.raw_single(data).as_deref(), self),
            FieldKind::Boolean(field) => field.clean(self.raw_single(data).as_deref(), self),
            FieldKind::Choice(field) => field.clean(self.raw_single(data).as_deref(), self),
            FieldKind::MultiChoice(field) => field.clean(self.raw_multi(data), self),
        }
    }

    // Disabled fields can't be changed by submitted data; their value comes
    // from the initial value instead.
    fn raw_single(&self, data: &FormData) -> Option<String> {
        if self.disabled {
            self.initial.as_ref().map(|v| text_of(v))
        } else {
            data.get(&self.name).map(str::to_string)
        }
    }

    fn raw_multi(&self, data: &FormData) -> Option<Vec<String>> {
        if self.disabled {
            match &self.initial {
                Some(Value::Array(items)) => Some(items.iter().map(text_of).collect()),
                Some(other) => Some(vec![text_of(other)]),
                None => None,
            }
        } else {
            data.get_all(&self.name).map(|values| values.to_vec())
        }
    }
}
