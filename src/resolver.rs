//! Resolution of one field declaration into a concrete field.
//!
//! This is where a declaration's `type` string, choice data and options
//! turn into a [`FieldDef`]: first the data type is mapped to a form type
//! (several mappings are inference rules that look at the choice data),
//! then the form type picks the field kind and widget, and finally the
//! declaration's options are copied over, validated and localized.

use regex::Regex;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::field::{
    BoolField, Choice, ChoiceField, FieldDef, FieldKind, LabelField, MultiChoiceField,
    NumberField, TextField, WidgetKind,
};
use crate::i18n::LocalizationTable;
use crate::messages::Messages;
use crate::spec::{text_of, FieldSpec};

/// Choice-bearing specs with fewer than this many choices render as radio
/// variants instead of a dropdown. Fixed policy, not configurable.
const CHOICE_FEW_LIMIT: usize = 6;
/// Radio choices render inline when every choice's text is shorter than
/// this many characters. Fixed policy, not configurable.
const CHOICE_SHORT_LIMIT: usize = 6;

/// Css classes stripped from schema-supplied class lists; these belong to
/// the surrounding renderer, not to individual fields.
const IGNORED_CSS_CLASSES: [&str; 1] = ["form-group"];

pub(crate) struct ResolveContext<'a> {
    pub i18n: Option<&'a LocalizationTable>,
    pub language: &'a str,
}

impl ResolveContext<'_> {
    fn localize(&self, value: &str) -> String {
        match self.i18n {
            Some(table) => table.resolve(value, self.language).to_string(),
            None => value.to_string(),
        }
    }
}

/// Form-level type tokens, after data-type inference.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FormType {
    Text,
    Textarea,
    Number,
    Password,
    Checkbox,
    Checkboxes,
    Select,
    Radios,
    RadiosInline,
    RadioButtons,
    Help,
}

impl FormType {
    fn widget(self) -> WidgetKind {
        match self {
            FormType::Text => WidgetKind::TextInput,
            FormType::Textarea => WidgetKind::Textarea,
            FormType::Number => WidgetKind::NumberInput,
            FormType::Password => WidgetKind::PasswordInput,
            FormType::Checkbox => WidgetKind::CheckboxInput,
            FormType::Checkboxes => WidgetKind::CheckboxSelectMultiple,
            FormType::Select => WidgetKind::Select,
            FormType::Radios | FormType::RadioButtons => WidgetKind::RadioSelect,
            FormType::RadiosInline => WidgetKind::RadioSelectInline,
            FormType::Help => WidgetKind::LabelText,
        }
    }

    /// Single-select types default to required when the declaration is
    /// silent, same as fields that carry an initial value.
    fn is_single_choice(self) -> bool {
        matches!(
            self,
            FormType::Select | FormType::Radios | FormType::RadiosInline | FormType::RadioButtons
        )
    }

    fn is_choice(self) -> bool {
        self.is_single_choice() || self == FormType::Checkboxes
    }
}

/// Resolve a leaf declaration into a compiled field. `object` declarations
/// never reach this; the compiler flattens them first.
pub(crate) fn resolve(
    index: usize,
    name: &str,
    spec: &FieldSpec,
    ctx: &ResolveContext,
) -> Result<FieldDef> {
    let declared = spec.declared_type();
    let form_type = form_type_for(index, name, declared, spec)?;

    // direct options
    let label = match &spec.title {
        Some(title) => ctx.localize(title),
        None => pretty_name(name),
    };
    let help_text = spec
        .description
        .as_deref()
        .map(|s| ctx.localize(s))
        .unwrap_or_default();
    let placeholder = spec
        .placeholder
        .as_deref()
        .map(|s| ctx.localize(s))
        .unwrap_or_default();
    let initial = spec.initial().cloned();
    let css_classes = spec
        .html_class
        .as_deref()
        .map(cleaned_css_classes)
        .unwrap_or_default();
    let input_css_classes = spec
        .field_html_class
        .as_deref()
        .map(cleaned_css_classes)
        .unwrap_or_default();

    let choices = resolve_choices(spec, ctx);

    // numeric bounds, with exclusive bounds folded to inclusive ones
    let mut min_value = spec.minimum;
    let mut max_value = spec.maximum;
    if spec.exclusive_minimum {
        min_value = min_value.map(|m| m + 1);
    }
    if spec.exclusive_maximum {
        max_value = max_value.map(|m| m - 1);
    }

    let pattern = match &spec.pattern {
        Some(p) => Some(Regex::new(p).map_err(|e| Error::InvalidFieldSpec {
            index,
            name: name.to_string(),
            reason: format!("cannot compile pattern '{}': {}", p, e),
        })?),
        None => None,
    };

    let messages = match &spec.validation_message {
        Some(ms) => Messages::build(ms, |s| ctx.localize(s)),
        None => Messages::default(),
    };

    // disabled and readonly fields can't be required, and a readonly field
    // can't have its value changed by submitted data
    let mut required = spec.required;
    let mut disabled = spec.disabled.unwrap_or(false);
    if disabled || spec.readonly.unwrap_or(false) {
        required = Some(false);
        if spec.readonly.unwrap_or(false) {
            disabled = true;
        }
    }
    let required = match form_type {
        // help text never requires an answer, whatever the declaration says
        FormType::Help => false,
        _ => required.unwrap_or(initial.is_some() || form_type.is_single_choice()),
    };

    let coerce_int = matches!(declared, "integer" | "int") && form_type.is_choice();
    if coerce_int {
        for choice in &choices {
            if choice.value.as_i64().is_none() {
                return Err(Error::InconsistentChoiceType {
                    name: name.to_string(),
                    value: choice.value.clone(),
                });
            }
        }
    }

    let kind = match form_type {
        FormType::Text | FormType::Textarea | FormType::Password => FieldKind::Text(TextField {
            max_length: spec.max_length.unwrap_or(usize::MAX),
            min_length: spec.min_length.unwrap_or(0),
            pattern,
        }),
        FormType::Number => FieldKind::Number(NumberField {
            min_value: min_value.unwrap_or(i64::MIN),
            max_value: max_value.unwrap_or(i64::MAX),
        }),
        FormType::Checkbox => FieldKind::Boolean(BoolField),
        FormType::Help => FieldKind::Label(LabelField),
        FormType::Checkboxes => FieldKind::MultiChoice(MultiChoiceField {
            choices,
            coerce_int,
        }),
        FormType::Select | FormType::Radios | FormType::RadiosInline | FormType::RadioButtons => {
            FieldKind::Choice(ChoiceField {
                choices,
                coerce_int,
            })
        }
    };

    Ok(FieldDef {
        name: name.to_string(),
        label,
        help_text,
        placeholder,
        initial,
        required,
        disabled,
        css_classes,
        input_css_classes,
        messages,
        widget: form_type.widget(),
        kind,
    })
}

/// Map a declared data type to a form type. `string`, `integer` and
/// `checkbox` are inference rules: with choice data present they turn into
/// a select, radio group or inline radio group depending on how many
/// choices there are and how long their texts run.
fn form_type_for(
    index: usize,
    name: &str,
    declared: &str,
    spec: &FieldSpec,
) -> Result<FormType> {
    let token = match declared {
        "string" => auto_choice_token(spec, "text", "select", Some("radios"), Some("radios-inline")),
        "integer" | "int" => {
            auto_choice_token(spec, "number", "select", Some("radios"), Some("radios-inline"))
        }
        "boolean" => "checkbox",
        "static" => "help",
        "radio" => "radios",
        "dropdown" => "select",
        "checkbox" => auto_choice_token(spec, "checkbox", "checkboxes", None, None),
        other => other,
    };
    match token {
        "text" => Ok(FormType::Text),
        "textarea" => Ok(FormType::Textarea),
        "number" => Ok(FormType::Number),
        "password" => Ok(FormType::Password),
        "checkbox" => Ok(FormType::Checkbox),
        "checkboxes" => Ok(FormType::Checkboxes),
        "select" => Ok(FormType::Select),
        "radios" => Ok(FormType::Radios),
        "radios-inline" => Ok(FormType::RadiosInline),
        "radiobuttons" => Ok(FormType::RadioButtons),
        "help" => Ok(FormType::Help),
        // presentational container types (fieldset, section, tab, array,
        // submit, ...) land here too: there is no field to build for them
        _ => Err(Error::InvalidFieldSpec {
            index,
            name: name.to_string(),
            reason: format!("invalid field with type '{}'", declared),
        }),
    }
}

fn auto_choice_token(
    spec: &FieldSpec,
    default: &'static str,
    many: &'static str,
    few: Option<&'static str>,
    short: Option<&'static str>,
) -> &'static str {
    if !spec.has_choices() {
        return default;
    }
    let texts: Vec<String> = match (&spec.enum_values, &spec.title_map) {
        (Some(values), _) => values.iter().map(text_of).collect(),
        (None, Some(map)) => map.labels(),
        (None, None) => Vec::new(),
    };
    if let Some(few) = few {
        if texts.len() < CHOICE_FEW_LIMIT {
            if let Some(short) = short {
                if texts
                    .iter()
                    .all(|t| bytecount::num_chars(t.as_bytes()) < CHOICE_SHORT_LIMIT)
                {
                    return short;
                }
            }
            return few;
        }
    }
    many
}

/// The (raw value, label) list: raw values from `enum`, else from the
/// `titleMap`; labels from the `titleMap` where it has one, else the text
/// form of the raw value. Labels are localized.
fn resolve_choices(spec: &FieldSpec, ctx: &ResolveContext) -> Vec<Choice> {
    let raw_values: Vec<Value> = match (&spec.enum_values, &spec.title_map) {
        (Some(values), _) => values.clone(),
        (None, Some(map)) => map.values(),
        (None, None) => Vec::new(),
    };
    raw_values
        .into_iter()
        .map(|value| {
            let label = spec
                .title_map
                .as_ref()
                .and_then(|map| map.label_for(&value))
                .unwrap_or_else(|| text_of(&value));
            Choice {
                label: ctx.localize(&label),
                value,
            }
        })
        .collect()
}

/// Split a schema-supplied class string, drop ignored classes, and keep
/// the first occurrence of each remaining class.
fn cleaned_css_classes(classes: &str) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for class in classes.split_whitespace() {
        if IGNORED_CSS_CLASSES.contains(&class) {
            continue;
        }
        if !seen.iter().any(|s| s == class) {
            seen.push(class.to_string());
        }
    }
    seen
}

/// Human-readable label derived from a field name, for declarations
/// without a title.
fn pretty_name(name: &str) -> String {
    let mut out = name.replace('_', " ");
    if let Some(first) = out.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    out
}
