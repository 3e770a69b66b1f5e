//! Typed view of schema documents.
//!
//! A schema document arrives as JSON: a list of field declarations, or an
//! object whose entries are (name, declaration) pairs. Each declaration is
//! decoded into a [`FieldSpec`]. Unknown keys are ignored so that schemas
//! written for richer form renderers still compile here.
//!
//! The design of the declaration structure follows the JSON schema form
//! conventions:
//! <https://github.com/json-schema-form/json-schema-form>

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// One field declaration, decoded from its JSON object.
///
/// All supported keys:
///
/// ```json
/// {
///   "key": "field unique identifier",
///   "type": "string",
///   "title": "title of the field",
///   "required": true,
///   "disabled": false,
///   "readonly": false,
///   "placeholder": "placeholder message",
///   "description": "help/description message",
///   "value": "initial value",
///   "validationMessage": "error text shown when field content is not accepted",
///   "enum": ["a", "b", "c"],
///   "titleMap": {"a": "A", "b": "B", "c": "C"},
///   "minimum": 0, "exclusiveMinimum": false,
///   "maximum": 10, "exclusiveMaximum": false,
///   "minLength": 0, "maxLength": 100,
///   "pattern": "^[a-z]+$",
///   "htmlClass": "css classes for the field row",
///   "fieldHtmlClass": "css classes for the input element"
/// }
/// ```
///
/// `id` and `name` are accepted as aliases for `key`; `helpvalue` is the
/// initial value of a `static` field and wins over `value` when both are
/// present.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct FieldSpec {
    pub key: Option<String>,
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub field_type: Option<String>,
    pub title: Option<String>,
    pub required: Option<bool>,
    pub disabled: Option<bool>,
    pub readonly: Option<bool>,
    pub placeholder: Option<String>,
    pub description: Option<String>,
    pub value: Option<Value>,
    pub helpvalue: Option<Value>,
    #[serde(rename = "validationMessage", alias = "error_message")]
    pub validation_message: Option<MessageSpec>,
    #[serde(rename = "enum")]
    pub enum_values: Option<Vec<Value>>,
    #[serde(rename = "titleMap")]
    pub title_map: Option<TitleMap>,
    pub minimum: Option<i64>,
    pub maximum: Option<i64>,
    #[serde(rename = "exclusiveMinimum")]
    pub exclusive_minimum: bool,
    #[serde(rename = "exclusiveMaximum")]
    pub exclusive_maximum: bool,
    #[serde(rename = "maxLength")]
    pub max_length: Option<usize>,
    #[serde(rename = "minLength")]
    pub min_length: Option<usize>,
    pub pattern: Option<String>,
    #[serde(rename = "htmlClass")]
    pub html_class: Option<String>,
    #[serde(rename = "fieldHtmlClass")]
    pub field_html_class: Option<String>,
    /// Nested declarations of an `object` field, flattened at compile time.
    pub properties: Option<Value>,
}

impl FieldSpec {
    pub(crate) fn from_value(index: usize, name: Option<&str>, decl: &Value) -> Result<Self> {
        serde_json::from_value(decl.clone()).map_err(|e| Error::InvalidFieldSpec {
            index,
            name: name
                .map(str::to_string)
                .or_else(|| decl.get("key").and_then(Value::as_str).map(str::to_string))
                .unwrap_or_default(),
            reason: format!("cannot decode field declaration: {}", e),
        })
    }

    /// Declared identifier: `key`, falling back to `id`, then `name`.
    pub fn declared_name(&self) -> Option<&str> {
        self.key
            .as_deref()
            .or(self.id.as_deref())
            .or(self.name.as_deref())
    }

    /// Declared type, defaulting to `"string"`.
    pub fn declared_type(&self) -> &str {
        self.field_type.as_deref().unwrap_or("string")
    }

    /// Initial value; `helpvalue` wins over `value`.
    pub fn initial(&self) -> Option<&Value> {
        self.helpvalue.as_ref().or(self.value.as_ref())
    }

    /// Whether the declaration carries an `enum` or a `titleMap`.
    pub fn has_choices(&self) -> bool {
        self.enum_values.is_some() || self.title_map.is_some()
    }
}

/// Display labels for choice values, in either of the two schema shapes.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum TitleMap {
    /// JSON object: stringified raw value → display label. Only string
    /// choice values can match, since JSON object keys are strings.
    Map(Map<String, Value>),
    /// List of `{"value": .., "name": ..}` pairs, matched by structural
    /// equality, so integer choice values pair up too.
    List(Vec<TitleMapEntry>),
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct TitleMapEntry {
    pub value: Value,
    pub name: String,
}

impl TitleMap {
    /// The raw choice values, used when the declaration has no `enum`.
    pub(crate) fn values(&self) -> Vec<Value> {
        match self {
            TitleMap::Map(map) => map.keys().map(|k| Value::String(k.clone())).collect(),
            TitleMap::List(entries) => entries.iter().map(|e| e.value.clone()).collect(),
        }
    }

    /// The display labels, used for the short-label layout check when the
    /// declaration has no `enum`.
    pub(crate) fn labels(&self) -> Vec<String> {
        match self {
            TitleMap::Map(map) => map.values().map(text_of).collect(),
            TitleMap::List(entries) => entries.iter().map(|e| e.name.clone()).collect(),
        }
    }

    /// Label for one raw choice value, when the map has one.
    pub(crate) fn label_for(&self, raw: &Value) -> Option<String> {
        match self {
            TitleMap::Map(map) => match raw {
                Value::String(s) => map.get(s).map(text_of),
                _ => None,
            },
            TitleMap::List(entries) => entries
                .iter()
                .find(|e| e.value == *raw)
                .map(|e| e.name.clone()),
        }
    }
}

/// Custom error message declaration: one string for everything, or a
/// mapping keyed by error kind.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum MessageSpec {
    Text(String),
    ByKind(Map<String, Value>),
}

/// One schema entry: an explicit name when the document is a mapping, plus
/// the raw declaration.
pub(crate) struct SchemaEntry<'a> {
    pub name: Option<String>,
    pub decl: &'a Value,
}

/// Split a schema document into its ordered entries.
pub(crate) fn schema_entries(doc: &Value) -> Result<Vec<SchemaEntry<'_>>> {
    match doc {
        Value::Array(rows) => Ok(rows
            .iter()
            .map(|decl| SchemaEntry { name: None, decl })
            .collect()),
        Value::Object(map) => Ok(map
            .iter()
            .map(|(name, decl)| SchemaEntry {
                name: Some(name.clone()),
                decl,
            })
            .collect()),
        other => Err(Error::BadSchema(format!(
            "expected a list or mapping of field declarations, got {}",
            type_name(other)
        ))),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}

/// Text form of a JSON scalar, without the quoting `Value::to_string` puts
/// around strings.
pub(crate) fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
