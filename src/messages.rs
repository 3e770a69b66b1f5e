//! Per-field error messages, custom and default.
//!
//! A field declaration may carry a `validationMessage`: either one string,
//! which then stands in for every kind of validation failure on that field,
//! or a mapping from error kind to message. The expanded table is attached
//! to the compiled field and consulted by kind when a validator fails, with
//! the engine's default message as fallback.

use std::collections::BTreeMap;

use crate::spec::{text_of, MessageSpec};

/// The kinds of validation failure a field can produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorKind {
    Required,
    Invalid,
    InvalidChoice,
    MaxLength,
    MinLength,
    MaxValue,
    MinValue,
    Pattern,
}

/// Every kind a plain-string custom message expands to.
pub(crate) const ERROR_KINDS: [ErrorKind; 8] = [
    ErrorKind::Required,
    ErrorKind::Invalid,
    ErrorKind::InvalidChoice,
    ErrorKind::MaxLength,
    ErrorKind::MinLength,
    ErrorKind::MaxValue,
    ErrorKind::MinValue,
    ErrorKind::Pattern,
];

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Required => "required",
            ErrorKind::Invalid => "invalid",
            ErrorKind::InvalidChoice => "invalid_choice",
            ErrorKind::MaxLength => "max_length",
            ErrorKind::MinLength => "min_length",
            ErrorKind::MaxValue => "max_value",
            ErrorKind::MinValue => "min_value",
            ErrorKind::Pattern => "pattern",
        }
    }

    fn from_key(key: &str) -> Option<Self> {
        ERROR_KINDS.iter().copied().find(|k| k.as_str() == key)
    }
}

/// Keys that mark the default entry of a per-kind message mapping.
const DEFAULT_KEYS: [&str; 3] = ["", "__default__", "default"];

/// Error message table for one compiled field.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Messages(BTreeMap<ErrorKind, String>);

impl Messages {
    /// Expand a declaration's message spec into a per-kind table.
    ///
    /// A plain string applies to every recognized kind. A mapping with a
    /// default entry is filled out to every kind; without one it is used
    /// as given, unknown kind keys dropped.
    pub(crate) fn build<F>(spec: &MessageSpec, localize: F) -> Self
    where
        F: Fn(&str) -> String,
    {
        let mut table = BTreeMap::new();
        match spec {
            MessageSpec::Text(message) => {
                let message = localize(message);
                for kind in ERROR_KINDS {
                    table.insert(kind, message.clone());
                }
            }
            MessageSpec::ByKind(map) => {
                let default = DEFAULT_KEYS
                    .iter()
                    .find_map(|k| map.get(*k))
                    .map(|v| localize(&text_of(v)));
                match default {
                    Some(default) => {
                        for kind in ERROR_KINDS {
                            let message = map
                                .get(kind.as_str())
                                .map(|v| localize(&text_of(v)))
                                .unwrap_or_else(|| default.clone());
                            table.insert(kind, message);
                        }
                    }
                    None => {
                        for (key, value) in map {
                            if let Some(kind) = ErrorKind::from_key(key) {
                                table.insert(kind, localize(&text_of(value)));
                            }
                        }
                    }
                }
            }
        }
        Messages(table)
    }

    pub fn get(&self, kind: ErrorKind) -> Option<&str> {
        self.0.get(&kind).map(String::as_str)
    }

    /// The message for a failure of the given kind: the custom entry when
    /// one exists, otherwise the caller-supplied default.
    pub(crate) fn for_kind<F>(&self, kind: ErrorKind, default: F) -> String
    where
        F: FnOnce() -> String,
    {
        match self.get(kind) {
            Some(message) => message.to_string(),
            None => default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn spec_of(value: serde_json::Value) -> MessageSpec {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn plain_string_covers_every_kind() {
        let m = Messages::build(&spec_of(json!("Bad answer")), |s| s.to_string());
        for kind in ERROR_KINDS {
            assert_eq!(m.get(kind), Some("Bad answer"));
        }
    }

    #[test]
    fn mapping_without_default_is_used_as_given() {
        let m = Messages::build(
            &spec_of(json!({"required": "Say something", "unknown_kind": "x"})),
            |s| s.to_string(),
        );
        assert_eq!(m.get(ErrorKind::Required), Some("Say something"));
        assert_eq!(m.get(ErrorKind::Invalid), None);
    }

    #[test]
    fn mapping_default_fills_missing_kinds() {
        let m = Messages::build(
            &spec_of(json!({"required": "Say something", "default": "Bad answer"})),
            |s| s.to_string(),
        );
        assert_eq!(m.get(ErrorKind::Required), Some("Say something"));
        assert_eq!(m.get(ErrorKind::Invalid), Some("Bad answer"));
        assert_eq!(m.get(ErrorKind::MaxLength), Some("Bad answer"));
    }

    #[test]
    fn empty_string_key_marks_the_default() {
        let m = Messages::build(&spec_of(json!({"": "Bad answer"})), |s| s.to_string());
        assert_eq!(m.get(ErrorKind::Pattern), Some("Bad answer"));
    }

    #[test]
    fn messages_are_localized() {
        let m = Messages::build(&spec_of(json!("Bad answer")), |s| {
            format!("{} (fi)", s)
        });
        assert_eq!(m.get(ErrorKind::Required), Some("Bad answer (fi)"));
    }

    #[test]
    fn for_kind_falls_back_to_default() {
        let m = Messages::default();
        assert_eq!(
            m.for_kind(ErrorKind::Required, || "This field is required.".into()),
            "This field is required."
        );
    }
}
