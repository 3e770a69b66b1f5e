//! Localization of schema-supplied strings.
//!
//! A schema may travel with a table of translations for its labels, help
//! texts, placeholders, choice titles and custom error messages. The table
//! maps the original string to per-language variants. Resolution is exact:
//! no entry for the string, or no entry for the active language, means the
//! original string is used as-is. There is deliberately no fallback-language
//! chain; the upstream either supplies the active language or doesn't
//! translate at all.
//!
//! All translatable strings are resolved eagerly at compile time, so a
//! compiled template is specific to the language that was active when it
//! was built.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// Table of translatable strings: original text → language code → text.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalizationTable(BTreeMap<String, BTreeMap<String, String>>);

impl LocalizationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a table from its JSON document form.
    pub fn from_value(value: &Value) -> Result<Self> {
        serde_json::from_value(value.clone())
            .map_err(|e| Error::BadSchema(format!("cannot decode localization table: {}", e)))
    }

    /// Register one translation.
    pub fn insert(
        &mut self,
        source: impl Into<String>,
        language: impl Into<String>,
        text: impl Into<String>,
    ) {
        self.0
            .entry(source.into())
            .or_default()
            .insert(language.into(), text.into());
    }

    /// Resolve a string for the given language, returning it unchanged when
    /// no exact translation exists.
    pub fn resolve<'a>(&'a self, value: &'a str, language: &str) -> &'a str {
        self.0
            .get(value)
            .and_then(|variants| variants.get(language))
            .map(String::as_str)
            .unwrap_or(value)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn table() -> LocalizationTable {
        let mut t = LocalizationTable::new();
        t.insert("Feedback", "fi", "Palaute");
        t.insert("Feedback", "en", "Feedback");
        t
    }

    #[test]
    fn resolves_exact_language() {
        let t = table();
        assert_eq!(t.resolve("Feedback", "fi"), "Palaute");
        assert_eq!(t.resolve("Feedback", "en"), "Feedback");
    }

    #[test]
    fn missing_language_passes_through() {
        let t = table();
        assert_eq!(t.resolve("Feedback", "sv"), "Feedback");
    }

    #[test]
    fn missing_entry_passes_through() {
        let t = table();
        assert_eq!(t.resolve("Other text", "fi"), "Other text");
    }

    #[test]
    fn decodes_from_json() {
        let t = LocalizationTable::from_value(&json!({
            "Feedback": {"fi": "Palaute"},
        }))
        .unwrap();
        assert_eq!(t.resolve("Feedback", "fi"), "Palaute");
    }

    #[test]
    fn rejects_wrong_shape() {
        assert!(LocalizationTable::from_value(&json!(["not", "a", "table"])).is_err());
        assert!(LocalizationTable::from_value(&json!({"Feedback": "flat"})).is_err());
    }
}
