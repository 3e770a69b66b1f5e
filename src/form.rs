//! Bound forms: validation, cleaning and review metadata.

use std::sync::Arc;

use indexmap::IndexMap;
use once_cell::sync::OnceCell;
use serde_json::Value;

use crate::compiler::FormTemplate;

/// Validated and cleaned submission values, keyed by field name. Entries
/// that cleaned to null are already dropped.
pub type CleanedData = serde_json::Map<String, Value>;

/// Validation failures, keyed by field name, in field order.
pub type ErrorSet = IndexMap<String, Vec<String>>;

/// Submitted data bag: a flat string-keyed multimap, the shape of a decoded
/// HTTP form post. Multi-select fields arrive as repeated keys.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormData {
    values: IndexMap<String, Vec<String>>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one value under a key, keeping any previous values.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.entry(key.into()).or_default().push(value.into());
    }

    /// Replace all values under a key.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), vec![value.into()]);
    }

    /// First value under a key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .and_then(|v| v.first())
            .map(String::as_str)
    }

    /// All values under a key.
    pub fn get_all(&self, key: &str) -> Option<&[String]> {
        self.values.get(key).map(Vec::as_slice)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut data = FormData::new();
        for (key, value) in iter {
            data.append(key, value);
        }
        data
    }
}

/// Anything a submission can be validated against: a real compiled form, or
/// the degraded fallback used when the schema itself is broken.
pub trait Validatable {
    fn validate(&self) -> Result<CleanedData, ErrorSet>;

    /// True for the fallback form; lets callers record that a submission
    /// was accepted without its real schema.
    fn is_degraded(&self) -> bool {
        false
    }
}

/// A form template bound to one submitted data bag.
///
/// Validation runs once, lazily, and the outcome is reused by every
/// metadata query on the same binding.
#[derive(Debug)]
pub struct Form {
    template: Arc<FormTemplate>,
    data: FormData,
    outcome: OnceCell<Result<CleanedData, ErrorSet>>,
}

impl Form {
    pub(crate) fn new(template: Arc<FormTemplate>, data: FormData) -> Self {
        Self {
            template,
            data,
            outcome: OnceCell::new(),
        }
    }

    pub fn template(&self) -> &FormTemplate {
        &self.template
    }

    pub fn data(&self) -> &FormData {
        &self.data
    }

    pub fn is_valid(&self) -> bool {
        self.outcome().is_ok()
    }

    fn outcome(&self) -> &Result<CleanedData, ErrorSet> {
        self.outcome.get_or_init(|| self.run_validation())
    }

    fn run_validation(&self) -> Result<CleanedData, ErrorSet> {
        let mut cleaned = CleanedData::new();
        let mut errors = ErrorSet::new();
        for def in self.template.fields() {
            match def.clean(&self.data) {
                // fields that produced no value stay out of cleaned data
                Ok(Value::Null) => {}
                Ok(value) => {
                    cleaned.insert(def.name.clone(), value);
                }
                Err(messages) => {
                    errors.insert(def.name.clone(), dedup_messages(messages));
                }
            }
        }
        if errors.is_empty() {
            Ok(cleaned)
        } else {
            Err(errors)
        }
    }

    /// True when any *optional* text field got an answer longer than the
    /// configured minimum. Such answers deserve a human reader even though
    /// nothing required them.
    ///
    /// Uses cleaned data when the submission validated, the raw data
    /// otherwise.
    pub fn has_optional_answers(&self) -> bool {
        let min_length = self.template.text_field_min_length();
        let counts = |text: &str| {
            !text.is_empty() && bytecount::num_chars(text.as_bytes()) > min_length
        };
        match self.outcome() {
            Ok(cleaned) => self.template.optional_text_fields().iter().any(|name| {
                cleaned
                    .get(name)
                    .and_then(Value::as_str)
                    .map(counts)
                    .unwrap_or(false)
            }),
            Err(_) => self
                .template
                .optional_text_fields()
                .iter()
                .any(|name| self.data.get(name).map(counts).unwrap_or(false)),
        }
    }

    /// Whether a human must look at this submission before it counts as
    /// handled: it is graded, or a voluntary text answer was given.
    pub fn requires_manual_check(&self) -> bool {
        self.template.is_graded() || self.has_optional_answers()
    }
}

impl Validatable for Form {
    fn validate(&self) -> Result<CleanedData, ErrorSet> {
        self.outcome().clone()
    }
}

/// Fallback used when a form spec is missing or broken: every submitted
/// entry is kept as opaque text, nothing is ever rejected. Feedback must
/// not be lost just because its schema was.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DegradedForm {
    data: FormData,
}

impl DegradedForm {
    pub fn new(data: FormData) -> Self {
        Self { data }
    }

    pub fn data(&self) -> &FormData {
        &self.data
    }
}

impl Validatable for DegradedForm {
    fn validate(&self) -> Result<CleanedData, ErrorSet> {
        let mut cleaned = CleanedData::new();
        for key in self.data.keys() {
            let value = self.data.get(key).unwrap_or("").trim();
            cleaned.insert(key.to_string(), Value::String(value.to_string()));
        }
        Ok(cleaned)
    }

    fn is_degraded(&self) -> bool {
        true
    }
}

/// Drop exact repeats of a message, keeping first-seen order. Custom
/// message expansion can attach the same text to several error kinds at
/// once, and nobody needs to read it twice.
fn dedup_messages(messages: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(messages.len());
    for message in messages {
        if !out.contains(&message) {
            out.push(message);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::compile;
    use crate::settings::FormSettings;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn template(schema: Value) -> Arc<FormTemplate> {
        Arc::new(compile(&schema, None, "en", &FormSettings::default()).unwrap())
    }

    fn data(pairs: &[(&str, &str)]) -> FormData {
        pairs.iter().copied().collect()
    }

    fn feedback_template() -> Arc<FormTemplate> {
        template(json!([
            {"key": "message", "type": "textarea", "title": "Feedback", "required": true},
            {"key": "extra", "type": "text", "title": "Anything else?"},
            {"key": "timespent", "type": "integer", "minimum": 0},
            {"key": "note", "type": "static", "helpvalue": "Thanks for answering!"},
        ]))
    }

    #[test]
    fn valid_submission_cleans_and_drops_nulls() {
        let form = feedback_template().bind(data(&[
            ("message", "Great course!"),
            ("extra", ""),
            ("timespent", "7"),
        ]));
        assert!(form.is_valid());
        let cleaned = form.validate().unwrap();
        assert_eq!(cleaned.get("message"), Some(&json!("Great course!")));
        assert_eq!(cleaned.get("extra"), Some(&json!("")));
        assert_eq!(cleaned.get("timespent"), Some(&json!(7)));
        // the static help field cleaned to null and was dropped
        assert!(!cleaned.contains_key("note"));
    }

    #[test]
    fn empty_optional_number_is_dropped() {
        let form = feedback_template().bind(data(&[("message", "hello")]));
        let cleaned = form.validate().unwrap();
        assert!(!cleaned.contains_key("timespent"));
    }

    #[test]
    fn errors_land_on_their_fields() {
        let form = feedback_template().bind(data(&[
            ("message", ""),
            ("timespent", "soon"),
        ]));
        assert!(!form.is_valid());
        let errors = form.validate().unwrap_err();
        assert_eq!(errors["message"], vec!["This field is required."]);
        assert_eq!(errors["timespent"], vec!["Enter a whole number."]);
        assert!(!errors.contains_key("extra"));
    }

    #[test]
    fn duplicate_error_messages_are_suppressed() {
        // one custom message for every error kind, and a value that fails
        // two validators at once: the message must appear only once
        let template = template(json!([{
            "key": "code", "type": "string",
            "minLength": 5, "pattern": "^[0-9]+$",
            "validationMessage": "Give a proper code.",
        }]));
        let form = template.bind(data(&[("code", "ab")]));
        let errors = form.validate().unwrap_err();
        assert_eq!(errors["code"], vec!["Give a proper code."]);
    }

    #[test]
    fn disabled_field_keeps_its_initial_value() {
        let template = template(json!([
            {"key": "course", "type": "text", "value": "rust-101", "readonly": true},
            {"key": "message", "type": "textarea", "required": true},
        ]));
        let form = template.bind(data(&[
            ("course", "hacked-value"),
            ("message", "fine"),
        ]));
        let cleaned = form.validate().unwrap();
        assert_eq!(cleaned.get("course"), Some(&json!("rust-101")));
    }

    #[test]
    fn optional_answers_need_enough_characters() {
        let template = feedback_template();

        // two characters is at the threshold, not over it
        let form = template.clone().bind(data(&[("message", "m"), ("extra", "ok")]));
        assert!(form.is_valid());
        assert!(!form.has_optional_answers());

        let form = template.clone().bind(data(&[("message", "m"), ("extra", "okay")]));
        assert!(form.has_optional_answers());

        let form = template.bind(data(&[("message", "m")]));
        assert!(!form.has_optional_answers());
    }

    #[test]
    fn optional_answers_fall_back_to_raw_data_when_invalid() {
        let form = feedback_template().bind(data(&[
            ("message", ""),
            ("extra", "worth reading"),
        ]));
        assert!(!form.is_valid());
        assert!(form.has_optional_answers());
    }

    #[test]
    fn manual_check_when_graded_or_answered() {
        // graded form: always needs a human
        let form = feedback_template().bind(data(&[("message", "hi")]));
        assert!(form.requires_manual_check());

        // ungraded form, no optional answers: no
        let template = template(json!([
            {"key": "rating", "type": "integer", "enum": [1, 2, 3]},
            {"key": "extra", "type": "text"},
        ]));
        let form = template.clone().bind(data(&[("rating", "2")]));
        assert!(!form.requires_manual_check());

        // ungraded, but a voluntary answer was written: yes
        let form = template.bind(data(&[("rating", "2"), ("extra", "please fix the audio")]));
        assert!(form.requires_manual_check());
    }

    #[test]
    fn initial_value_makes_field_required_and_coerced() {
        let template = template(json!([
            {"key": "message", "type": "textarea", "title": "Feedback", "required": true},
            {"key": "timespent", "type": "integer", "value": 10},
        ]));
        assert!(template.field("timespent").unwrap().required);

        let form = template.clone().bind(data(&[("message", ""), ("timespent", "5")]));
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.keys().collect::<Vec<_>>(), vec!["message"]);

        let form = template.bind(data(&[("message", "ok"), ("timespent", "5")]));
        let cleaned = form.validate().unwrap();
        assert_eq!(cleaned.get("timespent"), Some(&json!(5)));
    }

    #[test]
    fn multi_choice_round_trip() {
        let template = template(json!([{
            "key": "topics", "type": "checkbox",
            "enum": ["rust", "python", "go"],
        }]));
        let mut form_data = FormData::new();
        form_data.append("topics", "rust");
        form_data.append("topics", "go");
        let form = template.bind(form_data);
        let cleaned = form.validate().unwrap();
        assert_eq!(cleaned.get("topics"), Some(&json!(["rust", "go"])));
    }

    #[test]
    fn degraded_form_accepts_anything() {
        let degraded = DegradedForm::new(data(&[
            ("message", "  still heard  "),
            ("whatever", "42"),
        ]));
        assert!(degraded.is_degraded());
        let cleaned = degraded.validate().unwrap();
        assert_eq!(cleaned.get("message"), Some(&json!("still heard")));
        assert_eq!(cleaned.get("whatever"), Some(&json!("42")));
    }

    #[test]
    fn real_form_is_not_degraded() {
        let form = feedback_template().bind(data(&[("message", "hi")]));
        assert!(!form.is_degraded());
    }

    #[test]
    fn dedup_keeps_first_seen_order() {
        let messages = vec![
            "b".to_string(),
            "a".to_string(),
            "b".to_string(),
            "c".to_string(),
            "a".to_string(),
        ];
        assert_eq!(dedup_messages(messages), vec!["b", "a", "c"]);
    }
}
