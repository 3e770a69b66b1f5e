use std::fmt;

use serde_json::Value;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Compile-time failures of the form engine.
///
/// These cover everything that can go wrong while turning a schema document
/// into a form template. Failures of a *submission* against a compiled form
/// are not errors in this sense; they are collected into an
/// [`ErrorSet`][crate::form::ErrorSet] and returned as data, so callers can
/// tell "schema broken" (degrade to a fallback form) apart from "submission
/// invalid" (re-prompt the user).
#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    /// A field declaration could not be resolved into a concrete field:
    /// its type has no buildable field kind, its regex pattern doesn't
    /// compile, or the declaration itself can't be decoded.
    InvalidFieldSpec {
        index: usize,
        name: String,
        reason: String,
    },
    /// An integer-typed choice field carries a choice whose raw value is
    /// not an integer.
    InconsistentChoiceType { name: String, value: Value },
    /// The schema or localization document itself has the wrong shape,
    /// before any field-level resolution starts.
    BadSchema(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::InvalidFieldSpec {
                index,
                ref name,
                ref reason,
            } => write!(
                f,
                "Invalid field spec at index {} (name '{}'): {}",
                index, name, reason
            ),
            Error::InconsistentChoiceType {
                ref name,
                ref value,
            } => write!(
                f,
                "Not all choices are integers for integer field '{}': got {}",
                name, value
            ),
            Error::BadSchema(ref reason) => write!(f, "Bad schema document: {}", reason),
        }
    }
}

impl std::error::Error for Error {}
