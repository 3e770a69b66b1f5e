//! schema-form compiles JSON form specifications into validatable form
//! objects at runtime.
//!
//! A form specification is a JSON document listing field declarations, in
//! the style of the json-schema-form conventions: each declaration names a
//! key, a type, and options like a title, choice lists, numeric bounds or a
//! regex pattern. The engine turns one of these documents, plus an optional
//! localization table and an active language, into an immutable
//! [`FormTemplate`] that can be bound to submitted data over and over:
//!
//! - [`FormCache`] looks templates up by a structural content hash, so a
//!   schema is compiled once no matter how many submissions carry it, with
//!   least-recently-used eviction past a configured capacity.
//! - Compilation walks the declarations in order, flattens nested `object`
//!   groups, infers field kinds from choice data (a five-way enum becomes a
//!   radio group, a ten-way one a dropdown), and resolves every
//!   translatable string for the active language.
//! - A bound [`Form`] validates each field independently, collects
//!   per-field error messages, and cleans the submission into a flat
//!   key-value map ready to store or grade.
//! - Review metadata ([`FormTemplate::is_graded`],
//!   [`Form::requires_manual_check`]) tells the surrounding workflow
//!   whether a human needs to read the submission.
//!
//! Compile-time failures ([`Error`]) are kept distinct from submission
//! failures (an [`ErrorSet`] returned as data), so a broken schema can fall
//! back to a [`DegradedForm`] that accepts everything as opaque text
//! instead of dropping feedback on the floor.
//!
//! # Example
//!
//! ```
//! use schema_form::{FormCache, FormData, FormSettings, Validatable};
//! use serde_json::json;
//!
//! # fn main() -> schema_form::Result<()> {
//! let schema = json!([
//!     {"key": "message", "type": "textarea", "title": "Feedback", "required": true},
//!     {"key": "timespent", "type": "integer", "title": "Hours spent", "minimum": 0},
//! ]);
//!
//! let cache = FormCache::new(FormSettings::default());
//! let template = cache.get_or_compile(&schema, None, "en")?;
//! assert!(template.is_graded());
//!
//! let mut data = FormData::new();
//! data.append("message", "Great course!");
//! data.append("timespent", "7");
//!
//! let form = template.bind(data);
//! let cleaned = form.validate().expect("form data is valid");
//! assert_eq!(cleaned["message"], "Great course!");
//! assert_eq!(cleaned["timespent"], 7);
//! # Ok(())
//! # }
//! ```

mod cache;
mod compiler;
mod error;
mod field;
mod form;
mod hash;
mod i18n;
mod messages;
mod resolver;
mod settings;
mod spec;

pub use self::cache::FormCache;
pub use self::compiler::{compile, FormTemplate};
pub use self::error::{Error, Result};
pub use self::field::{
    BoolField, Choice, ChoiceField, FieldDef, FieldKind, LabelField, MultiChoiceField,
    NumberField, TextField, WidgetKind,
};
pub use self::form::{CleanedData, DegradedForm, ErrorSet, Form, FormData, Validatable};
pub use self::hash::{digest, digest_value, freeze, Frozen, Hasher};
pub use self::i18n::LocalizationTable;
pub use self::messages::{ErrorKind, Messages};
pub use self::settings::FormSettings;
pub use self::spec::{FieldSpec, MessageSpec, TitleMap, TitleMapEntry};
