//! Compilation of schema documents into immutable form templates.

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::Result;
use crate::field::FieldDef;
use crate::form::{Form, FormData};
use crate::i18n::LocalizationTable;
use crate::resolver::{resolve, ResolveContext};
use crate::settings::FormSettings;
use crate::spec::{schema_entries, FieldSpec};

/// The compiled product of one (schema, localization table, language)
/// triple: an ordered field collection plus the derived review metadata.
///
/// Templates are immutable once built and safe to share behind an [`Arc`];
/// every validation happens on a separate bound [`Form`].
#[derive(Clone, Debug, PartialEq)]
pub struct FormTemplate {
    fields: IndexMap<String, FieldDef>,
    all_text_fields: Vec<String>,
    required_text_fields: Vec<String>,
    optional_text_fields: Vec<String>,
    is_graded: bool,
    language: String,
    text_field_min_length: usize,
}

impl FormTemplate {
    /// Fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.values()
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.get(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Names of every free-text field, in declaration order.
    pub fn all_text_fields(&self) -> &[String] {
        &self.all_text_fields
    }

    /// Names of the required free-text fields.
    pub fn required_text_fields(&self) -> &[String] {
        &self.required_text_fields
    }

    /// Names of the optional free-text fields.
    pub fn optional_text_fields(&self) -> &[String] {
        &self.optional_text_fields
    }

    /// True when the form has at least one required text field; such forms
    /// always need a human response before the submission counts as
    /// handled.
    pub fn is_graded(&self) -> bool {
        self.is_graded
    }

    /// The language the template's strings were resolved for.
    pub fn language(&self) -> &str {
        &self.language
    }

    pub(crate) fn text_field_min_length(&self) -> usize {
        self.text_field_min_length
    }

    /// Bind submitted data to this template for validation.
    pub fn bind(self: Arc<Self>, data: FormData) -> Form {
        Form::new(self, data)
    }
}

/// Compile a schema document into a form template.
///
/// Entries are walked in order. An `object` entry is not a field itself:
/// its `properties` are compiled recursively and the resulting fields are
/// flattened in at the parent's position, named `{parent}_{child}`. A
/// duplicate computed name replaces the earlier field but keeps its
/// position.
pub fn compile(
    schema: &Value,
    i18n: Option<&LocalizationTable>,
    language: &str,
    settings: &FormSettings,
) -> Result<FormTemplate> {
    let ctx = ResolveContext { i18n, language };
    let mut fields = IndexMap::new();
    collect_fields(schema, &ctx, &mut fields)?;

    let mut all_text_fields = Vec::new();
    let mut required_text_fields = Vec::new();
    let mut optional_text_fields = Vec::new();
    for def in fields.values() {
        if def.is_text() {
            all_text_fields.push(def.name.clone());
            if def.required {
                required_text_fields.push(def.name.clone());
            } else {
                optional_text_fields.push(def.name.clone());
            }
        }
    }
    let is_graded = !required_text_fields.is_empty();

    log::debug!(
        "compiled form template: {} fields ({} text, {} required), language {}",
        fields.len(),
        all_text_fields.len(),
        required_text_fields.len(),
        language
    );

    Ok(FormTemplate {
        fields,
        all_text_fields,
        required_text_fields,
        optional_text_fields,
        is_graded,
        language: language.to_string(),
        text_field_min_length: settings.text_field_min_length,
    })
}

fn collect_fields(
    doc: &Value,
    ctx: &ResolveContext,
    out: &mut IndexMap<String, FieldDef>,
) -> Result<()> {
    for (index, entry) in schema_entries(doc)?.into_iter().enumerate() {
        let spec = FieldSpec::from_value(index, entry.name.as_deref(), entry.decl)?;
        // mapping key wins over the declaration's own key
        let name = entry
            .name
            .or_else(|| spec.declared_name().map(str::to_string))
            .unwrap_or_else(|| format!("field_{}", index));

        if spec.declared_type() == "object" {
            if let Some(properties) = &spec.properties {
                if !properties.is_null() {
                    let mut children = IndexMap::new();
                    collect_fields(properties, ctx, &mut children)?;
                    for (child_name, mut child) in children {
                        let flat_name = format!("{}_{}", name, child_name);
                        child.name = flat_name.clone();
                        out.insert(flat_name, child);
                    }
                }
            }
            continue;
        }

        let def = resolve(index, &name, &spec, ctx)?;
        out.insert(name, def);
    }
    Ok(())
}
