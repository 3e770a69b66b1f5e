//! Bounded LRU cache of compiled form templates.
//!
//! Schemas arrive with every submission, but almost every submission for
//! the same exercise carries the same schema. Caching the compiled template
//! by content hash makes recompiles rare: a hit costs one digest, a miss
//! one compile. The cache is the engine's only shared mutable state; one
//! mutex guards lookups, compiles and insertions, which also gives strict
//! at-most-one-concurrent-compile per content.

use std::sync::{Arc, Mutex, PoisonError};

use indexmap::IndexMap;
use serde_json::Value;

use crate::compiler::{compile, FormTemplate};
use crate::error::Result;
use crate::hash::{freeze, Hasher};
use crate::i18n::LocalizationTable;
use crate::settings::FormSettings;

/// LRU cache mapping (schema, localization table, language) content to a
/// compiled [`FormTemplate`].
pub struct FormCache {
    settings: FormSettings,
    entries: Mutex<IndexMap<String, Arc<FormTemplate>>>,
}

impl FormCache {
    pub fn new(settings: FormSettings) -> Self {
        Self {
            settings,
            entries: Mutex::new(IndexMap::new()),
        }
    }

    pub fn with_capacity(cache_size: usize) -> Self {
        Self::new(FormSettings {
            cache_size,
            ..FormSettings::default()
        })
    }

    /// Content hash identifying one (schema, i18n, language) triple.
    ///
    /// The language is part of the key: translations are baked into the
    /// template at compile time, so the same schema compiled under another
    /// language is a different template.
    pub fn cache_key(schema: &Value, i18n: Option<&Value>, language: &str) -> String {
        let mut hasher = Hasher::new();
        hasher.update(&freeze(schema));
        hasher.update(&freeze(i18n.unwrap_or(&Value::Null)));
        hasher.update_str(language);
        hasher.finish()
    }

    /// Fetch the template for this content, compiling it on a miss.
    ///
    /// A hit refreshes the entry's recency. A failed compile is returned to
    /// the caller and nothing is cached, so the next lookup retries instead
    /// of serving a poisoned entry.
    pub fn get_or_compile(
        &self,
        schema: &Value,
        i18n: Option<&Value>,
        language: &str,
    ) -> Result<Arc<FormTemplate>> {
        let key = Self::cache_key(schema, i18n, language);
        let mut entries = self.lock();

        if let Some(template) = entries.shift_remove(&key) {
            log::trace!("form cache hit: {}", key);
            entries.insert(key, template.clone());
            return Ok(template);
        }

        log::debug!("form cache miss, compiling: {}", key);
        let table = match i18n {
            Some(value) if !value.is_null() => Some(LocalizationTable::from_value(value)?),
            _ => None,
        };
        let template = Arc::new(compile(schema, table.as_ref(), language, &self.settings)?);

        if self.settings.cache_size == 0 {
            return Ok(template);
        }
        if entries.len() >= self.settings.cache_size {
            if let Some((evicted, _)) = entries.shift_remove_index(0) {
                log::debug!("form cache evicted: {}", evicted);
            }
        }
        entries.insert(key, template.clone());
        Ok(template)
    }

    /// Drop the entry for this content, if cached.
    pub fn clear(&self, schema: &Value, i18n: Option<&Value>, language: &str) {
        let key = Self::cache_key(schema, i18n, language);
        self.lock().shift_remove(&key);
    }

    /// Drop every cached template.
    pub fn clear_all(&self) {
        self.lock().clear();
    }

    /// Number of templates currently cached.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Configured maximum entry count.
    pub fn max_size(&self) -> usize {
        self.settings.cache_size
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, IndexMap<String, Arc<FormTemplate>>> {
        // a panic mid-compile leaves no partial state behind, so a
        // poisoned lock is still usable
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for FormCache {
    fn default() -> Self {
        Self::new(FormSettings::default())
    }
}
