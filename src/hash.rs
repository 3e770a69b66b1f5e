//! Structural content hashing of schema and localization documents.
//!
//! Two documents that are structurally equal must produce the same digest
//! no matter what order their mapping keys were inserted in, while sequence
//! order stays significant. [`freeze`] turns a [`Value`] into that
//! canonical shape, and [`Hasher`] folds one or more frozen values into a
//! fixed-length hex digest suitable as a cache key.

use serde_json::Value;
use sha2::{Digest, Sha256};

/// Canonical form of a JSON-like value.
///
/// Mappings become key-sorted pair sequences, so insertion order is erased;
/// sequences keep their order. Scalars carry through unchanged.
#[derive(Clone, Debug, PartialEq)]
pub enum Frozen {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),
    Seq(Vec<Frozen>),
    Map(Vec<(String, Frozen)>),
}

/// Build the canonical form of a JSON value.
pub fn freeze(value: &Value) -> Frozen {
    match value {
        Value::Null => Frozen::Null,
        Value::Bool(b) => Frozen::Bool(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Frozen::Int(i)
            } else if let Some(u) = n.as_u64() {
                Frozen::UInt(u)
            } else {
                Frozen::Float(n.as_f64().unwrap_or(0.0))
            }
        }
        Value::String(s) => Frozen::Str(s.clone()),
        Value::Array(items) => Frozen::Seq(items.iter().map(freeze).collect()),
        Value::Object(map) => {
            let mut entries: Vec<(String, Frozen)> = map
                .iter()
                .map(|(k, v)| (k.clone(), freeze(v)))
                .collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Frozen::Map(entries)
        }
    }
}

/// Incremental SHA-256 over frozen values.
///
/// Every node is fed to the hash as a one-byte type tag followed by a
/// length-delimited payload. The tag keeps values of different types from
/// colliding (integer `1` vs string `"1"`), and the length delimiter keeps
/// adjacent strings from re-associating (`["ab","c"]` vs `["a","bc"]`).
pub struct Hasher {
    inner: Sha256,
}

impl Hasher {
    pub fn new() -> Self {
        Self {
            inner: Sha256::new(),
        }
    }

    /// Fold a frozen value into the digest, depth-first.
    pub fn update(&mut self, value: &Frozen) {
        match value {
            Frozen::Null => self.inner.update(b"z"),
            Frozen::Bool(b) => self.inner.update(if *b { b"b1" } else { b"b0" }),
            Frozen::Int(i) => self.tagged(b'i', i.to_string().as_bytes()),
            Frozen::UInt(u) => self.tagged(b'i', u.to_string().as_bytes()),
            Frozen::Float(x) => self.tagged(b'f', &x.to_bits().to_be_bytes()),
            Frozen::Str(s) => self.tagged(b's', s.as_bytes()),
            Frozen::Seq(items) => {
                self.tagged(b'A', items.len().to_string().as_bytes());
                for item in items {
                    self.update(item);
                }
            }
            Frozen::Map(entries) => {
                self.tagged(b'M', entries.len().to_string().as_bytes());
                for (key, item) in entries {
                    self.tagged(b'k', key.as_bytes());
                    self.update(item);
                }
            }
        }
    }

    /// Fold a bare string into the digest, tagged like a string scalar.
    pub fn update_str(&mut self, s: &str) {
        self.tagged(b's', s.as_bytes());
    }

    /// Finish and render the digest as a fixed-length hex string.
    pub fn finish(self) -> String {
        hex::encode(self.inner.finalize())
    }

    fn tagged(&mut self, tag: u8, payload: &[u8]) {
        self.inner.update([tag]);
        self.inner.update(payload.len().to_string().as_bytes());
        self.inner.update(b":");
        self.inner.update(payload);
    }
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

/// Digest of a single frozen value.
pub fn digest(frozen: &Frozen) -> String {
    let mut hasher = Hasher::new();
    hasher.update(frozen);
    hasher.finish()
}

/// Digest of a JSON value, freezing it first.
pub fn digest_value(value: &Value) -> String {
    digest(&freeze(value))
}
