//! Engine tunables, owned by the caller and passed in at construction.

/// Settings for the form engine.
///
/// There is no global configuration; whoever wires up a
/// [`FormCache`][crate::FormCache] owns one of these.
#[derive(Clone, Debug, PartialEq)]
pub struct FormSettings {
    /// Maximum number of compiled templates the cache holds before the
    /// least-recently-used entry is evicted.
    pub cache_size: usize,
    /// Minimum length, in characters, an optional text answer must exceed
    /// before it counts as content a human should review.
    pub text_field_min_length: usize,
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            cache_size: 128,
            text_field_min_length: 2,
        }
    }
}
