//! Series catalog configuration.
//!
//! The set of known series keys and their display names is data injected
//! into the engine, not global state; adding a series is a configuration
//! change.

/// Immutable mapping from series key to display name.
#[derive(Debug, Clone, Default)]
pub struct SeriesCatalog {
    entries: Vec<(String, String)>,
}

impl SeriesCatalog {
    /// Build a catalog from `(key, display name)` pairs.
    pub fn from_entries<K, N, I>(entries: I) -> Self
    where
        K: Into<String>,
        N: Into<String>,
        I: IntoIterator<Item = (K, N)>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, n)| (k.into(), n.into()))
                .collect(),
        }
    }

    /// Check whether `key` names a known series.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Display name for `key`, if known.
    pub fn display_name(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, name)| name.as_str())
    }

    /// All known keys, in catalog order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Number of configured series.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
