//! Keyword tables and keyword overlays.
//!
//! A keyword table holds the shader-level lines emitted between the editor
//! image and the texture map stages, e.g. `surfaceparm trans` or `cull none`.
//! Multi-valued keywords produce one line per value.

use std::collections::{BTreeMap, BTreeSet};

/// The value side of a keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeywordValue {
    /// Emitted as a bare keyword with no value.
    Bare,
    /// One line per value. A single value is a one-element set.
    Values(BTreeSet<String>),
}

impl KeywordValue {
    /// Build a value set from string slices.
    pub fn values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        KeywordValue::Values(values.into_iter().map(Into::into).collect())
    }

    /// Build a single-valued keyword.
    pub fn single(value: impl Into<String>) -> Self {
        Self::values([value.into()])
    }
}

/// Ordered keyword → value mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordTable {
    entries: BTreeMap<String, KeywordValue>,
}

impl KeywordTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a keyword's value.
    pub fn get(&self, key: &str) -> Option<&KeywordValue> {
        self.entries.get(key)
    }

    /// Check whether a keyword carries a specific value.
    pub fn has_value(&self, key: &str, value: &str) -> bool {
        matches!(self.entries.get(key), Some(KeywordValue::Values(v)) if v.contains(value))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replace a keyword's value entirely.
    pub fn set(&mut self, key: impl Into<String>, value: KeywordValue) {
        self.entries.insert(key.into(), value);
    }

    /// Add a single value to a keyword, creating it if absent.
    pub fn insert_value(&mut self, key: &str, value: impl Into<String>) {
        self.union(key, &KeywordValue::single(value));
    }

    /// Union values into a keyword, creating it if absent.
    ///
    /// A bare addition to an existing keyword leaves it unchanged; adding
    /// values to a bare keyword turns it into a valued one.
    pub fn union(&mut self, key: &str, value: &KeywordValue) {
        let Some(existing) = self.entries.get_mut(key) else {
            self.entries.insert(key.to_string(), value.clone());
            return;
        };

        if let KeywordValue::Values(added) = value {
            match existing {
                KeywordValue::Values(values) => values.extend(added.iter().cloned()),
                KeywordValue::Bare => *existing = KeywordValue::Values(added.clone()),
            }
        }
    }

    /// Remove a keyword, or just some of its values.
    ///
    /// `Bare` removes the keyword regardless of its contents. Values are
    /// subtracted and the keyword is dropped once no values remain.
    pub fn subtract(&mut self, key: &str, value: &KeywordValue) {
        match value {
            KeywordValue::Bare => {
                self.entries.remove(key);
            }
            KeywordValue::Values(removed) => {
                if let Some(KeywordValue::Values(existing)) = self.entries.get_mut(key) {
                    existing.retain(|v| !removed.contains(v));
                    if existing.is_empty() {
                        self.entries.remove(key);
                    }
                }
            }
        }
    }

    /// Drop keywords whose value set is empty.
    pub fn prune_empty(&mut self) {
        self.entries
            .retain(|_, v| !matches!(v, KeywordValue::Values(values) if values.is_empty()));
    }

    /// Iterate keywords in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &KeywordValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Parse emitted keyword lines back into a table.
    ///
    /// Each non-empty line is `key` or `key value`; repeated keys collect
    /// their values.
    pub fn parse_lines(text: &str) -> Self {
        let mut table = Self::new();

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            match line.split_once(char::is_whitespace) {
                Some((key, value)) => table.insert_value(key, value.trim()),
                None => table.union(line, &KeywordValue::Bare),
            }
        }

        table
    }
}

/// Keyword changes requested by option files, applied on top of the
/// keywords derived from shader metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordOverlay {
    /// `[keywords]`: full replacement per key.
    pub set: BTreeMap<String, KeywordValue>,
    /// `[addKeywords]`: union per key.
    pub add: BTreeMap<String, KeywordValue>,
    /// `[delKeywords]`: subtraction per key, `Bare` deletes the key.
    pub remove: BTreeMap<String, KeywordValue>,
}

impl KeywordOverlay {
    /// Record a `[keywords]` entry. A later entry for the same key wins.
    pub fn replace(&mut self, key: &str, value: KeywordValue) {
        self.set.insert(key.to_string(), value);
    }

    /// Record an `[addKeywords]` entry, merging with earlier ones.
    pub fn extend(&mut self, key: &str, value: KeywordValue) {
        merge_value(&mut self.add, key, value);
    }

    /// Record a `[delKeywords]` entry.
    ///
    /// A bare key marks the whole keyword for removal; values merge into the
    /// set of values to remove.
    pub fn delete(&mut self, key: &str, value: KeywordValue) {
        match value {
            KeywordValue::Bare => {
                self.remove.insert(key.to_string(), KeywordValue::Bare);
            }
            values => {
                if self.remove.get(key) != Some(&KeywordValue::Bare) {
                    merge_value(&mut self.remove, key, values);
                }
            }
        }
    }

    /// Apply the overlay to a table: replace, then add, then delete.
    pub fn apply(&self, table: &mut KeywordTable) {
        for (key, value) in &self.set {
            table.set(key.clone(), value.clone());
        }

        for (key, value) in &self.add {
            table.union(key, value);
        }

        for (key, value) in &self.remove {
            table.subtract(key, value);
        }

        table.prune_empty();
    }
}

fn merge_value(map: &mut BTreeMap<String, KeywordValue>, key: &str, value: KeywordValue) {
    let Some(existing) = map.get_mut(key) else {
        map.insert(key.to_string(), value);
        return;
    };

    if let KeywordValue::Values(added) = value {
        match existing {
            KeywordValue::Values(values) => values.extend(added),
            KeywordValue::Bare => *existing = KeywordValue::Values(added),
        }
    }
}
