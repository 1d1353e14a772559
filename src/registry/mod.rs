//! Named sets of generated shaders.
//!
//! A set is the output namespace of one source directory, or of several
//! directories merged under an explicit root name. Shaders are stored by
//! name and always iterated in name order.
//!
//! # Example
//!
//! ```ignore
//! use sloth::registry::ShaderRegistry;
//!
//! let mut registry = ShaderRegistry::new();
//! registry.set_mut("textures/metal").insert(record);
//!
//! for (set_name, set) in registry.iter() {
//!     println!("{}: {} shaders", set_name, set.len());
//! }
//! ```

use std::collections::BTreeMap;

use crate::types::ShaderRecord;

/// Shaders of one set, keyed by shader name.
#[derive(Debug, Clone, Default)]
pub struct ShaderSet {
    shaders: BTreeMap<String, ShaderRecord>,
}

impl ShaderSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a shader under its own name.
    ///
    /// Returns the record it replaced, if any.
    pub fn insert(&mut self, record: ShaderRecord) -> Option<ShaderRecord> {
        self.shaders.insert(record.name.clone(), record)
    }

    /// Get a shader by name.
    pub fn get(&self, name: &str) -> Option<&ShaderRecord> {
        self.shaders.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.shaders.contains_key(name)
    }

    /// Shader names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.shaders.keys().map(|s| s.as_str())
    }

    /// Shaders in name order.
    pub fn shaders(&self) -> impl Iterator<Item = &ShaderRecord> {
        self.shaders.values()
    }

    pub fn len(&self) -> usize {
        self.shaders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shaders.is_empty()
    }
}

/// All generated sets, keyed by set name.
#[derive(Debug, Clone, Default)]
pub struct ShaderRegistry {
    sets: BTreeMap<String, ShaderSet>,
}

impl ShaderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a set by name.
    pub fn get(&self, name: &str) -> Option<&ShaderSet> {
        self.sets.get(name)
    }

    /// Get a set by name, creating it if it doesn't exist.
    pub fn set_mut(&mut self, name: &str) -> &mut ShaderSet {
        self.sets.entry(name.to_string()).or_default()
    }

    /// Look up one shader.
    pub fn shader(&self, set: &str, name: &str) -> Option<&ShaderRecord> {
        self.sets.get(set).and_then(|s| s.get(name))
    }

    /// Set names in order.
    pub fn set_names(&self) -> impl Iterator<Item = &str> {
        self.sets.keys().map(|s| s.as_str())
    }

    /// Sets in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ShaderSet)> {
        self.sets.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Total number of shaders across all sets.
    pub fn shader_count(&self) -> usize {
        self.sets.values().map(ShaderSet::len).sum()
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}
