//! Per-block output of declaration parsing.

use std::collections::HashMap;
use std::collections::hash_map::Iter;

use css_values_units::Value;

use crate::id::PropertyId;

/// Where a declaration came from.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    /// Style sheet path or other origin label; empty when unknown.
    pub file: String,
    /// 1-based line number; 0 when unknown.
    pub line: u32,
}

impl SourceLocation {
    pub fn new(file: &str, line: u32) -> Self {
        Self {
            file: file.to_owned(),
            line,
        }
    }
}

/// A resolved property value and its provenance.
#[derive(Clone, Debug, PartialEq)]
pub struct Property {
    pub value: Value,
    pub source: SourceLocation,
}

/// Resolved values keyed by property id, filled by declaration parsing for one block.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PropertyDictionary {
    properties: HashMap<PropertyId, Property>,
}

impl PropertyDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the value for `id`.
    pub fn set_property(&mut self, id: PropertyId, value: Value, source: SourceLocation) {
        self.properties.insert(id, Property { value, source });
    }

    /// Remove and return the value for `id`.
    pub fn remove_property(&mut self, id: PropertyId) -> Option<Property> {
        self.properties.remove(&id)
    }

    #[inline]
    pub fn property(&self, id: PropertyId) -> Option<&Property> {
        self.properties.get(&id)
    }

    /// The value for `id` without its provenance.
    #[inline]
    pub fn value(&self, id: PropertyId) -> Option<&Value> {
        self.properties.get(&id).map(|property| &property.value)
    }

    #[inline]
    pub fn contains(&self, id: PropertyId) -> bool {
        self.properties.contains_key(&id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, PropertyId, Property> {
        self.properties.iter()
    }

    /// Copy every entry of `other` into this dictionary, overwriting existing entries.
    pub fn merge(&mut self, other: &Self) {
        self.properties.extend(
            other
                .properties
                .iter()
                .map(|(id, property)| (*id, property.clone())),
        );
    }
}

impl<'dict> IntoIterator for &'dict PropertyDictionary {
    type Item = (&'dict PropertyId, &'dict Property);
    type IntoIter = Iter<'dict, PropertyId, Property>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Extend<(PropertyId, Property)> for PropertyDictionary {
    fn extend<I: IntoIterator<Item = (PropertyId, Property)>>(&mut self, iter: I) {
        self.properties.extend(iter);
    }
}
