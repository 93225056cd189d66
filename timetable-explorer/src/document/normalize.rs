//! One-or-many normalization.
//!
//! XML-to-object loaders emit a single object when an element occurs once
//! and an array when it repeats. `OneOrMany` absorbs that ambiguity at the
//! deserialization boundary so the builders only ever see slices.

use serde::Deserialize;

/// A child element that may appear once, many times, or not at all.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    /// Zero or more occurrences. Must stay first: derived structs also
    /// accept JSON arrays.
    Many(Vec<T>),
    /// A single occurrence.
    One(T),
}

impl<T> OneOrMany<T> {
    /// Returns the occurrences as a slice, in document order.
    pub fn as_slice(&self) -> &[T] {
        match self {
            OneOrMany::One(item) => std::slice::from_ref(item),
            OneOrMany::Many(items) => items,
        }
    }

    /// Iterates over the occurrences in document order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// Number of occurrences.
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// Returns true if the element did not occur.
    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    /// Returns the first occurrence, if any.
    pub fn first(&self) -> Option<&T> {
        self.as_slice().first()
    }

    /// Converts into a vector, in document order.
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(item) => vec![item],
            OneOrMany::Many(items) => items,
        }
    }
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

impl<T> From<Vec<T>> for OneOrMany<T> {
    fn from(items: Vec<T>) -> Self {
        OneOrMany::Many(items)
    }
}

impl<'a, T> IntoIterator for &'a OneOrMany<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
