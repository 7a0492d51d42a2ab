//! Ordered field declarations.

use super::FieldSpec;

/// Ordered set of field declarations keyed by output name.
///
/// Declaration order is the order in which fields are resolved and in which
/// failures are reported.
#[derive(Debug, Clone, Default)]
#[must_use]
pub struct Schema {
    fields: Vec<(String, FieldSpec)>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares `key`. Re-declaring a key replaces it in place.
    pub fn field(mut self, key: impl Into<String>, spec: FieldSpec) -> Self {
        self.insert(key, spec);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, spec: FieldSpec) {
        let key = key.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = spec,
            None => self.fields.push((key, spec)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, spec)| spec)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldSpec)> {
        self.fields.iter().map(|(k, spec)| (k.as_str(), spec))
    }
}

impl<K: Into<String>> FromIterator<(K, FieldSpec)> for Schema {
    fn from_iter<I: IntoIterator<Item = (K, FieldSpec)>>(iter: I) -> Self {
        let mut schema = Schema::new();
        for (key, spec) in iter {
            schema.insert(key, spec);
        }
        schema
    }
}
