use std::collections::{BTreeMap, BTreeSet};

/// Case-insensitive ordered map. Keys compare by their uppercased form;
/// the originally registered spelling is preserved for iteration.
#[derive(Debug, Default)]
pub struct CaseMap<V> {
    inner: BTreeMap<String, (String, V)>,
}

impl<V> CaseMap<V> {
    pub fn new() -> Self {
        Self {
            inner: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, name: &str, value: V) {
        self.inner
            .insert(name.to_ascii_uppercase(), (name.to_string(), value));
    }

    pub fn get(&self, name: &str) -> Option<&V> {
        self.inner.get(&name.to_ascii_uppercase()).map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains_key(&name.to_ascii_uppercase())
    }

    /// Iterate `(registered_name, value)` in case-folded order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.inner.values().map(|(name, v)| (name.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

/// Case-insensitive ordered set of names.
#[derive(Debug, Default)]
pub struct CaseSet {
    inner: BTreeSet<String>,
}

impl CaseSet {
    pub fn new() -> Self {
        Self {
            inner: BTreeSet::new(),
        }
    }

    pub fn insert(&mut self, name: &str) {
        self.inner.insert(name.to_ascii_uppercase());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains(&name.to_ascii_uppercase())
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
