//! The result of a comparison: discrepancies keyed by dotted path.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

/// The two sides of one discrepancy. At most one side is absent; when both
/// are present they are unequal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiffEntry {
    /// Value in the reference document, `None` if the key is missing there.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<Value>,
    /// Value in the sample document, `None` if the key is missing there.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample: Option<Value>,
}

impl DiffEntry {
    pub fn only_in_reference(value: Value) -> Self {
        Self { reference: Some(value), sample: None }
    }

    pub fn only_in_sample(value: Value) -> Self {
        Self { reference: None, sample: Some(value) }
    }

    pub fn changed(reference: Value, sample: Value) -> Self {
        Self { reference: Some(reference), sample: Some(sample) }
    }

    /// Both sides present, with different values.
    pub fn is_changed(&self) -> bool {
        self.reference.is_some() && self.sample.is_some()
    }

    /// Returns the same discrepancy seen from the other document.
    pub fn swapped(self) -> Self {
        Self { reference: self.sample, sample: self.reference }
    }
}

/// Discrepancies in discovery order, one entry per dotted path.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DiffSet(IndexMap<String, DiffEntry>);

impl DiffSet {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Records `entry` under `path` unless the path is already taken. Returns
    /// false when the path was already present.
    pub(crate) fn insert(&mut self, path: String, entry: DiffEntry) -> bool {
        match self.0.entry(path) {
            indexmap::map::Entry::Occupied(_) => false,
            indexmap::map::Entry::Vacant(slot) => {
                slot.insert(entry);
                true
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, path: &str) -> Option<&DiffEntry> {
        self.0.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.0.contains_key(path)
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, DiffEntry> {
        self.0.iter()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Number of keys present only in the reference document.
    pub fn missing_in_sample(&self) -> usize {
        self.0.values().filter(|e| e.sample.is_none()).count()
    }

    /// Number of keys present only in the sample document.
    pub fn missing_in_reference(&self) -> usize {
        self.0.values().filter(|e| e.reference.is_none()).count()
    }

    /// Number of keys present on both sides with different values.
    pub fn changed(&self) -> usize {
        self.0.values().filter(|e| e.is_changed()).count()
    }
}

impl<'a> IntoIterator for &'a DiffSet {
    type Item = (&'a String, &'a DiffEntry);
    type IntoIter = indexmap::map::Iter<'a, String, DiffEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for DiffSet {
    type Item = (String, DiffEntry);
    type IntoIter = indexmap::map::IntoIter<String, DiffEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn first_insert_wins() {
        let mut set = DiffSet::new();
        assert!(set.insert("a.b".into(), DiffEntry::changed(json!(1), json!(2))));
        assert!(!set.insert("a.b".into(), DiffEntry::only_in_sample(json!(3))));

        assert_eq!(set.len(), 1);
        assert_eq!(set.get("a.b"), Some(&DiffEntry::changed(json!(1), json!(2))));
    }

    #[test]
    fn counts_by_kind() {
        let mut set = DiffSet::new();
        set.insert("port".into(), DiffEntry::changed(json!(8080), json!(8081)));
        set.insert("debug".into(), DiffEntry::only_in_reference(json!(true)));
        set.insert("tls".into(), DiffEntry::only_in_sample(json!({"enabled": false})));
        set.insert("name".into(), DiffEntry::only_in_sample(json!(null)));

        assert_eq!(set.changed(), 1);
        assert_eq!(set.missing_in_sample(), 1);
        assert_eq!(set.missing_in_reference(), 2);
        assert_eq!(set.paths().collect::<Vec<_>>(), ["port", "debug", "tls", "name"]);
    }

    #[test]
    fn absent_side_is_not_null() {
        let mut set = DiffSet::new();
        set.insert("name".into(), DiffEntry::only_in_sample(json!(null)));
        set.insert("port".into(), DiffEntry::changed(json!(1), json!(2)));

        insta::assert_json_snapshot!(set, @r###"
        {
          "name": {
            "sample": null
          },
          "port": {
            "reference": 1,
            "sample": 2
          }
        }
        "###);
    }
}
