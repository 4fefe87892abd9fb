use std::fmt;

use indexmap::IndexMap;
use serde::{de::{MapAccess, Visitor}, ser::SerializeMap, Deserialize, Deserializer, Serialize, Serializer};

/// A multi block never shows more than this many entries.
pub const MAX_MULTI_BLOCK_ENTRIES: usize = 5;

/// Label to occurrence count, e.g. port -> times seen open.
///
/// Entries keep the order they were retrieved in. Inserting an existing label
/// overwrites its count in place, the way a JSON object with a repeated key reads.
#[derive(Debug, Clone, Default)]
pub struct FrequencyMap {
    entries: IndexMap<String, i64>,
}

impl FrequencyMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { entries: IndexMap::with_capacity(capacity) }
    }

    pub fn insert(&mut self, label: impl Into<String>, count: i64) {
        self.entries.insert(label.into(), count);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.entries.iter().map(|(label, count)| (label.as_str(), *count))
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, label: &str) -> Option<i64> {
        self.entries.get(label).copied()
    }

    /// Highest count first. Equal counts keep their retrieval order.
    pub fn sort_highest_first(mut self) -> Self {
        self.entries.sort_by(|_, a, _, b| b.cmp(a));
        self
    }

    pub fn shortify(mut self, max_entries: usize) -> Self {
        self.entries.truncate(max_entries);
        self
    }

    /// Sort by count descending, then keep the top [`MAX_MULTI_BLOCK_ENTRIES`].
    pub fn shape(self) -> Self {
        self.sort_highest_first().shortify(MAX_MULTI_BLOCK_ENTRIES)
    }
}

// Order is part of the value.
impl PartialEq for FrequencyMap {
    fn eq(&self, other: &Self) -> bool {
        self.entries.iter().eq(other.entries.iter())
    }
}

impl Eq for FrequencyMap {}

impl<L: Into<String>> FromIterator<(L, i64)> for FrequencyMap {
    fn from_iter<T: IntoIterator<Item = (L, i64)>>(iter: T) -> Self {
        let mut map = FrequencyMap::new();
        for (label, count) in iter {
            map.insert(label, count);
        }
        map
    }
}

impl Serialize for FrequencyMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, count) in &self.entries {
            map.serialize_entry(label, count)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FrequencyMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(FrequencyMapVisitor)
    }
}

struct FrequencyMapVisitor;

impl<'de> Visitor<'de> for FrequencyMapVisitor {
    type Value = FrequencyMap;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an object mapping labels to integer counts")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut map = FrequencyMap::with_capacity(access.size_hint().unwrap_or(0).min(4096));
        while let Some((label, count)) = access.next_entry::<String, i64>()? {
            map.insert(label, count);
        }
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ports() -> FrequencyMap {
        [("80", 120), ("443", 95), ("22", 10), ("8080", 4), ("21", 2), ("53", 1)].into_iter().collect()
    }

    fn labels(map: &FrequencyMap) -> Vec<&str> {
        map.labels().collect()
    }

    #[test]
    fn shape_keeps_top_five_by_count() {
        let shaped = ports().shape();

        assert_eq!(shaped.len(), 5);
        assert_eq!(labels(&shaped), vec!["80", "443", "22", "8080", "21"]);
        assert_eq!(shaped.get("53"), None);
    }

    #[test]
    fn shape_sorts_short_maps_without_dropping_entries() {
        let map: FrequencyMap = [("ssh", 3), ("http", 40), ("ftp", 7)].into_iter().collect();
        let shaped = map.clone().shape();

        assert_eq!(labels(&shaped), vec!["http", "ftp", "ssh"]);
        for (label, count) in map.iter() {
            assert_eq!(shaped.get(label), Some(count));
        }
    }

    #[test]
    fn shape_breaks_ties_by_retrieval_order() {
        let map: FrequencyMap = [("a", 1), ("b", 5), ("c", 1), ("d", 5), ("e", 1), ("f", 1)].into_iter().collect();

        assert_eq!(labels(&map.shape()), vec!["b", "d", "a", "c", "e"]);
    }

    #[test]
    fn shape_of_empty_map_is_empty() {
        assert!(FrequencyMap::new().shape().is_empty());
    }

    #[test]
    fn shape_is_stable_when_reapplied() {
        let once = ports().shape();
        assert_eq!(once.clone().shape(), once);
    }

    #[test]
    fn deserialize_preserves_object_order() {
        let map: FrequencyMap = serde_json::from_str(r#"{"nginx": 4, "apache": 9, "iis": 1}"#).unwrap();

        assert_eq!(labels(&map), vec!["nginx", "apache", "iis"]);
        assert_eq!(map.get("apache"), Some(9));
    }

    #[test]
    fn deserialize_rejects_non_integer_counts() {
        assert!(serde_json::from_str::<FrequencyMap>(r#"{"80": "many"}"#).is_err());
        assert!(serde_json::from_str::<FrequencyMap>(r#"["80", 3]"#).is_err());
    }

    #[test]
    fn serializes_as_object_in_entry_order() {
        let map: FrequencyMap = [("443", 2), ("80", 7)].into_iter().collect();

        assert_eq!(serde_json::to_string(&map).unwrap(), r#"{"443":2,"80":7}"#);
    }

    #[test]
    fn repeated_label_overwrites_in_place() {
        let map: FrequencyMap = [("x", 1), ("y", 2), ("x", 3)].into_iter().collect();

        assert_eq!(labels(&map), vec!["x", "y"]);
        assert_eq!(map.get("x"), Some(3));
    }

    #[test]
    fn equality_depends_on_order() {
        let forward: FrequencyMap = [("a", 1), ("b", 1)].into_iter().collect();
        let backward: FrequencyMap = [("b", 1), ("a", 1)].into_iter().collect();

        assert_ne!(forward, backward);
        assert_eq!(forward.clone(), forward);
    }

    #[test]
    fn decodes_every_port_of_a_full_scan() {
        let json = format!(
            "{{{}}}",
            (1..=65_535).rev().map(|port| format!("\"{port}\":{}", port % 7)).collect::<Vec<_>>().join(",")
        );

        let map: FrequencyMap = serde_json::from_str(&json).unwrap();

        assert_eq!(map.len(), 65_535);
        assert_eq!(map.labels().next(), Some("65535"));
        assert_eq!(map.get("443"), Some(443 % 7));

        let shaped = map.shape();
        assert_eq!(shaped.labels().collect::<Vec<_>>(), vec!["65533", "65526", "65519", "65512", "65505"]);
    }
}
