//! The decrypted account index.

use std::collections::btree_map;
use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::id::AccountId;

/// Mapping from identifier to an opaque JSON record.
///
/// Serializes as a plain JSON object keyed by identifier. Stored entries whose
/// key is not a valid [`AccountId`] are kept aside, untouched, and written back
/// with the rest; they are not reachable through the accessors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VaultIndex {
    accounts: BTreeMap<AccountId, Value>,
    unrecognized: BTreeMap<String, Value>,
}

impl VaultIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn contains(&self, id: &AccountId) -> bool {
        self.accounts.contains_key(id)
    }

    pub fn get(&self, id: &AccountId) -> Option<&Value> {
        self.accounts.get(id)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, AccountId, Value> {
        self.accounts.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &AccountId> {
        self.accounts.keys()
    }

    /// Number of stored entries whose keys are not valid identifiers.
    pub fn unrecognized_len(&self) -> usize {
        self.unrecognized.len()
    }

    pub(crate) fn insert(&mut self, id: AccountId, record: Value) -> Option<Value> {
        self.accounts.insert(id, record)
    }
}

impl Serialize for VaultIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = self.accounts.len() + self.unrecognized.len();
        let mut map = serializer.serialize_map(Some(len))?;
        for (id, record) in &self.accounts {
            map.serialize_entry(id.as_str(), record)?;
        }
        for (key, record) in &self.unrecognized {
            map.serialize_entry(key, record)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for VaultIndex {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, Value>::deserialize(deserializer)?;
        let mut index = VaultIndex::new();
        for (key, record) in raw {
            match key.parse::<AccountId>() {
                Ok(id) => {
                    index.accounts.insert(id, record);
                }
                Err(_) => {
                    index.unrecognized.insert(key, record);
                }
            }
        }
        Ok(index)
    }
}

impl<'a> IntoIterator for &'a VaultIndex {
    type Item = (&'a AccountId, &'a Value);
    type IntoIter = btree_map::Iter<'a, AccountId, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// How the cached index came to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexStatus {
    /// Decrypted and parsed from the stored blob.
    Loaded,
    /// No blob was stored yet; started empty.
    NotFound,
    /// A blob was stored but could not be read; started empty.
    Corrupt(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serializes_as_plain_object() {
        let mut index = VaultIndex::new();
        let id: AccountId = "abcd1234".parse().unwrap();
        index.insert(id, json!({"name": "github"}));

        let text = serde_json::to_string(&index).unwrap();
        assert_eq!(text, r#"{"abcd1234":{"name":"github"}}"#);

        let parsed: VaultIndex = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, index);
    }

    #[test]
    fn test_empty_object_parses_to_empty_index() {
        let parsed: VaultIndex = serde_json::from_str("{}").unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_nonconforming_keys_are_kept_aside() {
        let parsed: VaultIndex =
            serde_json::from_str(r#"{"BAD":{"name":"legacy"},"abcd1234":{"name":"github"}}"#)
                .unwrap();

        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed.unrecognized_len(), 1);
        let id: AccountId = "abcd1234".parse().unwrap();
        assert_eq!(parsed.get(&id), Some(&json!({"name": "github"})));
        assert_eq!(parsed.ids().count(), 1);

        let written: Value = serde_json::to_value(&parsed).unwrap();
        assert_eq!(written["BAD"], json!({"name": "legacy"}));
        assert_eq!(written["abcd1234"], json!({"name": "github"}));
    }

    #[test]
    fn test_non_object_index_is_rejected() {
        assert!(serde_json::from_str::<VaultIndex>("[1,2]").is_err());
    }
}
