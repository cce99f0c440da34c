//! Field store: name → typed value
//!
//! Last write wins; urutan field tidak punya makna.

use std::collections::hash_map;
use std::collections::HashMap;

use super::coerce::FromValue;
use super::value::Value;
use crate::error::{MapMessageError, Result};

/// Nama field wajib tidak kosong dan tidak hanya whitespace.
#[inline]
pub(crate) fn check_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(MapMessageError::InvalidName);
    }
    Ok(())
}

/// Value store untuk body map message
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldStore {
    fields: HashMap<String, Value>,
}

impl FieldStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: HashMap::with_capacity(capacity),
        }
    }

    /// Baca field dengan coercion ke `T`.
    ///
    /// Field yang tidak ada menghasilkan `T::missing()`.
    pub fn get<T: FromValue>(&self, name: &str) -> Result<T> {
        check_name(name)?;

        match self.fields.get(name) {
            None => Ok(T::missing()),
            Some(value) => {
                T::from_value(value).map_err(|source| MapMessageError::FormatMismatch {
                    name: name.to_owned(),
                    source,
                })
            }
        }
    }

    /// Nilai mentah tanpa coercion.
    pub fn get_value(&self, name: &str) -> Result<Option<&Value>> {
        check_name(name)?;
        Ok(self.fields.get(name))
    }

    /// Insert atau overwrite, nilai disimpan persis (tanpa coercion).
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        check_name(name)?;
        self.fields.insert(name.to_owned(), value.into());
        Ok(())
    }

    pub fn exists(&self, name: &str) -> Result<bool> {
        check_name(name)?;
        Ok(self.fields.contains_key(name))
    }

    /// Snapshot nama field saat ini.
    pub fn names(&self) -> MapNames {
        let mut names: Vec<String> = self.fields.keys().cloned().collect();
        names.sort_unstable();
        MapNames { names }
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn clear(&mut self) {
        self.fields.clear();
    }

    pub fn iter(&self) -> hash_map::Iter<'_, String, Value> {
        self.fields.iter()
    }

    /// Insert dari decoder; nama sudah divalidasi di sana.
    ///
    /// Returns `false` jika nama sudah ada (nilai lama dipertahankan).
    pub(crate) fn insert_new(&mut self, name: String, value: Value) -> bool {
        match self.fields.entry(name) {
            hash_map::Entry::Occupied(_) => false,
            hash_map::Entry::Vacant(slot) => {
                slot.insert(value);
                true
            }
        }
    }
}

impl TryFrom<HashMap<String, Value>> for FieldStore {
    type Error = MapMessageError;

    fn try_from(fields: HashMap<String, Value>) -> Result<Self> {
        for name in fields.keys() {
            check_name(name)?;
        }
        Ok(Self { fields })
    }
}

impl<'a> IntoIterator for &'a FieldStore {
    type Item = (&'a String, &'a Value);
    type IntoIter = hash_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

/// Snapshot immutable dari nama-nama field.
///
/// Tidak terpengaruh mutasi store setelah snapshot dibuat. Bisa diiterasi
/// ulang (lewat `iter()` atau `clone()`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapNames {
    names: Vec<String>,
}

impl MapNames {
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.names.iter()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl IntoIterator for MapNames {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.names.into_iter()
    }
}

impl<'a> IntoIterator for &'a MapNames {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.names.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_write_wins() {
        let mut store = FieldStore::new();
        store.set("k", 1i32).unwrap();
        store.set("k", "two").unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get_value("k").unwrap(), Some(&Value::from("two")));
    }

    #[test]
    fn test_get_reports_field_name() {
        let mut store = FieldStore::new();
        store.set("s", "abc").unwrap();

        match store.get::<i32>("s") {
            Err(MapMessageError::FormatMismatch { name, .. }) => assert_eq!(name, "s"),
            other => panic!("expected FormatMismatch, got {other:?}"),
        }
        // Nilai tersimpan tidak berubah setelah coercion gagal
        assert_eq!(store.get::<Option<String>>("s").unwrap().as_deref(), Some("abc"));
    }

    #[test]
    fn test_blank_names_rejected() {
        let mut store = FieldStore::new();
        assert_eq!(store.set("", 1i32), Err(MapMessageError::InvalidName));
        assert_eq!(store.set(" \t", 1i32), Err(MapMessageError::InvalidName));
        assert_eq!(store.get::<i32>("  "), Err(MapMessageError::InvalidName));
        assert_eq!(store.exists(""), Err(MapMessageError::InvalidName));
        assert!(store.is_empty());
    }

    #[test]
    fn test_names_snapshot_is_detached() {
        let mut store = FieldStore::new();
        store.set("a", 1i32).unwrap();
        store.set("b", 2i32).unwrap();

        let snapshot = store.names();
        store.set("c", 3i32).unwrap();
        store.clear();

        assert_eq!(snapshot.len(), 2);
        let first: Vec<_> = snapshot.iter().cloned().collect();
        let second: Vec<_> = snapshot.clone().into_iter().collect();
        assert_eq!(first, vec!["a", "b"]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_try_from_map_validates_names() {
        let mut map = HashMap::new();
        map.insert("ok".to_string(), Value::Int(1));
        assert!(FieldStore::try_from(map.clone()).is_ok());

        map.insert(" ".to_string(), Value::Int(2));
        assert_eq!(FieldStore::try_from(map), Err(MapMessageError::InvalidName));
    }
}
