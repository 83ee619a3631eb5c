//! Keyed reference tables with a fallback row
//!
//! Every reference table is keyed by a category (soil texture, crop name,
//! variety) and carries a documented fallback key. A lookup for an absent key
//! transparently returns the fallback row; only a missing fallback is an error.

use log::debug;

use crate::error::{AgronomyError, Result};

/// A table row that can be addressed by key
pub trait Keyed {
    fn key(&self) -> &str;
}

/// Rows of one reference table, read-only after construction
#[derive(Debug, Clone)]
pub struct KeyedTable<T> {
    name: &'static str,
    fallback: String,
    rows: Vec<T>,
}

impl<T: Keyed> KeyedTable<T> {
    /// Create a table with the given fallback key
    pub fn new(name: &'static str, fallback: impl Into<String>, rows: Vec<T>) -> Self {
        Self {
            name,
            fallback: fallback.into(),
            rows,
        }
    }

    /// First row for `key`, or the fallback row when `key` is absent
    pub fn lookup(&self, key: &str) -> Result<&T> {
        if let Some(row) = self.rows.iter().find(|r| r.key() == key) {
            return Ok(row);
        }
        debug!("{}: no row for '{}', using fallback '{}'", self.name, key, self.fallback);
        self.rows
            .iter()
            .find(|r| r.key() == self.fallback)
            .ok_or_else(|| self.miss(key))
    }

    /// All rows for `key`, or all fallback rows when `key` has none
    pub fn lookup_all(&self, key: &str) -> Result<Vec<&T>> {
        let rows: Vec<&T> = self.rows.iter().filter(|r| r.key() == key).collect();
        if !rows.is_empty() {
            return Ok(rows);
        }
        debug!("{}: no rows for '{}', using fallback '{}'", self.name, key, self.fallback);
        let rows: Vec<&T> = self.rows.iter().filter(|r| r.key() == self.fallback).collect();
        if rows.is_empty() {
            return Err(self.miss(key));
        }
        Ok(rows)
    }

    fn miss(&self, key: &str) -> AgronomyError {
        AgronomyError::LookupMiss {
            table: self.name,
            key: key.to_string(),
            fallback: self.fallback.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Row(&'static str, u32);

    impl Keyed for Row {
        fn key(&self) -> &str {
            self.0
        }
    }

    fn table() -> KeyedTable<Row> {
        KeyedTable::new(
            "test",
            "General",
            vec![Row("maize", 1), Row("maize", 2), Row("General", 9), Row("wheat", 3)],
        )
    }

    #[test]
    fn test_lookup_exact_returns_first_row() {
        assert_eq!(table().lookup("maize").unwrap(), &Row("maize", 1));
    }

    #[test]
    fn test_lookup_unknown_matches_fallback() {
        let t = table();
        assert_eq!(t.lookup("sorghum").unwrap(), t.lookup("General").unwrap());
    }

    #[test]
    fn test_lookup_all() {
        let t = table();
        assert_eq!(t.lookup_all("maize").unwrap().len(), 2);
        assert_eq!(t.lookup_all("rice").unwrap(), vec![&Row("General", 9)]);
    }

    #[test]
    fn test_missing_fallback_is_lookup_miss() {
        let t = KeyedTable::new("test", "General", vec![Row("maize", 1)]);
        let err = t.lookup("rice").unwrap_err();
        assert!(err.is_lookup_miss());
        assert!(t.lookup_all("rice").is_err());
    }

    #[test]
    fn test_key_match_is_exact() {
        let t = table();
        assert_eq!(t.lookup("Maize").unwrap(), &Row("General", 9));
    }
}
