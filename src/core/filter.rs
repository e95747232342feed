//! Filter records by the presence of required keys.
//!
//! This module provides [`FilterConfig`] for defining which keys a record
//! must carry and [`apply_filters`] for filtering record collections.
//!
//! By default a record is kept only when it has both `ip` and `loc`, i.e. the
//! message carried usable geolocation. Values are never inspected; presence
//! is enough.
//!
//! # Examples
//!
//! ```
//! use canaryfetch::core::filter::{FilterConfig, accept, apply_filters};
//! use canaryfetch::core::Record;
//! use serde_json::json;
//!
//! let mut geo = Record::new();
//! geo.insert("ip", json!("1.2.3.4"));
//! geo.insert("loc", json!("10,20"));
//!
//! let mut ua_only = Record::new();
//! ua_only.insert("useragent", json!("curl/8.0"));
//!
//! assert!(accept(&geo));
//! assert!(!accept(&ua_only));
//!
//! let kept = apply_filters(vec![ua_only, geo], &FilterConfig::new());
//! assert_eq!(kept.len(), 1);
//! ```

use crate::core::models::Record;

/// Keys a record needs by default.
pub const DEFAULT_REQUIRED_KEYS: [&str; 2] = ["ip", "loc"];

/// Configuration for filtering records.
///
/// A record must contain every required key to pass.
#[derive(Debug, Clone)]
pub struct FilterConfig {
    /// Keys that must be present at the top level of a record.
    pub required_keys: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            required_keys: DEFAULT_REQUIRED_KEYS.iter().map(|k| k.to_string()).collect(),
        }
    }
}

impl FilterConfig {
    /// Creates the default configuration (`ip` and `loc` required).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration that accepts every record.
    pub fn accept_all() -> Self {
        Self {
            required_keys: Vec::new(),
        }
    }

    /// Adds a required key.
    ///
    /// ```
    /// use canaryfetch::core::filter::FilterConfig;
    ///
    /// let config = FilterConfig::new().with_required_key("useragent");
    /// assert_eq!(config.required_keys, vec!["ip", "loc", "useragent"]);
    /// ```
    #[must_use]
    pub fn with_required_key(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        if !self.required_keys.contains(&key) {
            self.required_keys.push(key);
        }
        self
    }

    /// Returns `true` if at least one key is required.
    pub fn is_active(&self) -> bool {
        !self.required_keys.is_empty()
    }

    /// Checks a single record against the configuration.
    pub fn matches(&self, record: &Record) -> bool {
        self.required_keys.iter().all(|key| record.contains_key(key))
    }
}

/// Returns `true` if the record has both `ip` and `loc`.
pub fn accept(record: &Record) -> bool {
    DEFAULT_REQUIRED_KEYS
        .iter()
        .all(|key| record.contains_key(key))
}

/// Keeps the records that match `config`, preserving order.
pub fn apply_filters(records: Vec<Record>, config: &FilterConfig) -> Vec<Record> {
    if !config.is_active() {
        return records;
    }

    records
        .into_iter()
        .filter(|record| config.matches(record))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record_with(keys: &[&str]) -> Record {
        keys.iter()
            .map(|k| (k.to_string(), json!("x")))
            .collect()
    }

    #[test]
    fn test_accept_truth_table() {
        assert!(!accept(&record_with(&[])));
        assert!(!accept(&record_with(&["ip"])));
        assert!(!accept(&record_with(&["loc"])));
        assert!(accept(&record_with(&["ip", "loc"])));
    }

    #[test]
    fn test_accept_ignores_values() {
        let mut record = Record::new();
        record.insert("ip", json!(null));
        record.insert("loc", json!(""));
        assert!(accept(&record));
    }

    #[test]
    fn test_accept_requires_top_level_keys() {
        let mut record = Record::new();
        record.insert("headers", json!({"ip": "1.2.3.4", "loc": "1,2"}));
        assert!(!accept(&record));
    }

    #[test]
    fn test_default_config_matches_accept() {
        let config = FilterConfig::default();
        let cases: [&[&str]; 5] = [&[], &["ip"], &["loc"], &["ip", "loc"], &["ip", "loc", "city"]];
        for keys in cases {
            let record = record_with(keys);
            assert_eq!(config.matches(&record), accept(&record), "{keys:?}");
        }
    }

    #[test]
    fn test_apply_filters_preserves_order() {
        let records = vec![
            record_with(&["ip", "loc", "first"]),
            record_with(&["ip"]),
            record_with(&["ip", "loc", "second"]),
            record_with(&["useragent"]),
        ];

        let kept = apply_filters(records, &FilterConfig::new());
        assert_eq!(kept.len(), 2);
        assert!(kept[0].contains_key("first"));
        assert!(kept[1].contains_key("second"));
    }

    #[test]
    fn test_accept_all() {
        let records = vec![record_with(&[]), record_with(&["ip"])];
        let config = FilterConfig::accept_all();
        assert!(!config.is_active());
        assert_eq!(apply_filters(records, &config).len(), 2);
    }

    #[test]
    fn test_with_required_key_no_duplicates() {
        let config = FilterConfig::new().with_required_key("ip");
        assert_eq!(config.required_keys.len(), 2);
    }
}
