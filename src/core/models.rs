//! Core data models for extracted records.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key holding the nested HTTP header mapping.
pub const HEADERS_KEY: &str = "headers";

/// Key holding the trimmed user-agent string.
pub const USERAGENT_KEY: &str = "useragent";

/// A flat mapping of extracted fields for one message.
///
/// Keys keep their first-insertion order. Geolocation keys sit at the top
/// level next to `useragent`; request headers live in a nested mapping under
/// [`HEADERS_KEY`].
///
/// ```
/// use canaryfetch::core::Record;
/// use serde_json::json;
///
/// let mut record = Record::new();
/// record.insert("ip", json!("1.2.3.4"));
/// record.insert("loc", json!("10,20"));
/// assert!(record.contains_key("ip"));
/// assert_eq!(record.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

/// Ordered collection of accepted records, oldest message first.
pub type Dataset = Vec<Record>;

impl Record {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value, overwriting any previous value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    /// Returns the nested header mapping, if any.
    pub fn headers(&self) -> Option<&Map<String, Value>> {
        self.0.get(HEADERS_KEY).and_then(Value::as_object)
    }

    /// Merges every entry of `other` into `self`.
    ///
    /// Plain keys are last-write-wins. When both sides hold a header mapping
    /// the headers are merged key by key instead of replaced.
    pub fn merge(&mut self, other: Record) {
        for (key, value) in other.0 {
            if key == HEADERS_KEY {
                if let (Some(Value::Object(existing)), Value::Object(incoming)) =
                    (self.0.get_mut(HEADERS_KEY), &value)
                {
                    for (name, header) in incoming {
                        existing.insert(name.clone(), header.clone());
                    }
                    continue;
                }
            }
            self.0.insert(key, value);
        }
    }

    /// Flattens nested mappings into dotted keys.
    ///
    /// Non-object values are kept as-is; an empty nested mapping contributes
    /// no columns at all.
    ///
    /// ```
    /// use canaryfetch::core::Record;
    /// use serde_json::json;
    ///
    /// let mut record = Record::new();
    /// record.insert("ip", json!("1.2.3.4"));
    /// record.insert("headers", json!({"Host": "example.com"}));
    ///
    /// let flat: Vec<String> = record.flatten(".").into_iter().map(|(k, _)| k).collect();
    /// assert_eq!(flat, vec!["ip", "headers.Host"]);
    /// ```
    pub fn flatten(&self, separator: &str) -> Vec<(String, &Value)> {
        let mut out = Vec::with_capacity(self.0.len());
        flatten_into(&self.0, None, separator, &mut out);
        out
    }
}

fn flatten_into<'a>(
    map: &'a Map<String, Value>,
    prefix: Option<&str>,
    separator: &str,
    out: &mut Vec<(String, &'a Value)>,
) {
    for (key, value) in map {
        let column = match prefix {
            Some(p) => format!("{p}{separator}{key}"),
            None => key.clone(),
        };
        match value {
            Value::Object(nested) => flatten_into(nested, Some(&column), separator, out),
            other => out.push((column, other)),
        }
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Configuration for output format.
///
/// Controls how records are laid out in the CSV export.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// CSV field delimiter (default: `,`)
    pub delimiter: u8,
    /// Separator joining nested keys into column names (default: `.`)
    pub separator: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            separator: ".".to_string(),
        }
    }
}

impl OutputConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    #[must_use]
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }
}
