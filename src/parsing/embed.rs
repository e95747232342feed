//! Field extraction from bot-posted embeds.
//!
//! Canary bots post one embed per triggered token. The interesting data sits
//! in three named fields:
//!
//! | Field name | Stored as |
//! |------------|-----------|
//! | `UserAgent` | `useragent` string |
//! | `Geo Info` | every key of the JSON object, at the top level |
//! | `Request Headers` | every key of the JSON object, under `headers` |
//!
//! Names are matched case-insensitively. Values are usually wrapped in
//! backticks (inline code or code blocks), which are stripped before parsing.
//! A value that is not a JSON object drops just that field.

use serde_json::{Map, Value};
use tracing::debug;

use crate::core::models::{HEADERS_KEY, Record, USERAGENT_KEY};
use crate::message::Embed;

/// The kinds of embed field the parser understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    UserAgent,
    GeoInfo,
    RequestHeaders,
}

impl FieldKind {
    /// Classifies a field by its (case-insensitive) name.
    ///
    /// ```
    /// use canaryfetch::parsing::embed::FieldKind;
    ///
    /// assert_eq!(FieldKind::from_name("Geo Info"), Some(FieldKind::GeoInfo));
    /// assert_eq!(FieldKind::from_name("USERAGENT"), Some(FieldKind::UserAgent));
    /// assert_eq!(FieldKind::from_name("Token"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "useragent" => Some(FieldKind::UserAgent),
            "geo info" => Some(FieldKind::GeoInfo),
            "request headers" => Some(FieldKind::RequestHeaders),
            _ => None,
        }
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldKind::UserAgent => write!(f, "useragent"),
            FieldKind::GeoInfo => write!(f, "geo info"),
            FieldKind::RequestHeaders => write!(f, "request headers"),
        }
    }
}

/// Result of parsing one embed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    /// The extracted fields.
    pub record: Record,
    /// JSON fields that were present but unusable, in field order.
    pub malformed: Vec<FieldKind>,
}

/// Extracts `useragent`, geolocation and header data from one embed.
///
/// Never fails: malformed JSON just leaves the corresponding keys out.
///
/// ```
/// use canaryfetch::message::Embed;
/// use canaryfetch::parsing::embed::extract_sections;
/// use serde_json::json;
///
/// let embed = Embed::new()
///     .field("Geo Info", r#"`{"ip":"1.2.3.4","loc":"10,20"}`"#)
///     .field("Request Headers", r#"{"Host":"example.com"}"#);
///
/// let record = extract_sections(&embed);
/// assert_eq!(record.get("ip"), Some(&json!("1.2.3.4")));
/// assert_eq!(record.get("headers"), Some(&json!({"Host": "example.com"})));
/// ```
pub fn extract_sections(embed: &Embed) -> Record {
    parse_embed(embed).record
}

/// Like [`extract_sections`], but also reports which JSON fields were dropped.
pub fn parse_embed(embed: &Embed) -> Extraction {
    let mut record = Record::new();
    let mut headers = Map::new();
    let mut malformed = Vec::new();

    for field in &embed.fields {
        let value = field.value();
        if value.is_empty() {
            continue;
        }

        match FieldKind::from_name(field.name()) {
            Some(FieldKind::UserAgent) => {
                record.insert(USERAGENT_KEY, Value::String(strip_code(value).to_string()));
            }
            Some(kind @ FieldKind::GeoInfo) => match parse_json_field(value) {
                Some(geo) => {
                    for (k, v) in geo {
                        record.insert(k, v);
                    }
                }
                None => {
                    debug!(field = %kind, "unusable JSON in embed field");
                    malformed.push(kind);
                }
            },
            Some(kind @ FieldKind::RequestHeaders) => match parse_json_field(value) {
                Some(parsed) => headers.extend(parsed),
                None => {
                    debug!(field = %kind, "unusable JSON in embed field");
                    malformed.push(kind);
                }
            },
            None => {}
        }
    }

    if !headers.is_empty() {
        record.insert(HEADERS_KEY, Value::Object(headers));
    }

    Extraction { record, malformed }
}

/// Strips backtick quoting and whitespace, then parses a JSON object.
///
/// Returns `None` for empty input, invalid JSON, JSON that is not an object,
/// and empty objects.
///
/// ```
/// use canaryfetch::parsing::embed::parse_json_field;
///
/// assert!(parse_json_field(" ```{\"ip\": \"1.2.3.4\"}``` ").is_some());
/// assert!(parse_json_field("{not json").is_none());
/// assert!(parse_json_field("[1, 2]").is_none());
/// assert!(parse_json_field("{}").is_none());
/// ```
pub fn parse_json_field(value: &str) -> Option<Map<String, Value>> {
    if value.is_empty() {
        return None;
    }
    let inner = value.trim().trim_matches('`').trim();
    match serde_json::from_str::<Value>(inner) {
        Ok(Value::Object(map)) if !map.is_empty() => Some(map),
        _ => None,
    }
}

/// Backticks first, then whitespace. A value padded with spaces outside the
/// backticks keeps its backticks.
fn strip_code(value: &str) -> &str {
    value.trim_matches('`').trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::EmbedField;
    use serde_json::json;

    // =========================================================================
    // useragent
    // =========================================================================

    #[test]
    fn test_useragent_stripped() {
        let embed = Embed::new().field("UserAgent", "`  curl/8.0  `");
        let record = extract_sections(&embed);
        assert_eq!(record.get("useragent"), Some(&json!("curl/8.0")));
    }

    #[test]
    fn test_useragent_case_insensitive() {
        for name in ["useragent", "UserAgent", "USERAGENT", "uSeRaGeNt"] {
            let embed = Embed::new().field(name, "Mozilla/5.0");
            let record = extract_sections(&embed);
            assert_eq!(record.get("useragent"), Some(&json!("Mozilla/5.0")), "{name}");
        }
    }

    #[test]
    fn test_useragent_code_block() {
        let embed = Embed::new().field("UserAgent", "```Mozilla/5.0 (X11; Linux x86_64)```");
        let record = extract_sections(&embed);
        assert_eq!(
            record.get("useragent"),
            Some(&json!("Mozilla/5.0 (X11; Linux x86_64)"))
        );
    }

    #[test]
    fn test_useragent_outer_whitespace_keeps_backticks() {
        let embed = Embed::new().field("UserAgent", " `curl` ");
        let record = extract_sections(&embed);
        assert_eq!(record.get("useragent"), Some(&json!("`curl`")));
    }

    #[test]
    fn test_useragent_name_with_space_ignored() {
        let embed = Embed::new().field("User Agent", "curl/8.0");
        assert!(extract_sections(&embed).is_empty());
    }

    // =========================================================================
    // geo info
    // =========================================================================

    #[test]
    fn test_geo_info_merged_top_level() {
        let embed = Embed::new().field(
            "Geo Info",
            "```\n{\"ip\": \"1.2.3.4\", \"loc\": \"10,20\", \"city\": \"Zürich\", \"asn\": 3303}\n```",
        );
        let record = extract_sections(&embed);
        assert_eq!(record.get("ip"), Some(&json!("1.2.3.4")));
        assert_eq!(record.get("loc"), Some(&json!("10,20")));
        assert_eq!(record.get("city"), Some(&json!("Zürich")));
        assert_eq!(record.get("asn"), Some(&json!(3303)));
        assert!(record.headers().is_none());
    }

    #[test]
    fn test_geo_info_invalid_json_skipped() {
        let embed = Embed::new()
            .field("UserAgent", "curl/8.0")
            .field("Geo Info", "`{\"ip\": \"1.2.3.4\",`");

        let extraction = parse_embed(&embed);
        assert_eq!(extraction.record.len(), 1);
        assert!(extraction.record.contains_key("useragent"));
        assert_eq!(extraction.malformed, vec![FieldKind::GeoInfo]);
    }

    #[test]
    fn test_geo_info_non_object_skipped() {
        for value in ["[1,2,3]", "\"1.2.3.4\"", "42", "null"] {
            let embed = Embed::new().field("geo info", value);
            let extraction = parse_embed(&embed);
            assert!(extraction.record.is_empty(), "{value}");
            assert_eq!(extraction.malformed.len(), 1);
        }
    }

    #[test]
    fn test_geo_info_later_field_overwrites() {
        let embed = Embed::new()
            .field("Geo Info", r#"{"ip": "1.1.1.1", "loc": "1,1"}"#)
            .field("Geo Info", r#"{"ip": "2.2.2.2"}"#);
        let record = extract_sections(&embed);
        assert_eq!(record.get("ip"), Some(&json!("2.2.2.2")));
        assert_eq!(record.get("loc"), Some(&json!("1,1")));
    }

    // =========================================================================
    // request headers
    // =========================================================================

    #[test]
    fn test_request_headers_nested() {
        let embed = Embed::new().field(
            "Request Headers",
            "`{\"Host\": \"example.com\", \"Accept\": \"*/*\"}`",
        );
        let record = extract_sections(&embed);
        assert_eq!(record.len(), 1);
        assert_eq!(
            record.get("headers"),
            Some(&json!({"Host": "example.com", "Accept": "*/*"}))
        );
        assert!(!record.contains_key("Host"));
    }

    #[test]
    fn test_request_headers_accumulate_within_embed() {
        let embed = Embed::new()
            .field("Request Headers", r#"{"Host": "a.com"}"#)
            .field("Request Headers", r#"{"Accept": "*/*"}"#)
            .field("Request Headers", "not json");

        let extraction = parse_embed(&embed);
        let headers = extraction.record.headers().expect("headers");
        assert_eq!(headers.len(), 2);
        assert_eq!(extraction.malformed, vec![FieldKind::RequestHeaders]);
    }

    #[test]
    fn test_request_headers_invalid_no_key() {
        let embed = Embed::new().field("Request Headers", "{}");
        let record = extract_sections(&embed);
        assert!(!record.contains_key("headers"));
    }

    #[test]
    fn test_headers_field_replaces_geo_headers_key() {
        let embed = Embed::new()
            .field("Geo Info", r#"{"ip": "1.2.3.4", "headers": "from-geo"}"#)
            .field("Request Headers", r#"{"Host": "a.com"}"#);
        let record = extract_sections(&embed);
        assert_eq!(record.get("headers"), Some(&json!({"Host": "a.com"})));
    }

    // =========================================================================
    // ignored input
    // =========================================================================

    #[test]
    fn test_unknown_and_empty_fields_ignored() {
        let embed = Embed {
            title: Some("Canary triggered".into()),
            description: None,
            fields: vec![
                EmbedField {
                    name: Some("Token".into()),
                    value: Some("abc".into()),
                    inline: true,
                },
                EmbedField {
                    name: Some("UserAgent".into()),
                    value: Some(String::new()),
                    inline: false,
                },
                EmbedField {
                    name: None,
                    value: Some("{\"ip\": \"1.2.3.4\"}".into()),
                    inline: false,
                },
                EmbedField {
                    name: Some("Geo Info".into()),
                    value: None,
                    inline: false,
                },
            ],
        };

        let extraction = parse_embed(&embed);
        assert!(extraction.record.is_empty());
        assert!(extraction.malformed.is_empty());
    }

    #[test]
    fn test_empty_embed() {
        assert!(extract_sections(&Embed::new()).is_empty());
    }

    #[test]
    fn test_parse_json_field_whitespace_inside_backticks() {
        let map = parse_json_field("  `  {\"ip\": \"1.2.3.4\"}  `  ").expect("object");
        assert_eq!(map["ip"], json!("1.2.3.4"));
    }
}
