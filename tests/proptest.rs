//! Property-based tests for canaryfetch.
//!
//! These tests generate random embeds and records to find edge cases.

use proptest::prelude::*;
use serde_json::{Map, Value};

use canaryfetch::core::{FilterConfig, OutputConfig, Record, apply_filters, merge_embeds, to_csv};
use canaryfetch::message::Embed;
use canaryfetch::parsing::extract_sections;

/// Field names, including near misses and case variants.
fn arb_field_name() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "UserAgent".to_string(),
        "useragent".to_string(),
        "Geo Info".to_string(),
        "GEO INFO".to_string(),
        "Request Headers".to_string(),
        "request headers".to_string(),
        "Geo-Info".to_string(),
        "Referer".to_string(),
        String::new(),
    ])
}

/// Field values: valid objects, broken JSON, arrays and free text.
fn arb_field_value() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(r#"```{"ip":"1.2.3.4","loc":"10,20"}```"#.to_string()),
        Just(r#"`{"Host":"example.com"}`"#.to_string()),
        Just(r#"{"ip":"5.6.7.8"}"#.to_string()),
        Just("{}".to_string()),
        Just("[1, 2]".to_string()),
        Just("```".to_string()),
        Just("{not json".to_string()),
        Just("Привет 🎉".to_string()),
        ".{0,40}",
    ]
}

fn arb_embed() -> impl Strategy<Value = Embed> {
    prop::collection::vec((arb_field_name(), arb_field_value()), 0..6).prop_map(|fields| {
        fields
            .into_iter()
            .fold(Embed::new(), |embed, (name, value)| embed.field(name, value))
    })
}

/// Records with or without each of the required keys.
fn arb_record() -> impl Strategy<Value = Record> {
    (any::<bool>(), any::<bool>(), any::<bool>()).prop_map(|(ip, loc, ua)| {
        let mut record = Record::new();
        if ua {
            record.insert("useragent", Value::from("curl/8.0"));
        }
        if ip {
            record.insert("ip", Value::from("1.2.3.4"));
        }
        if loc {
            record.insert("loc", Value::from("10,20"));
        }
        record
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // ============================================
    // EXTRACTION PROPERTIES
    // ============================================

    /// Extraction is total: any embed yields a record
    #[test]
    fn extraction_never_panics(embed in arb_embed()) {
        let _ = extract_sections(&embed);
    }

    /// Arbitrary text in a JSON field never produces keys from nowhere
    #[test]
    fn free_text_geo_adds_nothing(text in "[^`{]{0,40}") {
        let embed = Embed::new().field("Geo Info", text);
        prop_assert!(extract_sections(&embed).is_empty());
    }

    /// The useragent is stored without backticks or surrounding whitespace
    #[test]
    fn useragent_is_unquoted(agent in "[A-Za-z0-9/. ()]{1,40}") {
        let embed = Embed::new().field("UserAgent", format!("`{agent}`"));
        let record = extract_sections(&embed);
        prop_assert_eq!(record.get("useragent"), Some(&Value::from(agent.trim())));
    }

    /// Only the three recognised sections contribute keys
    #[test]
    fn unknown_fields_ignored(value in arb_field_value()) {
        let embed = Embed::new().field("Referer", value);
        prop_assert!(extract_sections(&embed).is_empty());
    }

    /// Headers always end up as a mapping under one key
    #[test]
    fn headers_are_nested(embeds in prop::collection::vec(arb_embed(), 0..4)) {
        let record = merge_embeds(&embeds);
        if let Some(headers) = record.get("headers") {
            prop_assert!(headers.is_object());
            prop_assert!(!headers.as_object().unwrap().is_empty());
        }
    }

    /// Merging embeds one by one matches merging them all at once
    #[test]
    fn merge_is_incremental(embeds in prop::collection::vec(arb_embed(), 0..4)) {
        let mut incremental = Record::new();
        for embed in &embeds {
            incremental.merge(extract_sections(embed));
        }
        prop_assert_eq!(incremental, merge_embeds(&embeds));
    }

    // ============================================
    // FILTER PROPERTIES
    // ============================================

    /// A record is kept exactly when it has both ip and loc
    #[test]
    fn filter_truth_table(records in prop::collection::vec(arb_record(), 0..20)) {
        let expected = records
            .iter()
            .filter(|r| r.contains_key("ip") && r.contains_key("loc"))
            .count();
        let kept = apply_filters(records, &FilterConfig::new());
        prop_assert_eq!(kept.len(), expected);
    }

    /// Filtering preserves order
    #[test]
    fn filter_preserves_order(n in 0usize..20) {
        let records: Vec<Record> = (0..n)
            .map(|i| {
                let mut map = Map::new();
                map.insert("ip".into(), Value::from(format!("10.0.0.{i}")));
                map.insert("loc".into(), Value::from("0,0"));
                Record::from(map)
            })
            .collect();
        let kept = apply_filters(records.clone(), &FilterConfig::new());
        prop_assert_eq!(kept, records);
    }

    /// An inactive filter keeps everything
    #[test]
    fn accept_all_keeps_everything(records in prop::collection::vec(arb_record(), 0..20)) {
        let len = records.len();
        prop_assert_eq!(apply_filters(records, &FilterConfig::accept_all()).len(), len);
    }

    // ============================================
    // CSV PROPERTIES
    // ============================================

    /// One header line plus one line per record
    #[test]
    fn csv_has_row_per_record(embeds in prop::collection::vec(arb_embed(), 1..10)) {
        let records: Vec<Record> = embeds
            .iter()
            .map(|e| merge_embeds(std::slice::from_ref(e)))
            .filter(|r| !r.is_empty())
            .collect();
        let csv = to_csv(&records, &OutputConfig::new()).unwrap();
        let mut reader = csv::ReaderBuilder::new().from_reader(csv.as_bytes());
        prop_assert_eq!(reader.records().count(), records.len());
    }
}
