use chrono::{DateTime, Utc};

use super::models::Record;
use crate::message::{ChannelMessage, Embed};
use crate::parsing::embed::parse_embed;

/// Merges the fields of every embed in a message into one record.
///
/// Embeds are parsed in order; later embeds overwrite earlier keys, except
/// `headers`, which accumulate name by name.
///
/// # Example
/// Input:  [{ip: 1.1.1.1, headers: {Host: a}}, {ip: 2.2.2.2, headers: {Accept: */*}}]
/// Output: {ip: 2.2.2.2, headers: {Host: a, Accept: */*}}
pub fn merge_embeds(embeds: &[Embed]) -> Record {
    process_message(embeds).0
}

/// Like [`merge_embeds`], also returning how many JSON fields were dropped.
fn process_message(embeds: &[Embed]) -> (Record, usize) {
    let mut merged = Record::new();
    let mut malformed = 0;

    for embed in embeds {
        let extraction = parse_embed(embed);
        malformed += extraction.malformed.len();
        merged.merge(extraction.record);
    }

    (merged, malformed)
}

/// Statistics about one pass over a channel's history.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessingStats {
    /// Messages read from the history.
    pub messages_seen: usize,
    /// Messages with at least one embed.
    pub messages_with_embeds: usize,
    /// Records that passed the filter.
    pub records_kept: usize,
    /// `geo info` / `request headers` fields that held unusable JSON.
    pub malformed_fields: usize,
    /// Timestamp of the first message seen.
    pub oldest: Option<DateTime<Utc>>,
    /// Timestamp of the last message seen.
    pub newest: Option<DateTime<Utc>>,
}

impl ProcessingStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses one message and updates the counters.
    ///
    /// Returns the merged record; whether it is kept is up to the caller,
    /// which reports it back through [`record_kept`](Self::record_kept).
    pub fn observe(&mut self, message: &ChannelMessage) -> Record {
        self.messages_seen += 1;
        if !message.embeds.is_empty() {
            self.messages_with_embeds += 1;
        }
        if let Some(ts) = message.timestamp {
            self.oldest = Some(self.oldest.map_or(ts, |o| o.min(ts)));
            self.newest = Some(self.newest.map_or(ts, |n| n.max(ts)));
        }

        let (record, malformed) = process_message(&message.embeds);
        self.malformed_fields += malformed;
        record
    }

    pub fn record_kept(&mut self) {
        self.records_kept += 1;
    }

    /// Messages that did not produce a record.
    pub fn dropped(&self) -> usize {
        self.messages_seen.saturating_sub(self.records_kept)
    }

    /// Share of messages dropped, in percent.
    pub fn drop_ratio(&self) -> f64 {
        if self.messages_seen == 0 {
            return 0.0;
        }
        (self.dropped() as f64 / self.messages_seen as f64) * 100.0
    }
}
