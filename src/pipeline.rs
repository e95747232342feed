//! The fetch → parse → filter → write driver.
//!
//! [`run`] is the whole program: load the token, open a session, stream the
//! channel oldest first, keep the records with geolocation, export them and
//! close the session. [`run_with`] does the same against any
//! [`ChatPlatform`], which is how the pipeline is tested without a network.

use std::path::PathBuf;
use std::pin::pin;

use futures::{Stream, TryStreamExt};
use tracing::{debug, info};

use crate::client::DiscordClient;
use crate::config::{FetchConfig, load_token};
use crate::core::{Dataset, FilterConfig, ProcessingStats, export};
use crate::error::Result;
use crate::history::ChatPlatform;
use crate::message::ChannelMessage;
use crate::progress::RunEvent;
use crate::session::Session;

/// Outcome of a completed run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub stats: ProcessingStats,
    pub json_path: PathBuf,
    pub csv_path: PathBuf,
}

impl RunSummary {
    /// Number of records written.
    pub fn records(&self) -> usize {
        self.stats.records_kept
    }
}

/// Runs the pipeline against Discord.
///
/// # Errors
///
/// - [`MissingToken`](crate::CanaryfetchError::MissingToken) before any
///   network activity if the credential file is absent
/// - any network, API or decode error while fetching
/// - any I/O error while writing the outputs
pub async fn run(config: &FetchConfig, on_event: impl FnMut(&RunEvent)) -> Result<RunSummary> {
    config.validate()?;
    let token = load_token(&config.token_file)?;
    let client = DiscordClient::with_base_url(&token, config.timeout_secs, &config.api_base)?;
    run_with(client, config, on_event).await
}

/// Runs the pipeline against any platform.
///
/// The session is closed whether the run succeeds or fails.
pub async fn run_with<P: ChatPlatform>(
    platform: P,
    config: &FetchConfig,
    mut on_event: impl FnMut(&RunEvent),
) -> Result<RunSummary> {
    let session = Session::open(platform).await?;
    on_event(&RunEvent::LoggedIn(session.user().clone()));

    let outcome = export_channel(&session, config, &mut on_event).await;
    session.close();
    outcome
}

async fn export_channel<P: ChatPlatform>(
    session: &Session<P>,
    config: &FetchConfig,
    on_event: &mut impl FnMut(&RunEvent),
) -> Result<RunSummary> {
    let channel = session.channel(config.channel_id).await?;
    on_event(&RunEvent::ChannelResolved(channel));

    let messages = session.history(config.channel_id, config.page_size, config.max_messages);
    let (dataset, stats) = collect_dataset(messages, &FilterConfig::new()).await?;

    info!(
        messages = stats.messages_seen,
        kept = stats.records_kept,
        malformed_fields = stats.malformed_fields,
        "history exhausted"
    );

    export(
        &dataset,
        &config.output_json,
        &config.output_csv,
        &config.output_config(),
    )?;
    on_event(&RunEvent::Exported {
        records: dataset.len(),
        json_path: config.output_json.clone(),
        csv_path: config.output_csv.clone(),
    });

    Ok(RunSummary {
        stats,
        json_path: config.output_json.clone(),
        csv_path: config.output_csv.clone(),
    })
}

/// Drains a message stream into the records that pass `filter`.
///
/// Records keep the order of the stream. The first stream error aborts
/// collection and is returned.
pub async fn collect_dataset<S>(
    messages: S,
    filter: &FilterConfig,
) -> Result<(Dataset, ProcessingStats)>
where
    S: Stream<Item = Result<ChannelMessage>>,
{
    let mut messages = pin!(messages);
    let mut dataset = Dataset::new();
    let mut stats = ProcessingStats::new();

    while let Some(message) = messages.try_next().await? {
        let record = stats.observe(&message);
        if filter.matches(&record) {
            stats.record_kept();
            dataset.push(record);
        } else if !record.is_empty() {
            debug!(message_id = message.id, "record without geolocation dropped");
        }
    }

    Ok((dataset, stats))
}
