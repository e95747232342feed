//! Oldest-first channel history.
//!
//! [`ChatPlatform`] is the seam between the pipeline and a concrete chat
//! service: who am I, which channel is this, and give me the next page of
//! messages after a given snowflake. [`HistoryCursor`] walks those pages from
//! the beginning of the channel, and [`history`] exposes the walk as a lazy
//! [`Stream`].
//!
//! Pages are requested one at a time, only when the previous page has been
//! consumed. Restarting means building a new cursor.

use std::collections::VecDeque;
use std::future::Future;

use futures::Stream;
use futures::stream;
use tracing::debug;

use crate::error::Result;
use crate::message::{Channel, ChannelMessage, User};

/// The operations the pipeline needs from a chat service.
pub trait ChatPlatform {
    /// Returns the authenticated account. Fails if the credentials are bad.
    fn current_user(&self) -> impl Future<Output = Result<User>> + Send;

    /// Looks up a channel by id.
    fn channel(&self, channel_id: u64) -> impl Future<Output = Result<Channel>> + Send;

    /// Returns up to `limit` messages with an id greater than `after`.
    ///
    /// Order within the page is unspecified; the cursor sorts it.
    fn messages_after(
        &self,
        channel_id: u64,
        after: u64,
        limit: u8,
    ) -> impl Future<Output = Result<Vec<ChannelMessage>>> + Send;
}

/// Pages through a channel from its first message.
pub struct HistoryCursor<'a, P> {
    platform: &'a P,
    channel_id: u64,
    page_size: u8,
    after: u64,
    buffered: VecDeque<ChannelMessage>,
    exhausted: bool,
    remaining: Option<usize>,
    pages: usize,
}

impl<'a, P: ChatPlatform> HistoryCursor<'a, P> {
    /// Creates a cursor positioned before the first message.
    pub fn new(platform: &'a P, channel_id: u64, page_size: u8) -> Self {
        Self {
            platform,
            channel_id,
            page_size: page_size.max(1),
            after: 0,
            buffered: VecDeque::new(),
            exhausted: false,
            remaining: None,
            pages: 0,
        }
    }

    /// Stops after `limit` messages.
    #[must_use]
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.remaining = limit;
        self
    }

    /// Number of pages requested so far.
    pub fn pages_fetched(&self) -> usize {
        self.pages
    }

    /// Returns the next message, fetching a page when the buffer is empty.
    pub async fn next_message(&mut self) -> Result<Option<ChannelMessage>> {
        if self.remaining == Some(0) {
            return Ok(None);
        }
        if self.buffered.is_empty() && !self.exhausted {
            self.fill().await?;
        }

        let message = self.buffered.pop_front();
        if message.is_some() {
            if let Some(remaining) = self.remaining.as_mut() {
                *remaining -= 1;
            }
        }
        Ok(message)
    }

    async fn fill(&mut self) -> Result<()> {
        let mut page = self
            .platform
            .messages_after(self.channel_id, self.after, self.page_size)
            .await?;
        self.pages += 1;

        let received = page.len();
        page.retain(|m| m.id > self.after);
        page.sort_by_key(|m| m.id);

        // A short page is the last one; so is a page that did not move the cursor.
        if received < usize::from(self.page_size) || page.is_empty() {
            self.exhausted = true;
        }
        if let Some(last) = page.last() {
            self.after = last.id;
        }

        debug!(
            channel_id = self.channel_id,
            page = self.pages,
            received,
            after = self.after,
            "fetched history page"
        );

        self.buffered.extend(page);
        Ok(())
    }
}

/// Streams a channel's messages oldest first.
///
/// Stops after `limit` messages when given, otherwise at the end of the
/// history. The first error ends the stream.
pub fn history<P: ChatPlatform>(
    platform: &P,
    channel_id: u64,
    page_size: u8,
    limit: Option<usize>,
) -> impl Stream<Item = Result<ChannelMessage>> + '_ {
    let cursor = HistoryCursor::new(platform, channel_id, page_size).with_limit(limit);
    stream::try_unfold(cursor, |mut cursor| async move {
        let next = cursor.next_message().await?;
        Ok(next.map(|message| (message, cursor)))
    })
}
