//! Scoped, authenticated platform session.
//!
//! A [`Session`] is opened by authenticating against the platform and closed
//! by consuming it. Everything the pipeline does with the network happens
//! through a borrowed session, so the session outlives every request.

use std::time::Instant;

use futures::Stream;
use tracing::info;

use crate::error::Result;
use crate::history::{ChatPlatform, history};
use crate::message::{Channel, ChannelMessage, User};

/// An authenticated connection to a chat platform.
pub struct Session<P> {
    platform: P,
    user: User,
    opened_at: Instant,
}

impl<P: ChatPlatform> Session<P> {
    /// Authenticates and opens the session.
    ///
    /// # Errors
    ///
    /// Whatever [`ChatPlatform::current_user`] returns, typically an
    /// [`Api`](crate::CanaryfetchError::Api) 401 for a bad token.
    pub async fn open(platform: P) -> Result<Self> {
        let user = platform.current_user().await?;
        info!(user = %user, bot = user.bot, "session opened");
        Ok(Self {
            platform,
            user,
            opened_at: Instant::now(),
        })
    }

    /// The authenticated account.
    pub fn user(&self) -> &User {
        &self.user
    }

    /// Looks up a channel.
    pub async fn channel(&self, channel_id: u64) -> Result<Channel> {
        self.platform.channel(channel_id).await
    }

    /// Streams a channel's history oldest first.
    pub fn history(
        &self,
        channel_id: u64,
        page_size: u8,
        limit: Option<usize>,
    ) -> impl Stream<Item = Result<ChannelMessage>> + '_ {
        history(&self.platform, channel_id, page_size, limit)
    }

    /// Closes the session, releasing the platform client.
    pub fn close(self) {
        info!(
            user = %self.user,
            elapsed_ms = self.opened_at.elapsed().as_millis(),
            "session closed"
        );
    }
}
