//! Progress reporting for a fetch run.
//!
//! The pipeline reports milestones through a callback instead of printing,
//! so library users decide what the operator sees. The CLI turns each
//! [`RunEvent`] into one status line.
//!
//! # Example
//!
//! ```rust
//! use canaryfetch::progress::RunEvent;
//!
//! let mut lines = Vec::new();
//! let mut on_event = |event: &RunEvent| lines.push(event.to_string());
//!
//! on_event(&RunEvent::Exported {
//!     records: 3,
//!     json_path: "discord_dataset.json".into(),
//!     csv_path: "discord_dataset.csv".into(),
//! });
//! assert!(lines[0].contains("3"));
//! ```

use std::fmt;
use std::path::PathBuf;

use crate::message::{Channel, User};

/// A milestone of one run. Per-message progress is not reported.
#[derive(Debug, Clone, PartialEq)]
pub enum RunEvent {
    /// Authentication succeeded.
    LoggedIn(User),
    /// The target channel was resolved; history fetching starts.
    ChannelResolved(Channel),
    /// Both output files were written.
    Exported {
        records: usize,
        json_path: PathBuf,
        csv_path: PathBuf,
    },
}

impl fmt::Display for RunEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunEvent::LoggedIn(user) => write!(f, "Logged in as {}", user),
            RunEvent::ChannelResolved(channel) => {
                write!(f, "Fetching messages from: {}", channel)
            }
            RunEvent::Exported {
                records,
                json_path,
                csv_path,
            } => write!(
                f,
                "Saved {} messages to {} and {}",
                records,
                json_path.display(),
                csv_path.display()
            ),
        }
    }
}
