//! Slash-command dispatch.
//!
//! Maps a decoded [`SlashCommand`] onto user and task store operations and
//! returns what should be sent back to Slack.

use crate::slack::{SlackAttachment, SlashCommand};
use serde_json::{Map, Value};
use thiserror::Error;

/// Failures of a dispatched command, one variant per cause.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("No user found for Slack user {0}")]
    UserNotFound(String),

    #[error("User record has no id to own tasks")]
    MissingCreator,

    #[error("Invalid task id: {0:?}")]
    InvalidTaskId(String),

    #[error("Not implemented: {0}")]
    NotImplemented(&'static str),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<anyhow::Error> for CommandError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(format!("{err:#}"))
    }
}

/// The successful outcome of a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandReply {
    /// Tasks rendered as Slack attachments.
    Attachments(Vec<SlackAttachment>),

    /// A fixed acknowledgement string.
    Acknowledged(&'static str),

    /// The posted form fields, sent back for unrecognised sub-commands.
    Echo(Map<String, Value>),
}

/// Literal reply for a delete, whether or not a row matched.
pub const DELETED_ACK: &str = "Deleted";

#[async_trait::async_trait]
pub trait CommandService: Send + Sync {
    /// Runs one slash command.
    ///
    /// # Errors
    ///
    /// - [`CommandError::UserNotFound`] when listing for a Slack user never seen before
    /// - [`CommandError::InvalidTaskId`] when a delete's content is not an integer
    /// - [`CommandError::NotImplemented`] for `assign`
    /// - [`CommandError::Database`] on store failures
    async fn dispatch(&self, command: SlashCommand) -> Result<CommandReply, CommandError>;
}
