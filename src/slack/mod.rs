//! Slack slash-command payloads and message formatting.

pub mod attachment;
pub mod command;

pub use attachment::{AttachmentField, SlackAttachment};
pub use command::{SlackUser, SlashCommand, SlashCommandError, SubCommand};
