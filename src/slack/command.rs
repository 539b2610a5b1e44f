//! Decoding of slash-command webhook payloads.
//!
//! Slack posts a form-encoded body such as
//!
//! ```text
//! token=gIkuvaNzQIHg97ATvDxqgjtO&team_id=T0001&team_domain=example
//! &channel_id=C2147483705&channel_name=test&user_id=U2147483697
//! &user_name=Steve&command=/tasks&text=add buy milk
//! &response_url=https://hooks.slack.com/commands/1234/5678
//! &trigger_id=13345224609.738474920.8088930838d88f008e0
//! ```
//!
//! The first word of `text` selects the [`SubCommand`]; the rest is the
//! command's content.

use serde_json::{Map, Value};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlashCommandError {
    #[error("Missing field: {0}")]
    MissingField(&'static str),
}

/// The operation requested by the first word of the command text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubCommand {
    List,
    Add,
    Delete,
    Assign,
    Unknown,
}

impl SubCommand {
    /// Case-insensitive keyword match.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword.to_lowercase().as_str() {
            "list" => Self::List,
            "add" => Self::Add,
            "delete" => Self::Delete,
            "assign" => Self::Assign,
            _ => Self::Unknown,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Add => "add",
            Self::Delete => "delete",
            Self::Assign => "assign",
            Self::Unknown => "unknown",
        }
    }
}

/// The identity fields of a payload, used to find or create a local user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlackUser {
    pub token: String,
    pub user_id: String,
    pub user_name: String,
}

/// A decoded slash-command payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlashCommand {
    pub token: String,
    pub team_id: String,
    pub team_domain: String,
    pub enterprise_id: String,
    pub enterprise_name: String,
    pub channel_id: String,
    pub channel_name: String,
    pub user_id: String,
    pub user_name: String,
    pub command: String,
    pub text: String,
    pub response_url: String,
    pub trigger_id: String,
    /// Every field exactly as posted, including ones not modelled above.
    pub payload: Map<String, Value>,
}

impl SlashCommand {
    /// Builds a command from decoded form fields.
    ///
    /// # Errors
    ///
    /// Returns [`SlashCommandError::MissingField`] naming the first required
    /// field (`token`, `user_id`, `user_name`, `command`, `text`,
    /// `response_url`) that is absent. Every other field defaults to empty.
    pub fn from_fields(fields: &HashMap<String, String>) -> Result<Self, SlashCommandError> {
        let required = |key: &'static str| {
            fields
                .get(key)
                .cloned()
                .ok_or(SlashCommandError::MissingField(key))
        };
        let optional = |key: &str| fields.get(key).cloned().unwrap_or_default();

        Ok(Self {
            token: required("token")?,
            team_id: optional("team_id"),
            team_domain: optional("team_domain"),
            enterprise_id: optional("enterprise_id"),
            enterprise_name: optional("enterprise_name"),
            channel_id: optional("channel_id"),
            channel_name: optional("channel_name"),
            user_id: required("user_id")?,
            user_name: required("user_name")?,
            command: required("command")?,
            text: required("text")?,
            response_url: required("response_url")?,
            trigger_id: optional("trigger_id"),
            payload: fields
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect(),
        })
    }

    #[must_use]
    pub fn sub_command(&self) -> SubCommand {
        self.text
            .split_whitespace()
            .next()
            .map_or(SubCommand::Unknown, SubCommand::from_keyword)
    }

    /// Everything after the sub-command keyword, with runs of whitespace
    /// collapsed to single spaces. For [`SubCommand::Unknown`] the keyword is
    /// kept, since there is no keyword to strip.
    #[must_use]
    pub fn content(&self) -> String {
        let mut tokens = self.text.split_whitespace();
        if self.sub_command() != SubCommand::Unknown {
            tokens.next();
        }
        tokens.collect::<Vec<_>>().join(" ")
    }

    #[must_use]
    pub fn slack_user(&self) -> SlackUser {
        SlackUser {
            token: self.token.clone(),
            user_id: self.user_id.clone(),
            user_name: self.user_name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(text: &str) -> HashMap<String, String> {
        [
            ("token", "gIkuvaNzQIHg97ATvDxqgjtO"),
            ("team_id", "T0001"),
            ("team_domain", "example"),
            ("channel_id", "C2147483705"),
            ("channel_name", "test"),
            ("user_id", "U2147483697"),
            ("user_name", "Steve"),
            ("command", "/tasks"),
            ("text", text),
            ("response_url", "https://hooks.slack.com/commands/1234/5678"),
            ("trigger_id", "13345224609.738474920.8088930838d88f008e0"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    fn command(text: &str) -> SlashCommand {
        SlashCommand::from_fields(&fields(text)).unwrap()
    }

    #[test]
    fn classifies_keywords_case_insensitively() {
        assert_eq!(command("list").sub_command(), SubCommand::List);
        assert_eq!(command("LIST").sub_command(), SubCommand::List);
        assert_eq!(command("Add buy milk").sub_command(), SubCommand::Add);
        assert_eq!(command("delete 4").sub_command(), SubCommand::Delete);
        assert_eq!(command("aSSign 3 bob").sub_command(), SubCommand::Assign);
    }

    #[test]
    fn unrecognised_or_empty_text_is_unknown() {
        assert_eq!(command("").sub_command(), SubCommand::Unknown);
        assert_eq!(command("   ").sub_command(), SubCommand::Unknown);
        assert_eq!(command("94070").sub_command(), SubCommand::Unknown);
        assert_eq!(command("adding things").sub_command(), SubCommand::Unknown);
    }

    #[test]
    fn content_is_text_after_keyword() {
        assert_eq!(command("add buy milk").content(), "buy milk");
        assert_eq!(command("list").content(), "");
        assert_eq!(command("assign 3 bob").content(), "3 bob");
        assert_eq!(command("delete 12").content(), "12");
    }

    #[test]
    fn content_tolerates_irregular_whitespace() {
        assert_eq!(command("  ADD   buy \t milk ").content(), "buy milk");
        assert_eq!(command("list   ").content(), "");
    }

    #[test]
    fn unknown_content_keeps_whole_text() {
        assert_eq!(command(" remind me later ").content(), "remind me later");
    }

    #[test]
    fn missing_required_field_is_reported() {
        for key in ["token", "user_id", "user_name", "command", "text", "response_url"] {
            let mut payload = fields("list");
            payload.remove(key);
            assert_eq!(
                SlashCommand::from_fields(&payload),
                Err(SlashCommandError::MissingField(key))
            );
        }
    }

    #[test]
    fn optional_fields_default_to_empty() {
        let mut payload = fields("list");
        for key in ["team_id", "team_domain", "channel_id", "channel_name", "trigger_id"] {
            payload.remove(key);
        }

        let cmd = SlashCommand::from_fields(&payload).unwrap();
        assert_eq!(cmd.team_id, "");
        assert_eq!(cmd.enterprise_id, "");
        assert_eq!(cmd.enterprise_name, "");
        assert_eq!(cmd.trigger_id, "");
        assert_eq!(cmd.user_id, "U2147483697");
    }

    #[test]
    fn payload_keeps_every_posted_field() {
        let mut posted = fields("weather 94070");
        posted.insert("api_app_id".to_string(), "A123".to_string());
        posted.insert("is_enterprise_install".to_string(), "false".to_string());

        let cmd = SlashCommand::from_fields(&posted).unwrap();

        assert_eq!(cmd.payload["user_name"], "Steve");
        assert_eq!(cmd.payload["text"], "weather 94070");
        assert_eq!(cmd.payload["api_app_id"], "A123");
        assert_eq!(cmd.payload["is_enterprise_install"], "false");
        assert!(!cmd.payload.contains_key("enterprise_name"));
        assert_eq!(cmd.payload.len(), posted.len());
    }

    #[test]
    fn slack_user_carries_identity() {
        let user = command("list").slack_user();
        assert_eq!(user.user_id, "U2147483697");
        assert_eq!(user.user_name, "Steve");
        assert_eq!(user.token, "gIkuvaNzQIHg97ATvDxqgjtO");
    }
}
