//! Slack slash-command webhook.
//!
//! # Endpoint
//! `POST /task-reminder/receiver` with a form-url-encoded Slack payload.

use axum::{
    Form, Json,
    extract::{State, rejection::FormRejection},
    response::{IntoResponse, Response},
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

use super::{ApiError, AppState, SlackMessage};
use crate::services::CommandReply;
use crate::slack::SlashCommand;

/// Reply sent when the request body is not a decodable form.
pub const EMPTY_ACK: &str = "EMPTY";

pub async fn receive(
    State(state): State<Arc<AppState>>,
    form: Result<Form<HashMap<String, String>>, FormRejection>,
) -> Result<Response, ApiError> {
    let Form(fields) = match form {
        Ok(form) => form,
        Err(rejection) => {
            warn!(error = %rejection, "Slash command body is not form data");
            return Ok(Json(EMPTY_ACK).into_response());
        }
    };

    let command = SlashCommand::from_fields(&fields)?;
    verify_token(&state, &command)?;

    let reply = state.commands.dispatch(command).await?;
    Ok(render(reply))
}

fn verify_token(state: &AppState, command: &SlashCommand) -> Result<(), ApiError> {
    let Some(expected) = state.config.slack.verification_token.as_deref() else {
        return Ok(());
    };

    if command.token == expected {
        Ok(())
    } else {
        warn!(
            slack_user_id = %command.user_id,
            team_id = %command.team_id,
            "Rejected slash command with wrong verification token"
        );
        Err(ApiError::unauthorized("Invalid verification token"))
    }
}

fn render(reply: CommandReply) -> Response {
    match reply {
        CommandReply::Attachments(attachments) => Json(SlackMessage { attachments }).into_response(),
        CommandReply::Acknowledged(text) => Json(text).into_response(),
        CommandReply::Echo(payload) => Json(payload).into_response(),
    }
}
