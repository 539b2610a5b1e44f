//! `SeaORM`-backed implementation of [`CommandService`].

use tracing::{debug, info};

use crate::db::Store;
use crate::models::task::{Task, TaskStatus};
use crate::models::user::User;
use crate::services::command_service::{
    CommandError, CommandReply, CommandService, DELETED_ACK,
};
use crate::slack::{SlackAttachment, SlashCommand, SubCommand};

pub struct SeaOrmCommandService {
    store: Store,
}

impl SeaOrmCommandService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    fn attachments(tasks: &[Task]) -> CommandReply {
        CommandReply::Attachments(tasks.iter().map(SlackAttachment::from).collect())
    }

    fn creator_id(user: &User) -> Result<i32, CommandError> {
        user.creator_id().ok_or(CommandError::MissingCreator)
    }

    async fn list_tasks(&self, command: &SlashCommand) -> Result<CommandReply, CommandError> {
        let user = self
            .store
            .find_user_by_slack_id(&command.user_id)
            .await?
            .ok_or_else(|| CommandError::UserNotFound(command.user_id.clone()))?;

        let tasks = self.store.list_tasks_by_creator(user.id).await?;
        debug!(user_id = user.id, count = tasks.len(), "Listing tasks");
        Ok(Self::attachments(&tasks))
    }

    async fn add_task(&self, command: &SlashCommand) -> Result<CommandReply, CommandError> {
        let user = self
            .store
            .create_user_if_absent(&command.slack_user())
            .await?;
        let creator_id = Self::creator_id(&user)?;

        let task = self
            .store
            .create_task(&command.content(), TaskStatus::ToDo, creator_id)
            .await?;

        Ok(Self::attachments(&[task]))
    }

    async fn delete_task(&self, command: &SlashCommand) -> Result<CommandReply, CommandError> {
        let user = self
            .store
            .create_user_if_absent(&command.slack_user())
            .await?;
        let creator_id = Self::creator_id(&user)?;

        let content = command.content();
        let task_id: i32 = content
            .parse()
            .map_err(|_| CommandError::InvalidTaskId(content.clone()))?;

        self.store
            .delete_task_for_creator(creator_id, task_id)
            .await?;

        Ok(CommandReply::Acknowledged(DELETED_ACK))
    }
}

#[async_trait::async_trait]
impl CommandService for SeaOrmCommandService {
    async fn dispatch(&self, command: SlashCommand) -> Result<CommandReply, CommandError> {
        let sub_command = command.sub_command();
        info!(
            sub_command = sub_command.as_str(),
            slack_user_id = %command.user_id,
            "Dispatching slash command"
        );

        match sub_command {
            SubCommand::List => self.list_tasks(&command).await,
            SubCommand::Add => self.add_task(&command).await,
            SubCommand::Delete => self.delete_task(&command).await,
            SubCommand::Assign => Err(CommandError::NotImplemented("assign")),
            SubCommand::Unknown => Ok(CommandReply::Echo(command.payload)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_store;
    use std::collections::HashMap;

    fn command(user_id: &str, text: &str) -> SlashCommand {
        let fields: HashMap<String, String> = [
            ("token", "tok"),
            ("user_id", user_id),
            ("user_name", "steve"),
            ("command", "/tasks"),
            ("text", text),
            ("response_url", "https://hooks.slack.com/commands/1/2"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        SlashCommand::from_fields(&fields).unwrap()
    }

    async fn service() -> (SeaOrmCommandService, Store) {
        let store = test_store().await;
        (SeaOrmCommandService::new(store.clone()), store)
    }

    fn attachments(reply: CommandReply) -> Vec<SlackAttachment> {
        match reply {
            CommandReply::Attachments(items) => items,
            other => panic!("expected attachments, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn add_then_list_round_trip() {
        let (service, _) = service().await;

        let added = attachments(service.dispatch(command("U1", "add buy milk")).await.unwrap());
        assert_eq!(added.len(), 1);
        assert_eq!(added[0].text, "buy milk");

        let listed = attachments(service.dispatch(command("U1", "list")).await.unwrap());
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].text, "buy milk");
        assert_eq!(listed[0].fields[0].value, "ToDo");
    }

    #[tokio::test]
    async fn list_does_not_create_users() {
        let (service, store) = service().await;

        let err = service.dispatch(command("UNEW", "list")).await.unwrap_err();

        assert!(matches!(err, CommandError::UserNotFound(ref id) if id == "UNEW"));
        assert_eq!(store.count_users().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn list_only_shows_own_tasks() {
        let (service, _) = service().await;

        service.dispatch(command("U1", "add mine")).await.unwrap();
        service.dispatch(command("U2", "add theirs")).await.unwrap();

        let listed = attachments(service.dispatch(command("U1", "list")).await.unwrap());
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].text, "mine");
    }

    #[tokio::test]
    async fn repeated_adds_reuse_one_user() {
        let (service, store) = service().await;

        service.dispatch(command("U1", "add one")).await.unwrap();
        service.dispatch(command("U1", "add two")).await.unwrap();

        assert_eq!(store.count_users().await.unwrap(), 1);
        assert_eq!(store.list_tasks().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let (service, store) = service().await;

        service.dispatch(command("U1", "add temp")).await.unwrap();
        let id = store.list_tasks().await.unwrap()[0].id;
        let text = format!("delete {id}");

        let first = service.dispatch(command("U1", &text)).await.unwrap();
        let second = service.dispatch(command("U1", &text)).await.unwrap();

        assert_eq!(first, CommandReply::Acknowledged(DELETED_ACK));
        assert_eq!(second, CommandReply::Acknowledged(DELETED_ACK));
        assert!(store.list_tasks().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_cannot_touch_another_users_task() {
        let (service, store) = service().await;

        service.dispatch(command("U1", "add keep me")).await.unwrap();
        let id = store.list_tasks().await.unwrap()[0].id;

        let reply = service
            .dispatch(command("U2", &format!("delete {id}")))
            .await
            .unwrap();

        assert_eq!(reply, CommandReply::Acknowledged(DELETED_ACK));
        assert_eq!(store.list_tasks().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn delete_rejects_non_numeric_id() {
        let (service, _) = service().await;

        let err = service
            .dispatch(command("U1", "delete the milk"))
            .await
            .unwrap_err();

        assert!(matches!(err, CommandError::InvalidTaskId(ref text) if text == "the milk"));
    }

    #[tokio::test]
    async fn assign_is_not_implemented() {
        let (service, _) = service().await;

        let err = service
            .dispatch(command("U1", "assign 3 bob"))
            .await
            .unwrap_err();

        assert!(matches!(err, CommandError::NotImplemented("assign")));
    }

    #[tokio::test]
    async fn unknown_sub_command_echoes_payload() {
        let (service, store) = service().await;
        let cmd = command("U1", "weather 94070");

        let reply = service.dispatch(cmd.clone()).await.unwrap();

        assert_eq!(reply, CommandReply::Echo(cmd.payload));
        assert_eq!(store.count_users().await.unwrap(), 0);
    }

    #[test]
    fn user_without_id_cannot_own_tasks() {
        let user = User {
            id: 0,
            slack_user_id: "U1".to_string(),
            slack_user_name: "steve".to_string(),
            slack_user_token: "tok".to_string(),
            created: String::new(),
            last_modified: String::new(),
        };

        assert!(matches!(
            SeaOrmCommandService::creator_id(&user),
            Err(CommandError::MissingCreator)
        ));
    }
}
