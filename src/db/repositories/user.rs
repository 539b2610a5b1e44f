use anyhow::{Context, Result};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use tracing::info;

use crate::entities::{prelude::*, users};
use crate::models::user::User;
use crate::slack::SlackUser;

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            slack_user_id: model.slack_user_id,
            slack_user_name: model.slack_user_name,
            slack_user_token: model.slack_user_token,
            created: model.created,
            last_modified: model.last_modified,
        }
    }
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Exact, case-sensitive lookup by Slack member ID.
    pub async fn get_by_slack_id(&self, slack_user_id: &str) -> Result<Option<User>> {
        let user = Users::find()
            .filter(users::Column::SlackUserId.eq(slack_user_id))
            .one(&self.conn)
            .await
            .context("Failed to query user by Slack ID")?;

        Ok(user.map(User::from))
    }

    /// Returns the user for a Slack identity, inserting it first if unseen.
    ///
    /// The insert is a single `ON CONFLICT DO NOTHING` statement against the
    /// unique `slack_user_id` column, so concurrent first contact from the
    /// same Slack user still leaves exactly one row. An existing row is
    /// returned untouched.
    pub async fn create_if_absent(&self, slack_user: &SlackUser) -> Result<User> {
        let now = chrono::Utc::now().to_rfc3339();

        let active_model = users::ActiveModel {
            slack_user_id: Set(slack_user.user_id.clone()),
            slack_user_name: Set(slack_user.user_name.clone()),
            slack_user_token: Set(slack_user.token.clone()),
            created: Set(now.clone()),
            last_modified: Set(now),
            ..Default::default()
        };

        let inserted = Users::insert(active_model)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(users::Column::SlackUserId)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await
            .context("Failed to insert user")?;

        if inserted > 0 {
            info!(
                slack_user_id = %slack_user.user_id,
                "Created new user for Slack user {}", slack_user.user_name
            );
        }

        self.get_by_slack_id(&slack_user.user_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("User vanished after insert: {}", slack_user.user_id))
    }

    pub async fn count(&self) -> Result<u64> {
        use sea_orm::PaginatorTrait;

        let count = Users::find()
            .count(&self.conn)
            .await
            .context("Failed to count users")?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_store;

    fn slack_user(id: &str, name: &str, token: &str) -> SlackUser {
        SlackUser {
            token: token.to_string(),
            user_id: id.to_string(),
            user_name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn lookup_misses_unknown_user() {
        let store = test_store().await;
        let repo = UserRepository::new(store.conn.clone());

        assert!(repo.get_by_slack_id("U404").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn create_if_absent_is_idempotent() {
        let store = test_store().await;
        let repo = UserRepository::new(store.conn.clone());

        let first = repo
            .create_if_absent(&slack_user("U1", "steve", "tok-1"))
            .await
            .unwrap();
        let second = repo
            .create_if_absent(&slack_user("U1", "steve", "tok-1"))
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn first_seen_name_and_token_are_kept() {
        let store = test_store().await;
        let repo = UserRepository::new(store.conn.clone());

        repo.create_if_absent(&slack_user("U1", "steve", "tok-1"))
            .await
            .unwrap();
        let user = repo
            .create_if_absent(&slack_user("U1", "stephen", "tok-2"))
            .await
            .unwrap();

        assert_eq!(user.slack_user_name, "steve");
        assert_eq!(user.slack_user_token, "tok-1");
    }

    #[tokio::test]
    async fn slack_ids_are_case_sensitive() {
        let store = test_store().await;
        let repo = UserRepository::new(store.conn.clone());

        repo.create_if_absent(&slack_user("U1AB", "steve", "tok"))
            .await
            .unwrap();

        assert!(repo.get_by_slack_id("u1ab").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn concurrent_first_contact_creates_one_row() {
        let store = test_store().await;

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let repo = UserRepository::new(store.conn.clone());
                tokio::spawn(async move {
                    repo.create_if_absent(&slack_user("URACE", "racer", "tok"))
                        .await
                        .map(|u| u.id)
                })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap().unwrap());
        }
        ids.dedup();

        assert_eq!(ids.len(), 1);
        assert_eq!(UserRepository::new(store.conn).count().await.unwrap(), 1);
    }
}
