use crate::models::task::{Task, TaskStatus};
use crate::models::user::User;
use crate::slack::SlackUser;
use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

/// Connection pool plus the per-table repositories built on top of it.
#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn task_repo(&self) -> repositories::task::TaskRepository {
        repositories::task::TaskRepository::new(self.conn.clone())
    }

    // Users

    pub async fn find_user_by_slack_id(&self, slack_user_id: &str) -> Result<Option<User>> {
        self.user_repo().get_by_slack_id(slack_user_id).await
    }

    pub async fn create_user_if_absent(&self, slack_user: &SlackUser) -> Result<User> {
        self.user_repo().create_if_absent(slack_user).await
    }

    pub async fn count_users(&self) -> Result<u64> {
        self.user_repo().count().await
    }

    // Tasks

    pub async fn list_tasks(&self) -> Result<Vec<Task>> {
        self.task_repo().list_all().await
    }

    pub async fn list_tasks_by_creator(&self, creator_id: i32) -> Result<Vec<Task>> {
        self.task_repo().list_by_creator(creator_id).await
    }

    pub async fn get_task(&self, id: i32) -> Result<Option<Task>> {
        self.task_repo().get(id).await
    }

    pub async fn create_task(
        &self,
        content: &str,
        status: TaskStatus,
        creator_id: i32,
    ) -> Result<Task> {
        self.task_repo().create(content, status, creator_id).await
    }

    pub async fn update_task_content(&self, id: i32, content: &str) -> Result<Option<Task>> {
        self.task_repo().update_content(id, content).await
    }

    pub async fn delete_task_for_creator(&self, creator_id: i32, task_id: i32) -> Result<u64> {
        self.task_repo().delete_for_creator(creator_id, task_id).await
    }

    pub async fn delete_task(&self, id: i32) -> Result<bool> {
        self.task_repo().delete(id).await
    }

    pub async fn clear_tasks(&self) -> Result<u64> {
        self.task_repo().delete_all().await
    }
}

/// A migrated store on a throwaway SQLite file.
#[cfg(test)]
pub(crate) async fn test_store() -> Store {
    let path = std::env::temp_dir().join(format!(
        "task-reminder-unit-{}.db",
        uuid::Uuid::new_v4()
    ));
    Store::new(&format!("sqlite:{}", path.display()))
        .await
        .expect("failed to open test store")
}
