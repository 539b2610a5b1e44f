use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::info;

use crate::entities::{prelude::*, tasks};
use crate::models::task::{Task, TaskStatus};

/// Repository for task rows.
///
/// Only [`TaskRepository::list_by_creator`] and
/// [`TaskRepository::delete_for_creator`] are scoped to an owner; the rest
/// act on any row by id.
pub struct TaskRepository {
    conn: DatabaseConnection,
}

impl TaskRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(model: tasks::Model) -> Task {
        Task {
            id: model.id,
            status: TaskStatus::from_stored(&model.status),
            content: model.content,
            creator_id: model.creator_id,
            created: model.created,
            last_modified: model.last_modified,
        }
    }

    pub async fn list_all(&self) -> Result<Vec<Task>> {
        let rows = Tasks::find()
            .order_by_asc(tasks::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list tasks")?;

        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    pub async fn list_by_creator(&self, creator_id: i32) -> Result<Vec<Task>> {
        let rows = Tasks::find()
            .filter(tasks::Column::CreatorId.eq(creator_id))
            .order_by_asc(tasks::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list tasks for creator")?;

        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    pub async fn get(&self, id: i32) -> Result<Option<Task>> {
        let row = Tasks::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query task by ID")?;

        Ok(row.map(Self::map_model))
    }

    pub async fn create(&self, content: &str, status: TaskStatus, creator_id: i32) -> Result<Task> {
        let now = chrono::Utc::now().to_rfc3339();

        let active_model = tasks::ActiveModel {
            content: Set(content.to_string()),
            status: Set(status.as_str().to_string()),
            creator_id: Set(creator_id),
            created: Set(now.clone()),
            last_modified: Set(now),
            ..Default::default()
        };

        let model = active_model
            .insert(&self.conn)
            .await
            .context("Failed to insert task")?;

        info!(task_id = model.id, creator_id, "Added task");
        Ok(Self::map_model(model))
    }

    /// Replaces the content of a task, leaving every other column except
    /// `last_modified` as it was. Returns `None` when the id is unknown.
    pub async fn update_content(&self, id: i32, content: &str) -> Result<Option<Task>> {
        let Some(existing) = Tasks::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query task for update")?
        else {
            return Ok(None);
        };

        let mut active: tasks::ActiveModel = existing.into();
        active.content = Set(content.to_string());
        active.last_modified = Set(chrono::Utc::now().to_rfc3339());
        let model = active
            .update(&self.conn)
            .await
            .context("Failed to update task")?;

        Ok(Some(Self::map_model(model)))
    }

    /// Deletes the task with `task_id` only if it belongs to `creator_id`.
    /// Returns the number of rows removed, which may be zero.
    pub async fn delete_for_creator(&self, creator_id: i32, task_id: i32) -> Result<u64> {
        let result = Tasks::delete_many()
            .filter(tasks::Column::CreatorId.eq(creator_id))
            .filter(tasks::Column::Id.eq(task_id))
            .exec(&self.conn)
            .await
            .context("Failed to delete task for creator")?;

        info!(
            creator_id,
            task_id,
            deleted = result.rows_affected,
            "Deleted tasks for creator"
        );
        Ok(result.rows_affected)
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = Tasks::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete task")?;

        Ok(result.rows_affected > 0)
    }

    pub async fn delete_all(&self) -> Result<u64> {
        let result = Tasks::delete_many()
            .exec(&self.conn)
            .await
            .context("Failed to clear tasks")?;

        info!(deleted = result.rows_affected, "Cleared task table");
        Ok(result.rows_affected)
    }
}
