use serde::Serialize;

use crate::models::task::{Task, TaskStatus};

/// A legacy Slack message attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlackAttachment {
    pub fallback: String,
    pub title: String,
    pub text: String,
    pub color: String,
    pub fields: Vec<AttachmentField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ts: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttachmentField {
    pub title: String,
    pub value: String,
    pub short: bool,
}

const fn status_color(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::ToDo => "#439FE0",
        TaskStatus::InProgress => "warning",
        TaskStatus::Done => "good",
    }
}

impl From<&Task> for SlackAttachment {
    fn from(task: &Task) -> Self {
        let ts = chrono::DateTime::parse_from_rfc3339(&task.created)
            .ok()
            .map(|created| created.timestamp());

        Self {
            fallback: format!("#{} [{}] {}", task.id, task.status, task.content),
            title: format!("#{}", task.id),
            text: task.content.clone(),
            color: status_color(task.status).to_string(),
            fields: vec![AttachmentField {
                title: "Status".to_string(),
                value: task.status.to_string(),
                short: true,
            }],
            ts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(status: TaskStatus, created: &str) -> Task {
        Task {
            id: 12,
            content: "water the plants".to_string(),
            status,
            creator_id: 1,
            created: created.to_string(),
            last_modified: created.to_string(),
        }
    }

    #[test]
    fn renders_id_content_and_status() {
        let attachment = SlackAttachment::from(&task(TaskStatus::ToDo, "2026-10-01T12:00:00+00:00"));

        assert_eq!(attachment.title, "#12");
        assert_eq!(attachment.text, "water the plants");
        assert_eq!(attachment.fallback, "#12 [ToDo] water the plants");
        assert_eq!(attachment.fields[0].value, "ToDo");
        assert_eq!(attachment.ts, Some(1_790_856_000));
    }

    #[test]
    fn color_follows_status() {
        let created = "2026-10-01T12:00:00+00:00";
        assert_eq!(SlackAttachment::from(&task(TaskStatus::Done, created)).color, "good");
        assert_eq!(
            SlackAttachment::from(&task(TaskStatus::InProgress, created)).color,
            "warning"
        );
    }

    #[test]
    fn unparseable_timestamp_is_omitted() {
        let attachment = SlackAttachment::from(&task(TaskStatus::ToDo, "yesterday"));
        let json = serde_json::to_value(&attachment).unwrap();
        assert!(json.get("ts").is_none());
    }
}
