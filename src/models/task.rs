use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::warn;

/// Workflow state of a task. New tasks start as `ToDo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TaskStatus {
    #[default]
    ToDo,
    InProgress,
    Done,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown task status: {0}")]
pub struct UnknownStatus(pub String);

impl TaskStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ToDo => "ToDo",
            Self::InProgress => "InProgress",
            Self::Done => "Done",
        }
    }

    /// Lenient conversion for values read back from the database.
    ///
    /// Rows written by older clients may carry arbitrary strings; those are
    /// treated as `ToDo` so a single bad row never breaks a listing.
    #[must_use]
    pub fn from_stored(value: &str) -> Self {
        value.parse().unwrap_or_else(|_| {
            warn!(status = %value, "Unrecognised stored task status, using ToDo");
            Self::ToDo
        })
    }
}

impl FromStr for TaskStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ToDo" => Ok(Self::ToDo),
            "InProgress" => Ok(Self::InProgress),
            "Done" => Ok(Self::Done),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    pub id: i32,
    pub content: String,
    pub status: TaskStatus,
    pub creator_id: i32,
    pub created: String,
    pub last_modified: String,
}
