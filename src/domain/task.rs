use crate::domain::board::{BoardId, ColumnId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Unique identifier for a task (e.g., TSK1, TSK2, TSK100)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TaskId(String);

impl TaskId {
    // Default prefix for task IDs (could be made configurable in the future)
    const DEFAULT_PREFIX: &'static str = "TSK";

    /// Creates a new TaskId from a counter
    pub fn new(counter: u32) -> Self {
        Self(format!("{}{}", Self::DEFAULT_PREFIX, counter))
    }

    /// Returns the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for TaskId {
    type Err = crate::error::TaskrailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Convert to uppercase for case-insensitive comparison
        let normalized = s.to_uppercase();
        let prefix = TaskId::DEFAULT_PREFIX;

        if normalized.starts_with(prefix) && normalized.len() > prefix.len() {
            // Verify the rest is a valid number
            if normalized[prefix.len()..].parse::<u32>().is_ok() {
                Ok(Self(normalized))
            } else {
                Err(crate::error::TaskrailError::InvalidTaskId(s.to_string()))
            }
        } else {
            Err(crate::error::TaskrailError::InvalidTaskId(s.to_string()))
        }
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Status of a task on a legacy four-column board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Todo,
    InProgress,
    InReview,
    Done,
}

impl TaskStatus {
    /// Stable string form used as a column key on legacy boards
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "inprogress",
            Self::InReview => "inreview",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Todo => write!(f, "To Do"),
            Self::InProgress => write!(f, "In Progress"),
            Self::InReview => write!(f, "In Review"),
            Self::Done => write!(f, "Done"),
        }
    }
}

impl FromStr for TaskStatus {
    type Err = crate::error::TaskrailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "todo" => Ok(Self::Todo),
            "inprogress" => Ok(Self::InProgress),
            "inreview" => Ok(Self::InReview),
            "done" => Ok(Self::Done),
            _ => Err(crate::error::TaskrailError::InvalidPlacementKey(
                s.to_string(),
            )),
        }
    }
}

/// The column a task currently belongs to: a status on legacy boards, a
/// column id on dynamic boards. A task holds exactly one placement key at a
/// time; a move is a single atomic transition between keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlacementKey {
    Status(TaskStatus),
    Column(ColumnId),
}

impl PlacementKey {
    /// Stable string form shared with the indicator tagging protocol
    pub fn as_key(&self) -> String {
        match self {
            Self::Status(status) => status.as_str().to_string(),
            Self::Column(id) => id.to_string(),
        }
    }
}

impl fmt::Display for PlacementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_key())
    }
}

/// A kanban task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub board_id: BoardId,
    pub title: String,
    pub description: Option<String>,
    pub placement: PlacementKey,
    pub order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new task with the given ID and title, placed in a column
    pub fn new(
        id: TaskId,
        board_id: BoardId,
        title: String,
        placement: PlacementKey,
        order: i64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            board_id,
            title,
            description: None,
            placement,
            order,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the title
    pub fn set_title(&mut self, title: String) {
        self.title = title;
        self.updated_at = Utc::now();
    }

    /// Sets the description
    pub fn set_description(&mut self, description: String) {
        self.description = Some(description);
        self.updated_at = Utc::now();
    }

    /// Moves the task to a placement key and order in one transition
    pub fn move_to(&mut self, placement: PlacementKey, order: i64) {
        self.placement = placement;
        self.order = order;
        self.updated_at = Utc::now();
    }

    /// Key yielding a strict total order within a placement key: `order`
    /// first, ties broken by creation time, then id.
    pub fn sort_key(&self) -> (i64, DateTime<Utc>, &str) {
        (self.order, self.created_at, self.id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_id_creation() {
        let id = TaskId::new(1);
        assert_eq!(id.as_str(), "TSK1");

        let id = TaskId::new(42);
        assert_eq!(id.as_str(), "TSK42");

        let id = TaskId::new(1000);
        assert_eq!(id.as_str(), "TSK1000");
    }

    #[test]
    fn test_task_id_parsing() {
        let id = TaskId::from_str("TSK1").unwrap();
        assert_eq!(id.as_str(), "TSK1");

        let id = TaskId::from_str("TSK123").unwrap();
        assert_eq!(id.as_str(), "TSK123");

        assert!(TaskId::from_str("INVALID").is_err());
        assert!(TaskId::from_str("TSK").is_err());
        assert!(TaskId::from_str("TSKabc").is_err());
    }

    #[test]
    fn test_task_id_parsing_case_insensitive() {
        let id = TaskId::from_str("tsk1").unwrap();
        assert_eq!(id.as_str(), "TSK1");

        let id = TaskId::from_str("Tsk42").unwrap();
        assert_eq!(id.as_str(), "TSK42");

        assert_eq!(
            TaskId::from_str("tsk1").unwrap(),
            TaskId::from_str("TSK1").unwrap()
        );
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            TaskStatus::Todo,
            TaskStatus::InProgress,
            TaskStatus::InReview,
            TaskStatus::Done,
        ] {
            assert_eq!(TaskStatus::from_str(status.as_str()).unwrap(), status);
        }

        assert!(TaskStatus::from_str("archived").is_err());
    }

    #[test]
    fn test_placement_key_string_form() {
        let status_key = PlacementKey::Status(TaskStatus::InReview);
        assert_eq!(status_key.as_key(), "inreview");

        let column_id = ColumnId::new();
        let column_key = PlacementKey::Column(column_id);
        assert_eq!(column_key.as_key(), column_id.to_string());
    }

    #[test]
    fn test_move_to_is_single_transition() {
        let mut task = Task::new(
            TaskId::new(1),
            BoardId::new(),
            "Test".to_string(),
            PlacementKey::Status(TaskStatus::Todo),
            0,
        );

        task.move_to(PlacementKey::Status(TaskStatus::Done), 3);

        assert_eq!(task.placement, PlacementKey::Status(TaskStatus::Done));
        assert_eq!(task.order, 3);
    }

    #[test]
    fn test_move_to_updates_updated_at() {
        let mut task = Task::new(
            TaskId::new(1),
            BoardId::new(),
            "Test".to_string(),
            PlacementKey::Status(TaskStatus::Todo),
            0,
        );
        let initial_updated_at = task.updated_at;

        std::thread::sleep(std::time::Duration::from_millis(10));
        task.move_to(PlacementKey::Status(TaskStatus::Todo), 1);

        assert!(task.updated_at > initial_updated_at);
    }

    #[test]
    fn test_task_serialization_round_trip() {
        let task = Task::new(
            TaskId::new(7),
            BoardId::new(),
            "Serialize me".to_string(),
            PlacementKey::Column(ColumnId::new()),
            2,
        );

        let json = serde_json::to_string(&task).unwrap();
        let deserialized: Task = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.id, task.id);
        assert_eq!(deserialized.placement, task.placement);
        assert_eq!(deserialized.order, task.order);
    }
}
