use thiserror::Error;

pub type Result<T> = std::result::Result<T, TaskrailError>;

#[derive(Debug, Error)]
pub enum TaskrailError {
    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Board not initialized")]
    BoardNotInitialized,

    #[error("Invalid task ID format: {0}")]
    InvalidTaskId(String),

    #[error("Invalid board ID format: {0}")]
    InvalidBoardId(String),

    #[error("Invalid placement key: {0}")]
    InvalidPlacementKey(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[cfg(feature = "sqlite-storage")]
    #[error("SQLite error: {0}")]
    SqliteError(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}
