use crate::{
    domain::{Board, BoardId, ColumnId, PlacementKey, Task, TaskId},
    error::Result,
};
use async_trait::async_trait;

pub mod memory;

#[cfg(feature = "sqlite-storage")]
pub mod sqlite;

/// Storage trait for boards, tasks, and the reorder operations behind
/// drag-and-drop
#[async_trait]
pub trait BoardStore: Send + Sync {
    /// Initializes the storage backend
    async fn initialize(&self) -> Result<()>;

    /// Saves a board and its columns
    async fn save_board(&self, board: &Board) -> Result<()>;

    /// Loads a board by id
    async fn load_board(&self, id: BoardId) -> Result<Board>;

    /// Saves a task
    async fn save_task(&self, task: &Task) -> Result<()>;

    /// Loads a task by ID
    async fn load_task(&self, id: &TaskId) -> Result<Task>;

    /// Deletes a task (the burn-barrel drop target lands here)
    async fn delete_task(&self, id: &TaskId) -> Result<()>;

    /// All tasks on a board, unsorted
    async fn board_tasks(&self, board_id: BoardId) -> Result<Vec<Task>>;

    /// Tasks under one placement key, in display order
    async fn column_tasks(&self, placement: &PlacementKey) -> Result<Vec<Task>>;

    /// Atomically moves a task to `placement` so that it sorts at `index`
    /// within the destination column, renumbering the destination as a dense
    /// 0..n-1 sequence. Same-column reorders and cross-column moves use the
    /// same call. An index past the end appends. All-or-nothing: a failed
    /// call leaves every order value untouched.
    async fn reorder_task(
        &self,
        task_id: &TaskId,
        placement: &PlacementKey,
        index: usize,
    ) -> Result<()>;

    /// Atomically moves a column to `to_index`, renumbering the whole
    /// sibling set so positions stay dense
    async fn move_column(
        &self,
        board_id: BoardId,
        column_id: ColumnId,
        to_index: usize,
    ) -> Result<()>;
}
