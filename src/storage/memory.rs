use crate::{
    domain::{sorting::sort_tasks, Board, BoardId, ColumnId, PlacementKey, Task, TaskId},
    error::{Result, TaskrailError},
    storage::BoardStore,
};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-memory storage backend.
///
/// Every mutation takes the single write lock. Two concurrent reorders
/// serialize, and each computes its destination against a fresh read.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    boards: HashMap<BoardId, Board>,
    tasks: HashMap<TaskId, Task>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BoardStore for MemoryStore {
    async fn initialize(&self) -> Result<()> {
        Ok(())
    }

    async fn save_board(&self, board: &Board) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.boards.insert(board.id, board.clone());
        Ok(())
    }

    async fn load_board(&self, id: BoardId) -> Result<Board> {
        let inner = self.inner.read().await;
        inner
            .boards
            .get(&id)
            .cloned()
            .ok_or(TaskrailError::BoardNotInitialized)
    }

    async fn save_task(&self, task: &Task) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.tasks.insert(task.id.clone(), task.clone());
        Ok(())
    }

    async fn load_task(&self, id: &TaskId) -> Result<Task> {
        let inner = self.inner.read().await;
        inner
            .tasks
            .get(id)
            .cloned()
            .ok_or_else(|| TaskrailError::TaskNotFound(id.to_string()))
    }

    async fn delete_task(&self, id: &TaskId) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner
            .tasks
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| TaskrailError::TaskNotFound(id.to_string()))
    }

    async fn board_tasks(&self, board_id: BoardId) -> Result<Vec<Task>> {
        let inner = self.inner.read().await;
        Ok(inner
            .tasks
            .values()
            .filter(|task| task.board_id == board_id)
            .cloned()
            .collect())
    }

    async fn column_tasks(&self, placement: &PlacementKey) -> Result<Vec<Task>> {
        let inner = self.inner.read().await;
        let mut tasks: Vec<Task> = inner
            .tasks
            .values()
            .filter(|task| &task.placement == placement)
            .cloned()
            .collect();
        sort_tasks(&mut tasks);
        Ok(tasks)
    }

    async fn reorder_task(
        &self,
        task_id: &TaskId,
        placement: &PlacementKey,
        index: usize,
    ) -> Result<()> {
        let mut inner = self.inner.write().await;

        if !inner.tasks.contains_key(task_id) {
            return Err(TaskrailError::TaskNotFound(task_id.to_string()));
        }

        // Destination column in display order, without the moved task
        let mut destination: Vec<Task> = inner
            .tasks
            .values()
            .filter(|task| &task.placement == placement && &task.id != task_id)
            .cloned()
            .collect();
        sort_tasks(&mut destination);

        let mut ids: Vec<TaskId> = destination.into_iter().map(|task| task.id).collect();
        let slot = index.min(ids.len());
        ids.insert(slot, task_id.clone());

        // Dense renumber; the source column keeps its gap and relative order
        for (new_order, id) in ids.iter().enumerate() {
            if let Some(task) = inner.tasks.get_mut(id) {
                if id == task_id {
                    task.move_to(placement.clone(), new_order as i64);
                } else {
                    task.order = new_order as i64;
                }
            }
        }

        tracing::debug!(task = %task_id, column = %placement, index = slot, "reordered task");
        Ok(())
    }

    async fn move_column(
        &self,
        board_id: BoardId,
        column_id: ColumnId,
        to_index: usize,
    ) -> Result<()> {
        let mut inner = self.inner.write().await;
        let board = inner
            .boards
            .get_mut(&board_id)
            .ok_or(TaskrailError::BoardNotInitialized)?;
        board.move_column(column_id, to_index)
    }
}
