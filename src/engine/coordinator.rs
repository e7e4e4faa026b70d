use crate::domain::indicator::BeforeMarker;
use crate::domain::task::{PlacementKey, TaskId};
use crate::engine::sync::BoardView;
use crate::error::Result;
use crate::storage::BoardStore;
use tracing::{debug, warn};

/// Where a drop landed: a column (reorder/move) or the burn barrel (delete)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    Column(PlacementKey),
    BurnBarrel,
}

/// A planned persistence call: move `task_id` so it sorts at `index` within
/// `placement`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorderRequest {
    pub task_id: TaskId,
    pub placement: PlacementKey,
    pub index: usize,
}

/// Turns a resolved "insert before X" decision into a concrete order index
/// and drives persistence. Exactly one store call is made per completed
/// drop, none for cancelled ones.
pub struct ReorderCoordinator<S> {
    store: S,
}

impl<S: BoardStore> ReorderCoordinator<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Converts a drop into a reorder request against the already-loaded
    /// view. Returns `None` when the drop is a no-op: the before-marker
    /// names the dragged task itself, or names a task the view no longer
    /// knows (stale state; the next refetch reconciles).
    pub fn plan_drop(
        &self,
        view: &BoardView,
        task_id: &TaskId,
        placement: &PlacementKey,
        before: &BeforeMarker,
    ) -> Option<ReorderRequest> {
        let index = match before {
            BeforeMarker::Task(before_id) if before_id == task_id => return None,
            BeforeMarker::Task(before_id) => view.index_of(placement, before_id)?,
            BeforeMarker::End => view.column_len(placement),
        };

        Some(ReorderRequest {
            task_id: task_id.clone(),
            placement: placement.clone(),
            index,
        })
    }

    /// Finalizes a drop: patches the view optimistically, issues the single
    /// persistence call, then reconciles with a refetch. On persistence
    /// failure the refetch restores the authoritative order (the card snaps
    /// back) and the error propagates for the caller's notification layer.
    ///
    /// Returns `Ok(true)` when a persistence call was made, `Ok(false)` for
    /// a cancelled drop.
    pub async fn complete_drop(
        &self,
        view: &mut BoardView,
        target: DropTarget,
        task_id: TaskId,
        before: BeforeMarker,
    ) -> Result<bool> {
        match target {
            DropTarget::BurnBarrel => {
                debug!(task = %task_id, "burn barrel drop, deleting task");
                view.remove_task(&task_id);
                let outcome = self.store.delete_task(&task_id).await;
                if let Err(err) = &outcome {
                    warn!(task = %task_id, error = %err, "delete failed");
                }
                self.refetch(view).await?;
                outcome.map(|()| true)
            }
            DropTarget::Column(placement) => {
                let Some(request) = self.plan_drop(view, &task_id, &placement, &before) else {
                    debug!(task = %task_id, "drop resolved to a no-op");
                    return Ok(false);
                };

                debug!(
                    task = %request.task_id,
                    column = %request.placement,
                    index = request.index,
                    "committing reorder"
                );
                view.apply_local_move(&request.task_id, &request.placement, request.index);
                let outcome = self
                    .store
                    .reorder_task(&request.task_id, &request.placement, request.index)
                    .await;
                if let Err(err) = &outcome {
                    warn!(task = %request.task_id, error = %err, "reorder failed, board snaps back on refetch");
                }
                self.refetch(view).await?;
                outcome.map(|()| true)
            }
        }
    }

    /// Replaces the view with the store's authoritative task list
    pub async fn refetch(&self, view: &mut BoardView) -> Result<()> {
        let tasks = self.store.board_tasks(view.board_id()).await?;
        view.replace(tasks);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::board::{BoardId, ColumnId};
    use crate::domain::task::{Task, TaskStatus};
    use crate::storage::memory::MemoryStore;
    use crate::storage::BoardStore;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Wraps a MemoryStore and counts persistence calls
    struct CountingStore {
        inner: MemoryStore,
        reorders: AtomicUsize,
        deletes: AtomicUsize,
    }

    impl CountingStore {
        fn new(inner: MemoryStore) -> Self {
            Self {
                inner,
                reorders: AtomicUsize::new(0),
                deletes: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl BoardStore for CountingStore {
        async fn initialize(&self) -> crate::error::Result<()> {
            self.inner.initialize().await
        }

        async fn save_board(&self, board: &crate::domain::Board) -> crate::error::Result<()> {
            self.inner.save_board(board).await
        }

        async fn load_board(&self, id: BoardId) -> crate::error::Result<crate::domain::Board> {
            self.inner.load_board(id).await
        }

        async fn save_task(&self, task: &Task) -> crate::error::Result<()> {
            self.inner.save_task(task).await
        }

        async fn load_task(&self, id: &TaskId) -> crate::error::Result<Task> {
            self.inner.load_task(id).await
        }

        async fn delete_task(&self, id: &TaskId) -> crate::error::Result<()> {
            self.deletes.fetch_add(1, Ordering::SeqCst);
            self.inner.delete_task(id).await
        }

        async fn board_tasks(&self, board_id: BoardId) -> crate::error::Result<Vec<Task>> {
            self.inner.board_tasks(board_id).await
        }

        async fn column_tasks(
            &self,
            placement: &PlacementKey,
        ) -> crate::error::Result<Vec<Task>> {
            self.inner.column_tasks(placement).await
        }

        async fn reorder_task(
            &self,
            task_id: &TaskId,
            placement: &PlacementKey,
            index: usize,
        ) -> crate::error::Result<()> {
            self.reorders.fetch_add(1, Ordering::SeqCst);
            self.inner.reorder_task(task_id, placement, index).await
        }

        async fn move_column(
            &self,
            board_id: BoardId,
            column_id: ColumnId,
            to_index: usize,
        ) -> crate::error::Result<()> {
            self.inner.move_column(board_id, column_id, to_index).await
        }
    }

    async fn seeded() -> (ReorderCoordinator<CountingStore>, BoardView, BoardId) {
        let board_id = BoardId::new();
        let todo = PlacementKey::Status(TaskStatus::Todo);
        let store = MemoryStore::new();
        for (counter, order) in [(1, 0), (2, 1), (3, 2)] {
            store
                .save_task(&Task::new(
                    TaskId::new(counter),
                    board_id,
                    format!("Task {}", counter),
                    todo.clone(),
                    order,
                ))
                .await
                .unwrap();
        }
        let tasks = store.board_tasks(board_id).await.unwrap();
        let coordinator = ReorderCoordinator::new(CountingStore::new(store));
        (coordinator, BoardView::new(board_id, tasks), board_id)
    }

    fn ids(view: &BoardView, placement: &PlacementKey) -> Vec<String> {
        view.column(placement)
            .iter()
            .map(|t| t.id.to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_self_drop_is_a_noop_with_no_persistence_call() {
        let (coordinator, mut view, _) = seeded().await;
        let todo = PlacementKey::Status(TaskStatus::Todo);
        let before_move = ids(&view, &todo);

        // Dropping TSK2 onto the indicator directly before itself
        let committed = coordinator
            .complete_drop(
                &mut view,
                DropTarget::Column(todo.clone()),
                TaskId::new(2),
                BeforeMarker::Task(TaskId::new(2)),
            )
            .await
            .unwrap();

        assert!(!committed);
        assert_eq!(coordinator.store().reorders.load(Ordering::SeqCst), 0);
        assert_eq!(ids(&view, &todo), before_move);
    }

    #[tokio::test]
    async fn test_end_marker_appends_at_column_size() {
        let (coordinator, mut view, _) = seeded().await;
        let todo = PlacementKey::Status(TaskStatus::Todo);
        let done = PlacementKey::Status(TaskStatus::Done);

        // Empty destination column: index must be 0
        let request = coordinator
            .plan_drop(&view, &TaskId::new(1), &done, &BeforeMarker::End)
            .unwrap();
        assert_eq!(request.index, 0);

        coordinator
            .complete_drop(
                &mut view,
                DropTarget::Column(done.clone()),
                TaskId::new(1),
                BeforeMarker::End,
            )
            .await
            .unwrap();

        assert_eq!(ids(&view, &done), vec!["TSK1"]);
        // Remaining source tasks keep their relative order
        assert_eq!(ids(&view, &todo), vec!["TSK2", "TSK3"]);
        assert_eq!(coordinator.store().reorders.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_before_marker_lands_at_that_index() {
        let (coordinator, mut view, _) = seeded().await;
        let todo = PlacementKey::Status(TaskStatus::Todo);

        coordinator
            .complete_drop(
                &mut view,
                DropTarget::Column(todo.clone()),
                TaskId::new(3),
                BeforeMarker::Task(TaskId::new(1)),
            )
            .await
            .unwrap();

        assert_eq!(ids(&view, &todo), vec!["TSK3", "TSK1", "TSK2"]);
        let orders: Vec<i64> = view.column(&todo).iter().map(|t| t.order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_cross_column_move_preserves_source_ordering() {
        let (coordinator, mut view, _) = seeded().await;
        let todo = PlacementKey::Status(TaskStatus::Todo);
        let review = PlacementKey::Status(TaskStatus::InReview);

        coordinator
            .complete_drop(
                &mut view,
                DropTarget::Column(review.clone()),
                TaskId::new(2),
                BeforeMarker::End,
            )
            .await
            .unwrap();

        assert_eq!(ids(&view, &todo), vec!["TSK1", "TSK3"]);
        assert_eq!(ids(&view, &review), vec!["TSK2"]);
    }

    #[tokio::test]
    async fn test_stale_before_marker_cancels_the_drop() {
        let (coordinator, view, _) = seeded().await;
        let todo = PlacementKey::Status(TaskStatus::Todo);

        let plan = coordinator.plan_drop(
            &view,
            &TaskId::new(1),
            &todo,
            &BeforeMarker::Task(TaskId::new(42)),
        );

        assert!(plan.is_none());
    }

    #[tokio::test]
    async fn test_burn_barrel_deletes_exactly_once() {
        let (coordinator, mut view, _) = seeded().await;
        let todo = PlacementKey::Status(TaskStatus::Todo);

        coordinator
            .complete_drop(
                &mut view,
                DropTarget::BurnBarrel,
                TaskId::new(2),
                BeforeMarker::End,
            )
            .await
            .unwrap();

        assert_eq!(coordinator.store().deletes.load(Ordering::SeqCst), 1);
        assert_eq!(ids(&view, &todo), vec!["TSK1", "TSK3"]);
    }

    #[tokio::test]
    async fn test_failed_persist_snaps_the_view_back() {
        let (coordinator, mut view, board_id) = seeded().await;
        let todo = PlacementKey::Status(TaskStatus::Todo);

        // A phantom task the store has never seen
        let mut tasks = view.tasks().to_vec();
        tasks.push(Task::new(
            TaskId::new(99),
            board_id,
            "Phantom".to_string(),
            todo.clone(),
            3,
        ));
        view.replace(tasks);

        let result = coordinator
            .complete_drop(
                &mut view,
                DropTarget::Column(todo.clone()),
                TaskId::new(99),
                BeforeMarker::Task(TaskId::new(1)),
            )
            .await;

        assert!(result.is_err());
        // Refetch restored the authoritative, phantom-free order
        assert_eq!(ids(&view, &todo), vec!["TSK1", "TSK2", "TSK3"]);
    }
}
