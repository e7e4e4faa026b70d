//! # Taskrail Core
//!
//! Board ordering and drag-and-drop reorder engine for Taskrail kanban
//! boards.
//!
//! This crate provides the fundamental types and operations for ordering
//! tasks within board columns and moving them between columns: the drag
//! session state, the geometric drop-position resolver, the reorder
//! coordinator, and the transactional persistence operation behind them,
//! without any dependency on specific UI implementations.

pub mod domain;
pub mod engine;
pub mod error;
pub mod storage;

// Re-export commonly used types
pub use domain::{
    board::{Board, BoardId, Column, ColumnId, Visibility},
    indicator::{BeforeMarker, DropIndicator, IndicatorRegistry},
    task::{PlacementKey, Task, TaskId, TaskStatus},
};
pub use engine::{
    coordinator::{DropTarget, ReorderCoordinator, ReorderRequest},
    resolver::{nearest_indicator, DISTANCE_OFFSET},
    session::DragSession,
    sync::BoardView,
};
pub use error::{Result, TaskrailError};
pub use storage::BoardStore;
