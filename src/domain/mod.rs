pub mod board;
pub mod indicator;
pub mod sorting;
pub mod task;

pub use board::{Board, BoardId, Column, ColumnId, Visibility};
pub use indicator::{BeforeMarker, DropIndicator, IndicatorRegistry};
pub use sorting::sort_tasks;
pub use task::{PlacementKey, Task, TaskId, TaskStatus};
