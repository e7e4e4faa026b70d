pub mod coordinator;
pub mod resolver;
pub mod session;
pub mod sync;

pub use coordinator::{DropTarget, ReorderCoordinator, ReorderRequest};
pub use resolver::{nearest_indicator, DISTANCE_OFFSET};
pub use session::DragSession;
pub use sync::BoardView;
