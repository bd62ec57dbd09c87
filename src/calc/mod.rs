pub mod grid;
pub mod plan_index;
pub mod view_window;

pub use grid::{CalendarGrid, GridCell, build_grid};
pub use plan_index::{IndexedDay, PlanIndex, build_index};
pub use view_window::ViewMode;
