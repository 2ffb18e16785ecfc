//! Bento: the board layout engine behind "creative" creator profiles.
//!
//! A profile's creative mode is a freeform widget board. Every widget carries
//! two independent layouts, one per viewport (desktop and mobile), and each
//! viewport has its own occupancy grid. This crate owns the grid bookkeeping:
//! deciding where widgets fit, scanning for free positions, and keeping the two
//! viewports coherent under every mutation. It performs no I/O; persistence and
//! rendering are external collaborators that consume the in-memory state.
//!
//! The engine is single-threaded and single-writer: mutations run to
//! completion on one logical actor, and the only concurrent activity is the
//! external save the caller dispatches once the debounced [`SaveScheduler`]
//! reports a save as due.

pub mod autosave;
pub mod board;
pub mod persist;

pub use autosave::{ChangeNotifier, Clock, NullNotifier, SaveScheduler};
pub use board::grid::Grid;
pub use board::widget::{
    Layouts, Viewport, Widget, WidgetId, WidgetLayout, WidgetSize, MAX_WIDGET_WIDTH,
};
pub use board::{Board, Options, PlaceOutcome, ResizeOutcome};
pub use persist::{BoardDocument, UserProfile};
