//! State management module
//!
//! The persisted record, its phases, the view surfaces render from it, and
//! the HTTP surface's application state.

pub mod app_state;
pub mod phase;
pub mod record;
pub mod timer_state;

// Re-export main types
pub use app_state::AppState;
pub use phase::Phase;
pub use record::{Segment, TimerStateRecord};
pub use timer_state::TimerView;
