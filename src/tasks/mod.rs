//! Background tasks module
//!
//! This module contains background tasks that run alongside the HTTP server.

pub mod widget;

// Re-export main functions
pub use widget::{spawn_widget, status_line};
