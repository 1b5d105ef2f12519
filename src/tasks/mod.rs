//! Background tasks module
//!
//! This module contains the tick source and the display observers that run
//! alongside the HTTP server.

pub mod display_renderer;
pub mod tick_source;

// Re-export main functions
pub use display_renderer::display_renderer_task;
pub(crate) use tick_source::spawn_tick_source;
