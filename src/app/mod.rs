//! Main application modules.
//!
//! This module provides progress logging and shutdown handling used by the
//! extraction job.

pub mod logging;
pub mod shutdown;

// Re-export public API
pub use logging::{log_progress, spawn_progress_logger};
pub use shutdown::shutdown_gracefully;
