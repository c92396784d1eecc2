//! Middleware module
//!
//! This module contains middleware for request processing

pub mod cancellation;
pub mod logging;

// Re-export commonly used middleware
pub use cancellation::{RequestCancellation, ShutdownToken};
pub use logging::{trace_layer, RequestSpan};
