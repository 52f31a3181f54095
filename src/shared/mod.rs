//! Shared cross-layer utilities

pub mod shutdown;

pub use shutdown::{ShutdownCoordinator, ShutdownSignal};
