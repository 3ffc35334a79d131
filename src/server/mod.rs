//! Accept loop and shutdown coordination.

pub mod listener;
pub mod shutdown;

pub use shutdown::{Shutdown, ShutdownTrigger};
