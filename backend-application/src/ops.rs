pub mod cleanup_scheduler;
pub mod server_status_cell;

pub use cleanup_scheduler::*;
pub use server_status_cell::*;
