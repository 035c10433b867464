//! Command handlers
//!
//! Each command handler orchestrates the execution of a CLI command.

pub mod connections;
pub mod notify;
pub mod send;
pub mod validate;

pub use connections::run_connections;
pub use notify::run_notify;
pub use send::run_send;
pub use validate::run_validate;
