//! CLI command handlers
//!
//! This module contains the argument structures, the command router and
//! logging helpers for the `rfm-dashboard` binary.

pub mod args;
pub mod help;
pub mod router;

pub use args::{Cli, Commands};
pub use help::get_log_level;
pub use router::{execute_command, run_query, Backend};
