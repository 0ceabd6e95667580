//! CLI subcommand implementations.

pub mod check;
pub mod init;
pub mod list;
pub mod output;
pub mod resolve;
