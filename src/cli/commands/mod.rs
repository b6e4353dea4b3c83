//! Subcommands of the `aqtion` binary

pub mod render;
pub mod train;
