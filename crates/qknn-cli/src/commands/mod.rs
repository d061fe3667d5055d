//! CLI command implementations.

pub mod backends;
pub mod circuits;
pub mod common;
pub mod run;
pub mod version;
