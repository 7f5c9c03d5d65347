//! Shared utilities

pub mod format;
pub mod paths;
