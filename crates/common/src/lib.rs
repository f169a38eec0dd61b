//! Shared helpers for the academic records workspace.

pub mod pagination;
pub mod utils;
