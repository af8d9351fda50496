//! Core type definitions used across the workspace.

pub mod filter;
pub mod pagination;

pub use filter::{FilterField, FilterOp, FilterValue};
pub use pagination::{PageRequest, PageResponse};
