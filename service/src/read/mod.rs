//! Read-side definitions.

pub mod contract;
