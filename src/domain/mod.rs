//! Core domain types and logic.

pub mod config_validation;
pub mod error;
pub mod market;
pub mod sample_data;
pub mod security;
pub mod shared;
pub mod snapshot;
pub mod trade;
pub mod universe;
