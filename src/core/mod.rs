//! Core types shared across the crate
//!
//! Contains the tree configuration and the error type

mod config;
mod error;

pub use config::TreeConfig;
pub use error::TreeError;
