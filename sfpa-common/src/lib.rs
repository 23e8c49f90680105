//! # SFPA Common Library
//!
//! Shared code for the profile access tooling:
//! - Error types
//! - Configuration file schema and loading
//! - Configuration path resolution

pub mod config;
pub mod error;

pub use error::{Error, Result};
