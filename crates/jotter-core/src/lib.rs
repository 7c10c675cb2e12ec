//! # jotter-core
//!
//! Core types, traits, and validation rules for the jotter note service.
//!
//! This crate provides the foundational data structures and trait definitions
//! that the storage and HTTP crates depend on.

pub mod error;
pub mod models;
pub mod traits;
pub mod validator;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::*;
pub use traits::*;
pub use validator::{permitted_value, unique, Validator};
