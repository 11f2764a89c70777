//! # Domain Module
//!
//! Core domain types for the Private State Store.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
