//! # Domain Module
//!
//! Call vocabulary, responses and errors of the Visibility Gate.

pub mod calls;
pub mod errors;
pub mod value_objects;

pub use calls::*;
pub use errors::*;
pub use value_objects::*;
