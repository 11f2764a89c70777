//! # Adapters Layer

mod memory_backend;

pub use memory_backend::InMemoryPartitionBackend;
