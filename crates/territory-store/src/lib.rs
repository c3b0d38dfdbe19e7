//! Store adapters implementing the territory-core persistence port.
//!
//! Currently ships an in-memory adapter, used by tests and embedders that
//! bring their own persistence.

pub mod memory;

pub use memory::MemoryStore;
