//! Media store implementations.

mod memory;

pub use memory::InMemoryMediaStore;
