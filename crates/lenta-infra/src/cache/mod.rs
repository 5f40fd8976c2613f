//! Rendered-page cache implementations.

mod memory;

pub use memory::InMemoryCache;
