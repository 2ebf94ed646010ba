//! Blueprint sources held in memory.

mod memory;

pub use memory::InMemoryBlueprintSource;
