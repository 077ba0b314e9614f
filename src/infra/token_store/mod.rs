// Implementations of the single-slot token store.

pub mod in_memory;
pub mod json_store;

pub use in_memory::InMemoryTokenStore;
pub use json_store::JsonTokenStore;
