pub mod loader;
pub mod store;

pub use loader::{load_hierarchy_store, HierarchySource};
pub use store::{HierarchyStore, InMemoryHierarchyStore};
