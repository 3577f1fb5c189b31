pub mod client;
pub mod factory;
pub mod interface;
pub mod local;
pub mod memory;

pub use factory::StorageFactory;
pub use interface::ObjectStore;

#[cfg(test)]
pub use interface::MockObjectStore;
#[cfg(test)]
pub use memory::MemoryObjectStore;
