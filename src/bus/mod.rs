pub mod client;
pub mod factory;
pub mod interface;
pub mod memory;

pub use factory::PublisherFactory;
pub use interface::{OutboundMessage, Publisher};

#[cfg(test)]
pub use interface::MockPublisher;
#[cfg(test)]
pub use memory::MemoryPublisher;
