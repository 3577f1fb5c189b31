pub mod client;
pub mod factory;
pub mod interface;

pub use factory::OcrFactory;
pub use interface::{FragmentStream, TextDetector};

#[cfg(test)]
pub use interface::MockTextDetector;
