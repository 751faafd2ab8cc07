pub mod clamav;
pub mod publisher;
pub mod safety;
pub mod scanner;

pub use clamav::ClamAVService;
pub use publisher::BlobPublisher;
pub use safety::ContentSafetyPipeline;
pub use scanner::{ContentScanner, ScanResult};
