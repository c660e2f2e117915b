//! `mittiscan-store`: history of analyzed soil cards.

pub mod record;
pub mod store;

pub use record::{PlatformMetrics, ScanRecord};
pub use store::ScanStore;
