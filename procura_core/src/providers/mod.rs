//! Provider adapter implementations.
//!
//! Each submodule owns one external integration. Adapters return raw hits
//! in their upstream's native shape; the paired mapper in `normalize/`
//! turns those into canonical results.

pub mod amazon;
pub mod directory;
pub mod ebay;
pub mod google_shopping;
pub mod mock;

pub use amazon::AmazonCatalogProvider;
pub use directory::VendorDirectoryProvider;
pub use ebay::EbayBrowseProvider;
pub use google_shopping::GoogleShoppingProvider;
pub use mock::MockShoppingProvider;

pub(crate) const USER_AGENT: &str = concat!("procura/", env!("CARGO_PKG_VERSION"));
