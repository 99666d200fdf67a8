pub mod blob_store;
pub mod product_normalizer;
pub mod product_service;
pub mod storefront_service;

pub use blob_store::{BlobStore, DiskBlobStore};
pub use product_service::ProductService;
pub use storefront_service::StorefrontService;
