// Adapters layer: concrete document store clients behind the `DocumentStore` port.

pub mod raw_client;
pub mod transport;
pub mod typed_api;
pub mod typed_client;

pub use raw_client::RawStoreClient;
pub use transport::StoreTransport;
pub use typed_client::TypedStoreClient;
