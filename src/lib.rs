pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;

pub use adapters::{RawStoreClient, StoreTransport, TypedStoreClient};
pub use app::build_router;
pub use crate::core::service::ProductService;
pub use utils::error::{ApiError, Result};
