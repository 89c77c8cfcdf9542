pub mod service;

pub use crate::domain::{DocumentStore, Product};
pub use crate::utils::error::Result;
pub use service::ProductService;
