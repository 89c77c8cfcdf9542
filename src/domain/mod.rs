// Domain layer: core models and ports (interfaces). No I/O here.

pub mod model;
pub mod ports;

pub use model::{Acknowledgement, Product, SearchRequest, PRODUCT_INDEX};
pub use ports::{ConfigProvider, DocumentStore};
