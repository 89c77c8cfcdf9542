// Application layer: HTTP wiring for the product service.

pub mod routes;

pub use routes::build_router;
