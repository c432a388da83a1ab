//! 产品资源

pub mod handler;
pub mod model;
pub mod repository;
pub mod service;

pub use model::Product;
pub use repository::{PgProductRepository, ProductRepository};
pub use service::ProductService;
