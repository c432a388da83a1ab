//! 用户资源

pub mod handler;
pub mod model;
pub mod repository;
pub mod service;

pub use model::{PublicUser, User};
pub use repository::{PgUserRepository, UserRepository};
pub use service::UserService;
