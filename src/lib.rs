//! # 用户与产品 CRUD 服务
//!
//! 基于 Axum + SQLx(Postgres) 的 REST 接口：
//! - `/api/users`：用户增删改查与登录
//! - `/api/products`：产品增删改查
//!
//! 分层：`app`（路由、处理器、服务、仓储）→ `core`（错误、中间件、提取器）
//! → `infrastructure`（连接池、日志、密码哈希）。

pub mod app;
pub mod config;
pub mod core;
pub mod infrastructure;

pub use app::{router, AppState};
pub use config::{Config, ConfigError};
pub use crate::core::error::{AppError, AppResult};
