//! 基础设施层：数据库连接池、日志、密码哈希

pub mod database;
pub mod logger;
pub mod password;
