//! 数据库基础设施

use sqlx::{
    postgres::{PgConnectOptions, PgPool, PgPoolOptions},
    Postgres, QueryBuilder,
};
use tracing::info;

use crate::config::DatabaseConfig;

/// 连接池管理器
///
/// 在 `main` 中显式创建，连接池句柄通过构造函数注入各个仓储。
pub struct DatabaseManager {
    pool: PgPool,
}

impl DatabaseManager {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.name);

        info!(
            "连接数据库 {}@{}:{}/{} (max_connections={})",
            config.user, config.host, config.port, config.name, config.max_connections
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// 开发环境用的建表引导，不是迁移工具
    pub async fn ensure_schema(&self) -> Result<(), sqlx::Error> {
        info!("创建数据表 (IF NOT EXISTS)...");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS "User" (
                id SERIAL PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                password TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS "Product" (
                id SERIAL PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT,
                price NUMERIC(12, 2) NOT NULL,
                stock INTEGER NOT NULL DEFAULT 0
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("数据库连接池已关闭");
    }
}

/// 存储层错误分类
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    #[error("store unavailable: {0}")]
    Unavailable(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            if db.is_unique_violation() {
                return StoreError::UniqueViolation {
                    constraint: db.constraint().unwrap_or_default().to_string(),
                };
            }
        }
        StoreError::Unavailable(err)
    }
}

/// 可绑定到更新语句的列值
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(String),
    NullableText(Option<String>),
    Float(f64),
    Int(i32),
}

/// 部分更新语句：按顺序记录 (列名, 值)，只包含调用方提供的字段
#[derive(Debug, Clone)]
pub struct UpdateStatement {
    table: &'static str,
    returning: &'static str,
    assignments: Vec<(&'static str, SqlValue)>,
}

impl UpdateStatement {
    pub fn new(table: &'static str, returning: &'static str) -> Self {
        Self {
            table,
            returning,
            assignments: Vec::new(),
        }
    }

    /// `value` 为 `None` 时跳过该列
    pub fn set(mut self, column: &'static str, value: Option<SqlValue>) -> Self {
        if let Some(value) = value {
            self.assignments.push((column, value));
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn columns(&self) -> Vec<&'static str> {
        self.assignments.iter().map(|(column, _)| *column).collect()
    }

    /// 生成 `UPDATE "<table>" SET a = $1, b = $2 WHERE id = $n RETURNING ...`
    pub fn build(&self, id: i32) -> QueryBuilder<'static, Postgres> {
        let mut builder = QueryBuilder::new(format!("UPDATE \"{}\" SET ", self.table));

        let mut separated = builder.separated(", ");
        for (column, value) in &self.assignments {
            separated.push(format!("{column} = "));
            match value.clone() {
                SqlValue::Text(v) => separated.push_bind_unseparated(v),
                SqlValue::NullableText(v) => separated.push_bind_unseparated(v),
                SqlValue::Float(v) => separated.push_bind_unseparated(v),
                SqlValue::Int(v) => separated.push_bind_unseparated(v),
            };
        }

        builder.push(" WHERE id = ");
        builder.push_bind(id);
        builder.push(" RETURNING ");
        builder.push(self.returning);
        builder
    }
}
