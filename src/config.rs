//! 运行配置
//!
//! 启动时从 `.env` 和进程环境变量读取一次。

use std::env;
use std::str::FromStr;

/// 服务配置
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// 数据库配置
    pub database: DatabaseConfig,
    /// HTTP 服务配置
    pub http: HttpConfig,
    /// 默认日志过滤指令，`RUST_LOG` 存在时被覆盖
    pub log_directive: String,
}

/// 数据库配置
#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    /// 连接池最大连接数
    pub max_connections: u32,
    /// 启动时执行 CREATE TABLE IF NOT EXISTS
    pub bootstrap_schema: bool,
}

/// HTTP 服务配置
#[derive(Debug, Clone, PartialEq)]
pub struct HttpConfig {
    pub bind_address: String,
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            http: HttpConfig::default(),
            log_directive: "info".to_string(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: String::new(),
            name: "postgres".to_string(),
            max_connections: 10,
            bootstrap_schema: false,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 4000,
        }
    }
}

/// 配置错误类型
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
    #[error("config validation failed: {0}")]
    Validation(String),
}

impl Config {
    /// 读取 `.env`（若存在）后从进程环境加载
    pub fn from_env() -> Result<Self, ConfigError> {
        // .env 缺失不是错误
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 从任意键值来源加载，未设置的键使用默认值
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let database = DatabaseConfig {
            host: lookup("DB_HOST").unwrap_or(defaults.database.host),
            port: parse_or(&lookup, "DB_PORT", defaults.database.port)?,
            user: lookup("DB_USER").unwrap_or(defaults.database.user),
            password: lookup("DB_PASS").unwrap_or(defaults.database.password),
            name: lookup("DB_NAME").unwrap_or(defaults.database.name),
            max_connections: parse_or(
                &lookup,
                "DB_MAX_CONNECTIONS",
                defaults.database.max_connections,
            )?,
            bootstrap_schema: parse_or(
                &lookup,
                "DB_BOOTSTRAP_SCHEMA",
                defaults.database.bootstrap_schema,
            )?,
        };

        let http = HttpConfig {
            bind_address: defaults.http.bind_address,
            port: parse_or(&lookup, "PORT", defaults.http.port)?,
        };

        let config = Config {
            database,
            http,
            log_directive: defaults.log_directive,
        };
        config.validate()?;
        Ok(config)
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.host.is_empty() {
            return Err(ConfigError::Validation("DB_HOST must not be empty".to_string()));
        }
        if self.database.name.is_empty() {
            return Err(ConfigError::Validation("DB_NAME must not be empty".to_string()));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Validation(
                "DB_MAX_CONNECTIONS must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.http.bind_address, self.http.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value }),
    }
}
