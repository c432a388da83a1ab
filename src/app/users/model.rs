//! 用户数据模型

use serde::{Deserialize, Serialize};
use validator::Validate;

/// `"User"` 表的一行，`password` 为存储的哈希串
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub password: String,
}

/// 去掉密码字段后的用户，用于登录响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: i32,
    pub name: String,
    pub email: String,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

// 创建用户请求
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(
        required(message = "name is required"),
        length(min = 1, message = "name is required")
    )]
    pub name: Option<String>,

    #[validate(
        required(message = "email is required"),
        length(min = 1, message = "email is required")
    )]
    pub email: Option<String>,

    #[validate(
        required(message = "password is required"),
        length(min = 1, message = "password is required")
    )]
    pub password: Option<String>,
}

// 更新用户请求，缺省或 null 的字段保持不变
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,

    #[validate(length(min = 1, message = "email must not be empty"))]
    pub email: Option<String>,

    #[validate(length(min = 1, message = "password must not be empty"))]
    pub password: Option<String>,
}

impl UpdateUserRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.password.is_none()
    }
}

// 登录请求
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(
        required(message = "email is required"),
        length(min = 1, message = "email is required")
    )]
    pub email: Option<String>,

    #[validate(
        required(message = "password is required"),
        length(min = 1, message = "password is required")
    )]
    pub password: Option<String>,
}

/// 已校验、已哈希的新用户
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// 已校验的部分更新
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}
