//! 用户仓储：每个操作一条参数化 SQL

use async_trait::async_trait;
use sqlx::PgPool;

use super::model::{NewUser, User, UserChanges};
use crate::infrastructure::database::{SqlValue, StoreError, UpdateStatement};

const USER_COLUMNS: &str = "id, name, email, password";

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// 按 id 升序返回全部用户
    async fn list(&self) -> Result<Vec<User>, StoreError>;
    async fn get(&self, id: i32) -> Result<Option<User>, StoreError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn create(&self, user: NewUser) -> Result<User, StoreError>;
    /// 行不存在时返回 `Ok(None)`
    async fn update(&self, id: i32, changes: UserChanges) -> Result<Option<User>, StoreError>;
    /// 返回是否删除了一行
    async fn delete(&self, id: i32) -> Result<bool, StoreError>;
}

#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// 把部分更新转换成 (列, 值) 列表
pub fn user_update_statement(changes: UserChanges) -> UpdateStatement {
    UpdateStatement::new("User", USER_COLUMNS)
        .set("name", changes.name.map(SqlValue::Text))
        .set("email", changes.email.map(SqlValue::Text))
        .set("password", changes.password_hash.map(SqlValue::Text))
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn list(&self) -> Result<Vec<User>, StoreError> {
        let users = sqlx::query_as::<_, User>(&format!(
            r#"SELECT {USER_COLUMNS} FROM "User" ORDER BY id ASC"#
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    async fn get(&self, id: i32) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"SELECT {USER_COLUMNS} FROM "User" WHERE id = $1"#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"SELECT {USER_COLUMNS} FROM "User" WHERE email = $1"#
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        let created = sqlx::query_as::<_, User>(&format!(
            r#"INSERT INTO "User" (name, email, password) VALUES ($1, $2, $3) RETURNING {USER_COLUMNS}"#
        ))
        .bind(user.name)
        .bind(user.email)
        .bind(user.password_hash)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn update(&self, id: i32, changes: UserChanges) -> Result<Option<User>, StoreError> {
        let statement = user_update_statement(changes);
        if statement.is_empty() {
            return self.get(id).await;
        }

        let mut query = statement.build(id);
        let user = query
            .build_query_as::<User>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn delete(&self, id: i32) -> Result<bool, StoreError> {
        let result = sqlx::query(r#"DELETE FROM "User" WHERE id = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
