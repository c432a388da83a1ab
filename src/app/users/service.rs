//! 用户业务服务

use std::sync::Arc;

use tracing::{info, warn};
use validator::Validate;

use super::model::{
    CreateUserRequest, LoginRequest, NewUser, PublicUser, UpdateUserRequest, User, UserChanges,
};
use super::repository::UserRepository;
use crate::core::error::{AppError, AppResult};
use crate::infrastructure::password::{PasswordError, PasswordHasher};

#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

fn not_found() -> AppError {
    AppError::NotFound("User not found".to_string())
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { repo, hasher }
    }

    pub async fn list_users(&self) -> AppResult<Vec<User>> {
        Ok(self.repo.list().await?)
    }

    pub async fn get_user(&self, id: i32) -> AppResult<User> {
        self.repo.get(id).await?.ok_or_else(not_found)
    }

    pub async fn create_user(&self, payload: CreateUserRequest) -> AppResult<User> {
        payload.validate()?;
        let (Some(name), Some(email), Some(password)) =
            (payload.name, payload.email, payload.password)
        else {
            return Err(AppError::InvalidInput("Fill in all fields".to_string()));
        };

        let password_hash = self.hash_password(password).await?;
        let user = self
            .repo
            .create(NewUser {
                name,
                email,
                password_hash,
            })
            .await?;

        info!("Created user: {} ({})", user.email, user.id);
        Ok(user)
    }

    /// 只更新请求中出现且非 null 的字段
    pub async fn update_user(&self, id: i32, payload: UpdateUserRequest) -> AppResult<User> {
        if payload.is_empty() {
            return Err(AppError::InvalidInput("No fields to update".to_string()));
        }
        payload.validate()?;

        let password_hash = match payload.password {
            Some(password) => Some(self.hash_password(password).await?),
            None => None,
        };
        let changes = UserChanges {
            name: payload.name,
            email: payload.email,
            password_hash,
        };

        let user = self.repo.update(id, changes).await?.ok_or_else(not_found)?;
        info!("Updated user: {} ({})", user.email, user.id);
        Ok(user)
    }

    pub async fn delete_user(&self, id: i32) -> AppResult<()> {
        if !self.repo.delete(id).await? {
            return Err(not_found());
        }
        info!("Deleted user: {}", id);
        Ok(())
    }

    /// 邮箱查找后校验密码哈希，不匹配统一返回 401
    pub async fn login(&self, payload: LoginRequest) -> AppResult<PublicUser> {
        payload.validate()?;
        let (Some(email), Some(password)) = (payload.email, payload.password) else {
            return Err(AppError::InvalidInput("Fill in all fields".to_string()));
        };

        let Some(user) = self.repo.find_by_email(&email).await? else {
            return Err(AppError::Unauthorized);
        };

        let hasher = Arc::clone(&self.hasher);
        let stored = user.password.clone();
        let verified = tokio::task::spawn_blocking(move || hasher.verify(&password, &stored))
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;

        match verified {
            Ok(true) => Ok(user.into()),
            Ok(false) => Err(AppError::Unauthorized),
            Err(PasswordError::MalformedHash(detail)) => {
                warn!("User {} has an unusable password hash: {}", user.id, detail);
                Err(AppError::Unauthorized)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn hash_password(&self, password: String) -> AppResult<String> {
        let hasher = Arc::clone(&self.hasher);
        let hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AppError::Internal(e.to_string()))??;
        Ok(hash)
    }
}
