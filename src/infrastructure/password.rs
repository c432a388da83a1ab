//! 密码哈希
//!
//! 用户密码只以 Argon2id PHC 字符串形式保存，登录时做校验而不是明文比较。

use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher as _, PasswordVerifier, Version,
};

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("failed to hash password: {0}")]
    Hash(String),
    #[error("stored password is not a valid hash: {0}")]
    MalformedHash(String),
}

/// 密码哈希与校验抽象
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, PasswordError>;

    /// 密码不匹配返回 `Ok(false)`
    fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError>;
}

#[derive(Clone)]
pub struct Argon2Hasher {
    context: Argon2<'static>,
}

impl Argon2Hasher {
    pub fn new() -> Self {
        Self::with_params(Params::DEFAULT)
    }

    /// 自定义代价参数，测试中用较小的内存开销
    pub fn with_params(params: Params) -> Self {
        Self {
            context: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        }
    }
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .context
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| PasswordError::Hash(e.to_string()))?;

        Ok(hash.to_string())
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed =
            PasswordHash::new(hash).map_err(|e| PasswordError::MalformedHash(e.to_string()))?;

        match self.context.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(PasswordError::MalformedHash(e.to_string())),
        }
    }
}
