//! 集成测试用的内存仓储

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use argon2::Params;
use async_trait::async_trait;
use axum_test::TestServer;
use storefront_api::{
    app::{
        products::{
            model::{NewProduct, Product, ProductChanges},
            ProductRepository, ProductService,
        },
        router,
        users::{
            model::{NewUser, User, UserChanges},
            UserRepository, UserService,
        },
        AppState,
    },
    infrastructure::{database::StoreError, password::Argon2Hasher},
};

struct Table<T> {
    rows: Vec<T>,
    next_id: i32,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            next_id: 0,
        }
    }
}

impl<T> Table<T> {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct MemoryUserRepository {
    table: Mutex<Table<User>>,
}

impl MemoryUserRepository {
    /// 直接改写存储的密码字段，模拟未迁移的旧数据
    pub fn corrupt_password(&self, id: i32, stored: &str) {
        let mut table = self.table.lock().unwrap();
        if let Some(user) = table.rows.iter_mut().find(|u| u.id == id) {
            user.password = stored.to_string();
        }
    }
}

fn duplicate_email() -> StoreError {
    StoreError::UniqueViolation {
        constraint: "User_email_key".to_string(),
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn list(&self) -> Result<Vec<User>, StoreError> {
        let mut rows = self.table.lock().unwrap().rows.clone();
        rows.sort_by_key(|u| u.id);
        Ok(rows)
    }

    async fn get(&self, id: i32) -> Result<Option<User>, StoreError> {
        let table = self.table.lock().unwrap();
        Ok(table.rows.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let table = self.table.lock().unwrap();
        Ok(table.rows.iter().find(|u| u.email == email).cloned())
    }

    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        let mut table = self.table.lock().unwrap();
        if table.rows.iter().any(|u| u.email == user.email) {
            return Err(duplicate_email());
        }
        let created = User {
            id: table.next_id(),
            name: user.name,
            email: user.email,
            password: user.password_hash,
        };
        table.rows.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: i32, changes: UserChanges) -> Result<Option<User>, StoreError> {
        let mut table = self.table.lock().unwrap();
        if let Some(email) = &changes.email {
            if table.rows.iter().any(|u| u.id != id && &u.email == email) {
                return Err(duplicate_email());
            }
        }
        let Some(user) = table.rows.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        if let Some(name) = changes.name {
            user.name = name;
        }
        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(password) = changes.password_hash {
            user.password = password;
        }
        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: i32) -> Result<bool, StoreError> {
        let mut table = self.table.lock().unwrap();
        let before = table.rows.len();
        table.rows.retain(|u| u.id != id);
        Ok(table.rows.len() < before)
    }
}

#[derive(Default)]
pub struct MemoryProductRepository {
    table: Mutex<Table<Product>>,
}

#[async_trait]
impl ProductRepository for MemoryProductRepository {
    async fn list(&self) -> Result<Vec<Product>, StoreError> {
        let mut rows = self.table.lock().unwrap().rows.clone();
        rows.sort_by_key(|p| p.id);
        Ok(rows)
    }

    async fn get(&self, id: i32) -> Result<Option<Product>, StoreError> {
        let table = self.table.lock().unwrap();
        Ok(table.rows.iter().find(|p| p.id == id).cloned())
    }

    async fn create(&self, product: NewProduct) -> Result<Product, StoreError> {
        let mut table = self.table.lock().unwrap();
        let created = Product {
            id: table.next_id(),
            name: product.name,
            description: product.description,
            price: product.price,
            stock: product.stock,
        };
        table.rows.push(created.clone());
        Ok(created)
    }

    async fn update(
        &self,
        id: i32,
        changes: ProductChanges,
    ) -> Result<Option<Product>, StoreError> {
        let mut table = self.table.lock().unwrap();
        let Some(product) = table.rows.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        if let Some(name) = changes.name {
            product.name = name;
        }
        if let Some(description) = changes.description {
            product.description = description;
        }
        if let Some(price) = changes.price {
            product.price = price;
        }
        if let Some(stock) = changes.stock {
            product.stock = stock;
        }
        Ok(Some(product.clone()))
    }

    async fn delete(&self, id: i32) -> Result<bool, StoreError> {
        let mut table = self.table.lock().unwrap();
        let before = table.rows.len();
        table.rows.retain(|p| p.id != id);
        Ok(table.rows.len() < before)
    }
}

/// 低代价参数的 Argon2，测试里省时间
pub fn fast_hasher() -> Argon2Hasher {
    Argon2Hasher::with_params(Params::new(1024, 1, 1, None).unwrap())
}

pub struct TestApp {
    pub server: TestServer,
    pub users: Arc<MemoryUserRepository>,
    pub products: Arc<MemoryProductRepository>,
}

pub fn test_app() -> TestApp {
    let users = Arc::new(MemoryUserRepository::default());
    let products = Arc::new(MemoryProductRepository::default());

    let state = AppState::new(
        UserService::new(users.clone(), Arc::new(fast_hasher())),
        ProductService::new(products.clone()),
    );
    let server = TestServer::new(router(state)).unwrap();

    TestApp {
        server,
        users,
        products,
    }
}
