//! 产品业务服务

use std::sync::Arc;

use tracing::info;
use validator::Validate;

use super::model::{CreateProductRequest, NewProduct, Product, UpdateProductRequest};
use super::repository::ProductRepository;
use crate::core::error::{AppError, AppResult};

#[derive(Clone)]
pub struct ProductService {
    repo: Arc<dyn ProductRepository>,
}

fn not_found() -> AppError {
    AppError::NotFound("Product not found".to_string())
}

impl ProductService {
    pub fn new(repo: Arc<dyn ProductRepository>) -> Self {
        Self { repo }
    }

    pub async fn list_products(&self) -> AppResult<Vec<Product>> {
        Ok(self.repo.list().await?)
    }

    pub async fn get_product(&self, id: i32) -> AppResult<Product> {
        self.repo.get(id).await?.ok_or_else(not_found)
    }

    pub async fn create_product(&self, payload: CreateProductRequest) -> AppResult<Product> {
        payload.validate()?;
        let (Some(name), Some(description), Some(price), Some(stock)) =
            (payload.name, payload.description, payload.price, payload.stock)
        else {
            return Err(AppError::InvalidInput(
                "Fill in all required fields".to_string(),
            ));
        };

        let product = self
            .repo
            .create(NewProduct {
                name,
                description: Some(description),
                price,
                stock,
            })
            .await?;

        info!("Created product: {} ({})", product.name, product.id);
        Ok(product)
    }

    pub async fn update_product(
        &self,
        id: i32,
        payload: UpdateProductRequest,
    ) -> AppResult<Product> {
        if payload.is_empty() {
            return Err(AppError::InvalidInput("No fields to update".to_string()));
        }
        payload.validate()?;

        let product = self
            .repo
            .update(id, payload.into())
            .await?
            .ok_or_else(not_found)?;
        info!("Updated product: {} ({})", product.name, product.id);
        Ok(product)
    }

    pub async fn delete_product(&self, id: i32) -> AppResult<()> {
        if !self.repo.delete(id).await? {
            return Err(not_found());
        }
        info!("Deleted product: {}", id);
        Ok(())
    }
}
