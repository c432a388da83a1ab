//! 产品仓储

use async_trait::async_trait;
use sqlx::PgPool;

use super::model::{NewProduct, Product, ProductChanges};
use crate::infrastructure::database::{SqlValue, StoreError, UpdateStatement};

// price 统一读成 float8，NUMERIC 列和 DOUBLE PRECISION 列都能映射到 f64
const PRODUCT_COLUMNS: &str = "id, name, description, price::float8 AS price, stock";

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Product>, StoreError>;
    async fn get(&self, id: i32) -> Result<Option<Product>, StoreError>;
    async fn create(&self, product: NewProduct) -> Result<Product, StoreError>;
    async fn update(&self, id: i32, changes: ProductChanges)
        -> Result<Option<Product>, StoreError>;
    async fn delete(&self, id: i32) -> Result<bool, StoreError>;
}

#[derive(Clone)]
pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

pub fn product_update_statement(changes: ProductChanges) -> UpdateStatement {
    UpdateStatement::new("Product", PRODUCT_COLUMNS)
        .set("name", changes.name.map(SqlValue::Text))
        .set("description", changes.description.map(SqlValue::NullableText))
        .set("price", changes.price.map(SqlValue::Float))
        .set("stock", changes.stock.map(SqlValue::Int))
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn list(&self) -> Result<Vec<Product>, StoreError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            r#"SELECT {PRODUCT_COLUMNS} FROM "Product" ORDER BY id ASC"#
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }

    async fn get(&self, id: i32) -> Result<Option<Product>, StoreError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            r#"SELECT {PRODUCT_COLUMNS} FROM "Product" WHERE id = $1"#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(product)
    }

    async fn create(&self, product: NewProduct) -> Result<Product, StoreError> {
        let created = sqlx::query_as::<_, Product>(&format!(
            r#"INSERT INTO "Product" (name, description, price, stock) VALUES ($1, $2, $3, $4) RETURNING {PRODUCT_COLUMNS}"#
        ))
        .bind(product.name)
        .bind(product.description)
        .bind(product.price)
        .bind(product.stock)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn update(
        &self,
        id: i32,
        changes: ProductChanges,
    ) -> Result<Option<Product>, StoreError> {
        let statement = product_update_statement(changes);
        if statement.is_empty() {
            return self.get(id).await;
        }

        let mut query = statement.build(id);
        let product = query
            .build_query_as::<Product>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(product)
    }

    async fn delete(&self, id: i32) -> Result<bool, StoreError> {
        let result = sqlx::query(r#"DELETE FROM "Product" WHERE id = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_falsy_values_are_kept() {
        let statement = product_update_statement(ProductChanges {
            description: Some(Some(String::new())),
            stock: Some(0),
            ..Default::default()
        });

        assert_eq!(statement.columns(), vec!["description", "stock"]);
        assert_eq!(
            statement.build(9).sql(),
            r#"UPDATE "Product" SET description = $1, stock = $2 WHERE id = $3 RETURNING id, name, description, price::float8 AS price, stock"#
        );
    }
}
