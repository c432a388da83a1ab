//! 产品数据模型

use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

/// `"Product"` 表的一行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub stock: i32,
}

// 创建产品请求
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductRequest {
    #[validate(
        required(message = "name is required"),
        length(min = 1, message = "name is required")
    )]
    pub name: Option<String>,

    #[validate(
        required(message = "description is required"),
        length(min = 1, message = "description is required")
    )]
    pub description: Option<String>,

    #[validate(required(message = "price is required"))]
    pub price: Option<f64>,

    #[validate(required(message = "stock is required"))]
    pub stock: Option<i32>,
}

// 更新产品请求
//
// 字段出现即更新，包括空字符串和 0；`description: null` 清空描述。
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,

    pub price: Option<f64>,

    pub stock: Option<i32>,
}

impl UpdateProductRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.stock.is_none()
    }
}

/// 区分“字段缺省”(None) 与“显式 null”(Some(None))
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// 已校验的新产品
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub stock: i32,
}

/// 已校验的部分更新
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub price: Option<f64>,
    pub stock: Option<i32>,
}

impl From<UpdateProductRequest> for ProductChanges {
    fn from(req: UpdateProductRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            price: req.price,
            stock: req.stock,
        }
    }
}
