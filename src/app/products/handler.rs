//! 产品处理器

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};

use super::model::{CreateProductRequest, Product, UpdateProductRequest};
use crate::app::AppState;
use crate::core::{
    error::AppResult,
    extract::{parse_id, JsonBody},
};

/// 挂载在 `/api/products` 下的路由
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
}

pub async fn list_products(State(state): State<AppState>) -> AppResult<Json<Vec<Product>>> {
    let products = state.product_service.list_products().await?;
    Ok(Json(products))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Product>> {
    let id = parse_id(&id)?;
    let product = state.product_service.get_product(id).await?;
    Ok(Json(product))
}

pub async fn create_product(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateProductRequest>,
) -> AppResult<Json<Product>> {
    let product = state.product_service.create_product(payload).await?;
    Ok(Json(product))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<UpdateProductRequest>,
) -> AppResult<Json<Product>> {
    let id = parse_id(&id)?;
    let product = state.product_service.update_product(id, payload).await?;
    Ok(Json(product))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = parse_id(&id)?;
    state.product_service.delete_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
