//! 用户处理器

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};

use super::model::{CreateUserRequest, LoginRequest, PublicUser, UpdateUserRequest, User};
use crate::app::AppState;
use crate::core::{
    error::AppResult,
    extract::{parse_id, JsonBody},
};

/// 挂载在 `/api/users` 下的路由
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/login", post(login_user))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
}

pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<User>>> {
    let users = state.user_service.list_users().await?;
    Ok(Json(users))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<User>> {
    let id = parse_id(&id)?;
    let user = state.user_service.get_user(id).await?;
    Ok(Json(user))
}

pub async fn create_user(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateUserRequest>,
) -> AppResult<Json<User>> {
    let user = state.user_service.create_user(payload).await?;
    Ok(Json(user))
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<UpdateUserRequest>,
) -> AppResult<Json<User>> {
    let id = parse_id(&id)?;
    let user = state.user_service.update_user(id, payload).await?;
    Ok(Json(user))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = parse_id(&id)?;
    state.user_service.delete_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn login_user(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> AppResult<Json<PublicUser>> {
    let user = state.user_service.login(payload).await?;
    Ok(Json(user))
}
