//! User HTTP Handlers

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::domain::{NewUser, User, UserPatch};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::extract::{IdParam, JsonBody};
use crate::infrastructure::http::state::AppState;

/// 获取用户列表
pub async fn list_users(State(state): State<Arc<AppState>>) -> Json<Vec<User>> {
    Json(state.user_store.find_all())
}

/// 获取用户详情
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    IdParam(id): IdParam,
) -> Result<Json<User>, ApiError> {
    Ok(Json(state.user_store.find_one(id)?))
}

/// 创建用户
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    JsonBody(input): JsonBody<NewUser>,
) -> (StatusCode, Json<User>) {
    let user = state.user_store.create(input);
    tracing::info!(user_id = user.id, "User created");
    (StatusCode::CREATED, Json(user))
}

/// 部分更新用户
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    IdParam(id): IdParam,
    JsonBody(patch): JsonBody<UserPatch>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(state.user_store.update(id, patch)?))
}

/// 删除用户，返回被删除的记录
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    IdParam(id): IdParam,
) -> Result<Json<User>, ApiError> {
    let removed = state.user_store.delete(id)?;
    tracing::info!(user_id = id, "User deleted");
    Ok(Json(removed))
}
