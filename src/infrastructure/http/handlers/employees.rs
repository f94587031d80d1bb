//! Employee HTTP Handlers
//!
//! 请求体原样透传给持久层，由其负责校验

use axum::{
    extract::{ConnectInfo, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::domain::Employee;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::extract::{IdParam, JsonBody};
use crate::infrastructure::http::state::AppState;

/// 创建员工
pub async fn create_employee(
    State(state): State<Arc<AppState>>,
    JsonBody(input): JsonBody<Value>,
) -> Result<(StatusCode, Json<Employee>), ApiError> {
    let employee = state.employee_repo.create(input).await?;
    Ok((StatusCode::CREATED, Json(employee)))
}

/// 获取员工列表，记录来源 IP
pub async fn list_employees(
    State(state): State<Arc<AppState>>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
) -> Result<Json<Vec<Employee>>, ApiError> {
    let ip = connect_info
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string());
    tracing::info!(context = "EmployeesController", "Request for all employees\t{}", ip);

    Ok(Json(state.employee_repo.find_all().await?))
}

/// 获取员工详情
pub async fn get_employee(
    State(state): State<Arc<AppState>>,
    IdParam(id): IdParam,
) -> Result<Json<Employee>, ApiError> {
    Ok(Json(state.employee_repo.find_one(id).await?))
}

/// 部分更新员工
pub async fn update_employee(
    State(state): State<Arc<AppState>>,
    IdParam(id): IdParam,
    JsonBody(input): JsonBody<Value>,
) -> Result<Json<Employee>, ApiError> {
    Ok(Json(state.employee_repo.update(id, input).await?))
}

/// 删除员工，返回被删除的记录
pub async fn remove_employee(
    State(state): State<Arc<AppState>>,
    IdParam(id): IdParam,
) -> Result<Json<Employee>, ApiError> {
    Ok(Json(state.employee_repo.remove(id).await?))
}
