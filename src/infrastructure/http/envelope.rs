//! Error Envelope Middleware
//!
//! 全局错误出口：所有失败在这里被写成同一种 JSON envelope，并记录一行日志

use std::any::Any;

use axum::{
    body::Body,
    extract::Request,
    http::{header, HeaderValue, Uri},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use super::error::{ApiError, Failure};

/// 统一错误响应格式
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    pub status_code: u16,
    pub time_stamp: String,
    pub path: String,
    pub response: String,
}

impl ErrorEnvelope {
    pub fn new(failure: &Failure, path: impl Into<String>) -> Self {
        Self {
            status_code: failure.status.as_u16(),
            time_stamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            path: path.into(),
            response: failure.response.clone(),
        }
    }

    /// 不经过 Serialize 的编码路径，字段与 `Serialize` 输出一致
    fn to_value_bytes(&self) -> Vec<u8> {
        serde_json::json!({
            "statusCode": self.status_code,
            "timeStamp": self.time_stamp,
            "path": self.path,
            "response": self.response,
        })
        .to_string()
        .into_bytes()
    }
}

/// 错误归一化中间件
///
/// 唯一的错误响应写出者。响应写出后 `Failure` 从扩展中移除，外层不会再次改写。
pub async fn normalize_errors(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request_path(request.uri());

    let response = next.run(request).await;
    let status = response.status();

    let failure = match response.extensions().get::<Failure>() {
        Some(failure) => failure.clone(),
        None if status.is_client_error() || status.is_server_error() => {
            Failure::from_status(status)
        }
        None => return response,
    };

    let (mut parts, _) = response.into_parts();
    parts.extensions.remove::<Failure>();
    parts.headers.remove(header::CONTENT_LENGTH);
    parts.headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );

    let envelope = ErrorEnvelope::new(&failure, path.clone());
    let (failure, envelope, bytes) = match serde_json::to_vec(&envelope) {
        Ok(bytes) => (failure, envelope, bytes),
        Err(e) => internal_envelope(&path, e.to_string()),
    };
    parts.status = failure.status;

    tracing::error!(
        context = "ErrorNormalizer",
        method = %method,
        path = %path,
        status = failure.status.as_u16(),
        "[{} {}] {}",
        method,
        path,
        envelope.response
    );
    // 响应已定稿，原始错误只交给诊断日志
    tracing::debug!(
        context = "ErrorNormalizer",
        detail = %failure.detail,
        "Forwarded failure detail"
    );

    Response::from_parts(parts, Body::from(bytes))
}

/// envelope 编码失败时改写为 500，四个字段仍然齐全
fn internal_envelope(path: &str, detail: String) -> (Failure, ErrorEnvelope, Vec<u8>) {
    let failure = Failure::internal(detail);
    let envelope = ErrorEnvelope::new(&failure, path);
    let bytes = envelope.to_value_bytes();
    (failure, envelope, bytes)
}

/// handler panic 时的响应，交由 normalize_errors 写成 500 envelope
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    ApiError::unclassified(format!("handler panicked: {}", detail)).into_response()
}

fn request_path(uri: &Uri) -> String {
    uri.path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string())
}
