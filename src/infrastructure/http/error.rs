//! HTTP Error Handling
//!
//! 错误分类：handler 只返回 `ApiError`，分类结果以 [`Failure`] 形式挂在响应扩展上，
//! 由 [`normalize_errors`](super::envelope::normalize_errors) 统一写出 envelope。

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::application::{RepositoryError, UserStoreError};

const DEFAULT_CATEGORY: &str = "Error";
const DEFAULT_MESSAGE: &str = "Something went wrong";
pub const INTERNAL_SERVER_ERROR: &str = "Internal Server Error";

/// HTTP 级错误的载荷
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpPayload {
    /// 原样作为 response
    Text(String),
    /// 组合为 `"<error>: <message>"`
    Structured {
        error: Option<String>,
        message: Option<String>,
    },
}

/// API 错误
#[derive(Debug)]
pub enum ApiError {
    /// 携带自身状态码与载荷
    Http {
        status: StatusCode,
        payload: HttpPayload,
    },
    /// 持久层输入校验失败
    Validation(String),
    /// 其它未识别错误
    Unclassified(String),
}

impl ApiError {
    /// 结构化载荷，error 为状态码的标准原因短语
    pub fn with_reason(status: StatusCode, message: impl Into<String>) -> Self {
        ApiError::Http {
            status,
            payload: HttpPayload::Structured {
                error: status.canonical_reason().map(str::to_string),
                message: Some(message.into()),
            },
        }
    }

    pub fn text(status: StatusCode, text: impl Into<String>) -> Self {
        ApiError::Http {
            status,
            payload: HttpPayload::Text(text.into()),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::with_reason(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::with_reason(StatusCode::BAD_REQUEST, message)
    }

    pub fn too_many_requests() -> Self {
        Self::text(
            StatusCode::TOO_MANY_REQUESTS,
            "ThrottlerException: Too Many Requests",
        )
    }

    pub fn unclassified(detail: impl Into<String>) -> Self {
        ApiError::Unclassified(detail.into())
    }

    /// 按顺序分类，首个命中生效
    pub fn classify(&self) -> Failure {
        let (status, response) = match self {
            ApiError::Http { status, payload } => {
                let response = match payload {
                    HttpPayload::Text(text) => text.clone(),
                    HttpPayload::Structured { error, message } => format!(
                        "{}: {}",
                        non_empty(error).unwrap_or(DEFAULT_CATEGORY),
                        non_empty(message).unwrap_or(DEFAULT_MESSAGE)
                    ),
                };
                (*status, response)
            }
            ApiError::Validation(message) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                message.replace('\n', ""),
            ),
            ApiError::Unclassified(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                INTERNAL_SERVER_ERROR.to_string(),
            ),
        };

        Failure {
            status,
            response,
            detail: format!("{:?}", self),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// 分类结果，等待 envelope 中间件写出
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub status: StatusCode,
    pub response: String,
    /// 原始错误，用于诊断日志
    pub detail: String,
}

impl Failure {
    /// 框架直接产生、未经 `ApiError` 的错误状态
    pub fn from_status(status: StatusCode) -> Self {
        let response = status
            .canonical_reason()
            .unwrap_or(INTERNAL_SERVER_ERROR)
            .to_string();
        Self {
            status,
            detail: format!("bare {} response", status.as_u16()),
            response,
        }
    }

    /// 兜底：500 / Internal Server Error
    pub fn internal(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            response: INTERNAL_SERVER_ERROR.to_string(),
            detail: detail.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let failure = self.classify();
        let mut response = failure.status.into_response();
        response.extensions_mut().insert(failure);
        response
    }
}

impl From<UserStoreError> for ApiError {
    fn from(e: UserStoreError) -> Self {
        match e {
            UserStoreError::NotFound(_) => ApiError::not_found("User not found"),
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound(_) => ApiError::not_found("Employee not found"),
            RepositoryError::Validation(msg) => ApiError::Validation(msg),
            RepositoryError::Database(msg) => ApiError::Unclassified(msg),
        }
    }
}
