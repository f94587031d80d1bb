//! Request Extractors
//!
//! 拒绝时统一返回 `ApiError`，错误响应由 envelope 中间件写出

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;

use super::error::ApiError;

/// 整数路径参数 `:id`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdParam(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for IdParam
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?;

        parse_id(&raw).map(IdParam)
    }
}

/// 只接受 `-?\d+`，不接受前导 `+`
fn parse_id(raw: &str) -> Result<i64, ApiError> {
    let digits = raw.strip_prefix('-').unwrap_or(raw);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid_id());
    }
    raw.parse::<i64>().map_err(|_| invalid_id())
}

fn invalid_id() -> ApiError {
    ApiError::bad_request("Validation failed (numeric string is expected)")
}

/// JSON 请求体，解析失败为 400
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;

        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_numeric_id() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert_eq!(parse_id("-3").unwrap(), -3);
    }

    #[test]
    fn test_parse_non_numeric_id_is_bad_request() {
        for raw in ["abc", "1.5", "", "12x", "+1", "-", " 1"] {
            let failure = parse_id(raw).unwrap_err().classify();
            assert_eq!(failure.status.as_u16(), 400);
            assert_eq!(
                failure.response,
                "Bad Request: Validation failed (numeric string is expected)"
            );
        }
    }
}
