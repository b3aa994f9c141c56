use actix_web::{HttpRequest, HttpResponse, error};
use tracing::debug;

use crate::models::{ApiResponse, ErrorCode};

/// JSON 请求体解析失败时返回统一响应
pub fn json_error_handler(err: error::JsonPayloadError, _req: &HttpRequest) -> error::Error {
    debug!("JSON payload error: {}", err);
    let (code, status) = match &err {
        error::JsonPayloadError::OverflowKnownLength { .. } | error::JsonPayloadError::Overflow { .. } => {
            (ErrorCode::PayloadTooLarge, actix_web::http::StatusCode::PAYLOAD_TOO_LARGE)
        }
        _ => (ErrorCode::BadRequest, actix_web::http::StatusCode::BAD_REQUEST),
    };
    let message = format!("Invalid JSON payload: {err}");
    error::InternalError::from_response(
        err,
        HttpResponse::build(status).json(ApiResponse::error_empty(code, message)),
    )
    .into()
}

/// 查询参数解析失败时返回统一响应
pub fn query_error_handler(err: error::QueryPayloadError, _req: &HttpRequest) -> error::Error {
    debug!("Query payload error: {}", err);
    let message = format!("Invalid query parameters: {err}");
    error::InternalError::from_response(
        err,
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, message)),
    )
    .into()
}
