//! 服务共用的应用状态访问与错误响应

use actix_web::{HttpRequest, HttpResponse, web};

use crate::backend::BackendClient;
use crate::cache::{MembershipCache, StagingCache};
use crate::errors::RosterError;
use crate::models::{ApiResponse, ErrorCode};

pub(crate) fn app_data<T: Clone + 'static>(request: &HttpRequest, name: &str) -> T {
    request
        .app_data::<web::Data<T>>()
        .unwrap_or_else(|| panic!("{name} not found in app data"))
        .get_ref()
        .clone()
}

pub(crate) fn backend_client(request: &HttpRequest) -> BackendClient {
    app_data(request, "BackendClient")
}

pub(crate) fn staging_cache(request: &HttpRequest) -> StagingCache {
    app_data(request, "StagingCache")
}

pub(crate) fn membership_cache(request: &HttpRequest) -> MembershipCache {
    app_data(request, "MembershipCache")
}

/// 内部错误 -> HTTP 响应
pub(crate) fn error_response(err: &RosterError) -> HttpResponse {
    error_response_with_message(err, err.message())
}

pub(crate) fn error_response_with_message(err: &RosterError, message: impl Into<String>) -> HttpResponse {
    let body = ApiResponse::from_error(err, message);
    match err {
        RosterError::Validation(_) | RosterError::EmptyInput(_) => {
            HttpResponse::BadRequest().json(body)
        }
        RosterError::NotFound(_) => HttpResponse::NotFound().json(body),
        RosterError::Conflict(_) => HttpResponse::Conflict().json(body),
        RosterError::Upstream(_) => HttpResponse::BadGateway().json(body),
        RosterError::UpstreamTimeout(_) => HttpResponse::GatewayTimeout().json(body),
        RosterError::Config(_) | RosterError::Serialization(_) | RosterError::FileOperation(_) => {
            HttpResponse::InternalServerError().json(body)
        }
    }
}

pub(crate) fn bad_request(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(code, message))
}

pub(crate) fn not_found(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(code, message))
}

/// CSV 附件响应
pub(crate) fn csv_attachment(body: String, file_name: &str) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{file_name}\""),
        ))
        .body(body)
}
