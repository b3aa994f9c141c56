//! 路径参数安全提取器

use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, error};
use futures_util::future::{Ready, ready};

use crate::models::imports::entities::ImportTarget;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::validate::validate_session_id;

fn bad_path(message: String) -> error::Error {
    error::InternalError::from_response(
        message.clone(),
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, message)),
    )
    .into()
}

/// 定义从路径中提取并校验参数的提取器
#[macro_export]
macro_rules! define_safe_path_extractor {
    ($name:ident, $ty:ty, $param:literal, $parse:expr) => {
        pub struct $name(pub $ty);

        impl FromRequest for $name {
            type Error = error::Error;
            type Future = Ready<Result<Self, Self::Error>>;

            fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
                let parse: fn(&str) -> Result<$ty, String> = $parse;
                let result = match req.match_info().get($param) {
                    Some(raw) => parse(raw)
                        .map($name)
                        .map_err(|e| bad_path(format!("Invalid path parameter '{}': {}", $param, e))),
                    None => Err(bad_path(format!("Missing path parameter '{}'", $param))),
                };
                ready(result)
            }
        }
    };
}

define_safe_path_extractor!(SafeSessionId, String, "session", |raw| {
    validate_session_id(raw)
        .map(|_| raw.to_string())
        .map_err(str::to_string)
});

define_safe_path_extractor!(SafeImportTarget, ImportTarget, "target", |raw| raw.parse());

define_safe_path_extractor!(SafeEntityId, String, "id", |raw| {
    let raw = raw.trim();
    if raw.is_empty() || raw.len() > 128 || raw.contains('/') {
        Err("must be a non-empty identifier".to_string())
    } else {
        Ok(raw.to_string())
    }
});

define_safe_path_extractor!(SafeSectionId, String, "section_id", |raw| {
    let raw = raw.trim();
    if raw.is_empty() || raw.len() > 128 {
        Err("must be a non-empty identifier".to_string())
    } else {
        Ok(raw.to_string())
    }
});

define_safe_path_extractor!(SafeRowIndex, usize, "index", |raw| raw
    .parse::<usize>()
    .map_err(|e| e.to_string()));
