use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::debug;

use super::ImportService;
use crate::config::AppConfig;
use crate::import::{PreviewStore, summarize_errors};
use crate::models::imports::entities::ImportTarget;
use crate::models::imports::requests::{EditRowRequest, PreviewQuery};
use crate::models::imports::responses::PreviewResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::context::{error_response, not_found};

/// 由暂存内容构建预览响应
pub(crate) fn preview_response(store: &PreviewStore, config: &AppConfig) -> PreviewResponse {
    let (rows, hidden_rows) = store.visible(config.staging.preview_limit);
    let errors = store.errors();

    PreviewResponse {
        target: store.target(),
        rows,
        showing_all: store.show_all(),
        hidden_rows,
        counts: store.counts(),
        errors: summarize_errors(&errors, config.staging.error_summary_limit),
        error_count: errors.len(),
        last_report: store.last_report().cloned(),
    }
}

pub async fn get_preview(
    service: &ImportService,
    session_id: String,
    target: ImportTarget,
    query: PreviewQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let config = AppConfig::get();
    let staging = service.get_staging(request);

    let response = match staging.get(&(session_id, target)).await {
        Some(entry) => {
            let mut store = entry.lock().await;
            store.set_show_all(query.show_all);
            preview_response(&store, config)
        }
        None => preview_response(&PreviewStore::new(target), config),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Preview loaded")))
}

pub async fn edit_row(
    service: &ImportService,
    session_id: String,
    target: ImportTarget,
    index: usize,
    body: EditRowRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let config = AppConfig::get();
    let staging = service.get_staging(request);

    let Some(entry) = staging.get(&(session_id, target)).await else {
        return Ok(not_found(ErrorCode::ImportRowNotFound, "Nothing is staged for this import"));
    };
    let mut store = entry.lock().await;

    match store.edit(index, body.field, body.value) {
        Ok(_) => {
            debug!("Edited {} row {} field {}", target, index, body.field.as_str());
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                preview_response(&store, config),
                "Row updated",
            )))
        }
        Err(e) if e.is_not_found() => Ok(not_found(ErrorCode::ImportRowNotFound, e.message())),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn remove_row(
    service: &ImportService,
    session_id: String,
    target: ImportTarget,
    index: usize,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let config = AppConfig::get();
    let staging = service.get_staging(request);

    let Some(entry) = staging.get(&(session_id, target)).await else {
        return Ok(not_found(ErrorCode::ImportRowNotFound, "Nothing is staged for this import"));
    };
    let mut store = entry.lock().await;

    match store.remove(index) {
        Ok(_) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            preview_response(&store, config),
            "Row removed",
        ))),
        Err(e) => Ok(not_found(ErrorCode::ImportRowNotFound, e.message())),
    }
}

pub async fn clear(
    service: &ImportService,
    session_id: String,
    target: ImportTarget,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let staging = service.get_staging(request);
    let key = (session_id, target);

    if let Some(entry) = staging.get(&key).await {
        entry.lock().await.clear();
    }
    staging.remove(&key).await;

    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Import cancelled")))
}
