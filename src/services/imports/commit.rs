use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, warn};

use super::ImportService;
use crate::backend::BackendClient;
use crate::config::AppConfig;
use crate::errors::Result;
use crate::import::summarize_errors;
use crate::models::imports::entities::{AssignmentContext, ImportTarget};
use crate::models::imports::requests::CommitImportRequest;
use crate::models::imports::responses::{CommitResponse, RefreshedCollection};
use crate::models::{ApiResponse, ErrorCode};
use crate::reconcile::{CommitStrategy, Lookup, Reconciler};
use crate::roster::Directory;
use crate::services::context::{bad_request, error_response, error_response_with_message};

pub async fn commit(
    service: &ImportService,
    session_id: String,
    target: ImportTarget,
    body: CommitImportRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let config = AppConfig::get();
    let staging = service.get_staging(request);
    let client = service.get_client(request);
    let key = (session_id, target);

    let Some(entry) = staging.get(&key).await else {
        return Ok(bad_request(ErrorCode::ImportNothingToCommit, "Nothing is staged for this import"));
    };
    // 提交期间持有锁，同一暂存不会被并发修改或重复提交
    let mut store = entry.lock().await;

    let rows = store.committable();
    if rows.is_empty() {
        return Ok(bad_request(ErrorCode::ImportNothingToCommit, "No valid rows to commit"));
    }

    let strategy = body
        .strategy
        .unwrap_or_else(|| config.default_commit_strategy());
    let context = store.context().cloned();

    let lookup = if needs_lookup(target, strategy) {
        match Directory::load(&client).await {
            Ok(directory) => directory.lookup(),
            Err(e) => {
                error!("Failed to load directory before commit: {}", e);
                return Ok(error_response(&e));
            }
        }
    } else {
        Lookup::default()
    };

    let reconciler = Reconciler::new(client.clone());
    let report = match reconciler
        .commit_import(target, &rows, context.as_ref(), &lookup, strategy)
        .await
    {
        Ok(report) => report,
        Err(e) => {
            error!("Commit of {} failed: {}", target, e);
            return Ok(error_response_with_message(
                &e,
                format!("Save failed: {}", e.message()),
            ));
        }
    };

    // 提交后以服务端状态为准：丢弃暂存行，仅保留本次结果
    store.clear();
    store.record_commit(report.clone());
    drop(store);

    let refreshed = match refresh(&client, target, context.as_ref()).await {
        Ok(collection) => Some(collection),
        Err(e) => {
            warn!("Failed to refresh {} after commit: {}", target, e);
            None
        }
    };

    let error_summary = summarize_errors(&report.errors, config.staging.error_summary_limit);
    let message = if report.errors.is_empty() {
        "Import committed".to_string()
    } else {
        format!("Import committed with {} failed rows", report.errors.len())
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        CommitResponse {
            target,
            strategy,
            report,
            error_summary,
            refreshed,
        },
        message,
    )))
}

/// 逐行提交班级与关联行时需要解析课程代码或邮箱
fn needs_lookup(target: ImportTarget, strategy: CommitStrategy) -> bool {
    strategy == CommitStrategy::PerRow
        && matches!(target, ImportTarget::Sections | ImportTarget::Assignments)
}

/// 重新读取受影响的集合
async fn refresh(
    client: &BackendClient,
    target: ImportTarget,
    context: Option<&AssignmentContext>,
) -> Result<RefreshedCollection> {
    Ok(match target {
        ImportTarget::Teachers | ImportTarget::Students => {
            RefreshedCollection::People(client.list_people(target.person_role()).await?)
        }
        ImportTarget::Courses => RefreshedCollection::Courses(client.list_courses().await?),
        ImportTarget::Sections => RefreshedCollection::Sections(client.list_sections().await?),
        ImportTarget::Assignments => {
            RefreshedCollection::People(client.list_people(context.map(|c| c.role)).await?)
        }
    })
}
