use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use super::MembershipService;
use crate::backend::BackendClient;
use crate::config::AppConfig;
use crate::import::summarize_errors;
use crate::models::membership::responses::MembershipCommitResponse;
use crate::models::roster::responses::CourseDetail;
use crate::models::{ApiResponse, ErrorCode};
use crate::reconcile::{Lookup, Reconciler};
use crate::roster::{Directory, course_detail};
use crate::services::context::{bad_request, error_response};

pub async fn commit(
    service: &MembershipService,
    course_id: String,
    session_id: String,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let config = AppConfig::get();
    let client = service.get_client(request);
    let plans = service.get_plans(request);
    let key = (session_id, course_id.clone());

    let Some(entry) = plans.get(&key).await else {
        return Ok(bad_request(
            ErrorCode::MembershipPlanEmpty,
            "No membership changes to save",
        ));
    };
    let plan = entry.lock().await.clone();
    if plan.is_empty() {
        return Ok(bad_request(
            ErrorCode::MembershipPlanEmpty,
            "No membership changes to save",
        ));
    }

    // 导入行按邮箱解析已有用户
    let people = match client.list_people(None).await {
        Ok(people) => people,
        Err(e) => return Ok(error_response(&e)),
    };
    let lookup = Lookup {
        user_ids_by_email: people
            .into_iter()
            .map(|p| (p.email.trim().to_lowercase(), p.id))
            .collect(),
        ..Default::default()
    };

    let report = Reconciler::new(client.clone())
        .commit_membership(&plan, &lookup)
        .await;
    plans.remove(&key).await;

    info!(
        "Membership commit for course {}: added={}, removed={}, created={}, errors={}",
        course_id,
        report.added,
        report.removed,
        report.created,
        report.errors.len()
    );

    let detail = refresh(&client, &course_id).await;
    let error_summary = summarize_errors(&report.errors, config.staging.error_summary_limit);
    let message = if report.errors.is_empty() {
        "Membership saved".to_string()
    } else {
        format!("Membership saved with {} errors", report.errors.len())
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        MembershipCommitResponse {
            report,
            error_summary,
            detail,
        },
        message,
    )))
}

async fn refresh(client: &BackendClient, course_id: &str) -> Option<CourseDetail> {
    let directory = match Directory::load(client).await {
        Ok(directory) => directory,
        Err(e) => {
            warn!("Failed to reload directory after membership commit: {}", e);
            return None;
        }
    };
    course_detail(&directory, course_id)
        .inspect_err(|e| warn!("Failed to rebuild course {} detail: {}", course_id, e))
        .ok()
}
