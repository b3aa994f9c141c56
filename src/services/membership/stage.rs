use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::debug;

use super::MembershipService;
use crate::config::AppConfig;
use crate::errors::{Result, RosterError};
use crate::import::validator::{row_statuses, to_record, validate_rows};
use crate::import::{parse_rows, summarize_errors};
use crate::models::directory::entities::{EntityId, PersonRole};
use crate::models::imports::entities::{RowShape, StatusCounts};
use crate::models::membership::requests::{ImportMembersRequest, StageMembershipRequest};
use crate::models::membership::responses::{MembershipImportResponse, MembershipPlanResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::reconcile::{EnrollmentDelta, MembershipPlan, diff_membership};
use crate::services::context::{bad_request, error_response};

fn plan_response(plan: &MembershipPlan) -> MembershipPlanResponse {
    MembershipPlanResponse {
        plan: plan.clone(),
        pending_operations: plan.pending_operations(),
    }
}

pub async fn get_plan(
    service: &MembershipService,
    course_id: String,
    session_id: String,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let plans = service.get_plans(request);
    let plan = match plans.get(&(session_id, course_id.clone())).await {
        Some(entry) => entry.lock().await.clone(),
        None => MembershipPlan::new(course_id),
    };
    Ok(HttpResponse::Ok().json(ApiResponse::success(plan_response(&plan), "Membership plan loaded")))
}

/// 当前班级中某角色的成员 ID；班级不属于该课程时返回未找到
async fn current_members(
    service: &MembershipService,
    course_id: &str,
    section_id: &str,
    role: PersonRole,
    request: &HttpRequest,
) -> Result<Vec<EntityId>> {
    let client = service.get_client(request);
    let section = client
        .list_sections()
        .await?
        .into_iter()
        .find(|s| s.id == section_id && s.course_id == course_id)
        .ok_or_else(|| {
            RosterError::not_found(format!("Section {section_id} not found in course {course_id}"))
        })?;
    Ok(section
        .enrollments
        .into_iter()
        .filter(|e| e.role == role)
        .map(|e| e.user_id)
        .collect())
}

pub async fn stage_section(
    service: &MembershipService,
    course_id: String,
    session_id: String,
    section_id: String,
    body: StageMembershipRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    // 给出期望成员时，以与当前成员的差异为基础
    let base = match &body.intended {
        Some(intended) => {
            match current_members(service, &course_id, &section_id, body.role, request).await {
                Ok(current) => Some(diff_membership(&current, intended)),
                Err(e) => return Ok(error_response(&e)),
            }
        }
        None => None,
    };

    let plans = service.get_plans(request);
    let entry = plans
        .get_or_insert_with((session_id, course_id.clone()), || {
            MembershipPlan::new(course_id.clone())
        })
        .await;
    let mut plan = entry.lock().await;

    let next = plan.update(&section_id, body.role, |current| {
        let start = match base {
            Some(diff) => EnrollmentDelta {
                imported_rows: current.imported_rows.clone(),
                ..diff
            },
            None => current.clone(),
        };
        let start = body.remove.iter().fold(start, |acc, id| acc.with_removed(id));
        body.add.iter().fold(start, |acc, id| acc.with_added(id))
    });
    *plan = next;

    debug!(
        "Staged {} membership for section {}: {} pending operations",
        body.role,
        section_id,
        plan.pending_operations()
    );
    Ok(HttpResponse::Ok().json(ApiResponse::success(plan_response(&plan), "Membership staged")))
}

pub async fn import_members(
    service: &MembershipService,
    course_id: String,
    session_id: String,
    section_id: String,
    body: ImportMembersRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let config = AppConfig::get();

    let rows = parse_rows(&body.text);
    if rows.is_empty() {
        return Ok(bad_request(ErrorCode::ImportEmpty, "No rows found in input"));
    }
    if rows.len() > config.staging.max_rows {
        return Ok(bad_request(
            ErrorCode::ImportTooManyRows,
            format!("At most {} rows can be imported at once", config.staging.max_rows),
        ));
    }

    let outcome = validate_rows(&rows, RowShape::User);
    let records: Vec<_> = rows.iter().map(|row| to_record(row, RowShape::User)).collect();
    let mut counts = StatusCounts::default();
    for status in row_statuses(&records, None) {
        counts.record(status);
    }

    let plans = service.get_plans(request);
    let entry = plans
        .get_or_insert_with((session_id, course_id.clone()), || {
            MembershipPlan::new(course_id.clone())
        })
        .await;
    let mut plan = entry.lock().await;
    let next = plan.update(&section_id, body.role, |current| {
        current.with_imported(outcome.records.iter().cloned())
    });
    *plan = next;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        MembershipImportResponse {
            plan: plan.clone(),
            pending_operations: plan.pending_operations(),
            counts,
            errors: summarize_errors(&outcome.errors, config.staging.error_summary_limit),
            error_count: outcome.errors.len(),
        },
        format!("Staged {} rows", outcome.records.len()),
    )))
}

pub async fn discard(
    service: &MembershipService,
    course_id: String,
    session_id: String,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    service
        .get_plans(request)
        .remove(&(session_id, course_id))
        .await;
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Membership changes discarded")))
}
