use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::RateLimit;
use crate::models::membership::requests::{ImportMembersRequest, StageMembershipRequest};
use crate::services::MembershipService;
use crate::utils::{SafeEntityId, SafeSectionId, SafeSessionId};

static MEMBERSHIP_SERVICE: Lazy<MembershipService> = Lazy::new(MembershipService::new_lazy);

pub async fn get_plan(
    req: HttpRequest,
    course_id: SafeEntityId,
    session: SafeSessionId,
) -> ActixResult<HttpResponse> {
    MEMBERSHIP_SERVICE.get_plan(course_id.0, session.0, &req).await
}

pub async fn discard(
    req: HttpRequest,
    course_id: SafeEntityId,
    session: SafeSessionId,
) -> ActixResult<HttpResponse> {
    MEMBERSHIP_SERVICE.discard(course_id.0, session.0, &req).await
}

pub async fn stage_section(
    req: HttpRequest,
    course_id: SafeEntityId,
    session: SafeSessionId,
    section_id: SafeSectionId,
    body: web::Json<StageMembershipRequest>,
) -> ActixResult<HttpResponse> {
    MEMBERSHIP_SERVICE
        .stage_section(course_id.0, session.0, section_id.0, body.into_inner(), &req)
        .await
}

pub async fn import_members(
    req: HttpRequest,
    course_id: SafeEntityId,
    session: SafeSessionId,
    section_id: SafeSectionId,
    body: web::Json<ImportMembersRequest>,
) -> ActixResult<HttpResponse> {
    MEMBERSHIP_SERVICE
        .import_members(course_id.0, session.0, section_id.0, body.into_inner(), &req)
        .await
}

pub async fn commit(
    req: HttpRequest,
    course_id: SafeEntityId,
    session: SafeSessionId,
) -> ActixResult<HttpResponse> {
    MEMBERSHIP_SERVICE.commit(course_id.0, session.0, &req).await
}

// 配置路由
pub fn configure_membership_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/courses/{id}/membership/{session}")
            .service(
                web::resource("")
                    .route(web::get().to(get_plan))
                    .route(web::delete().to(discard)),
            )
            .service(
                web::resource("/sections/{section_id}").route(web::put().to(stage_section)),
            )
            .service(
                web::resource("/sections/{section_id}/import")
                    .route(web::post().to(import_members)),
            )
            .service(
                web::resource("/commit").route(web::post().to(commit).wrap(RateLimit::commit())),
            ),
    );
}
