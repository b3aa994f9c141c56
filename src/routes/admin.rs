use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::models::admin::requests::{
    DeleteSectionQuery, PatchCourseRequest, PatchExamRequest, PatchSectionRequest,
    PatchUserRequest,
};
use crate::services::AdminService;
use crate::utils::SafeEntityId;

static ADMIN_SERVICE: Lazy<AdminService> = Lazy::new(AdminService::new_lazy);

pub async fn patch_user(
    req: HttpRequest,
    user_id: SafeEntityId,
    body: web::Json<PatchUserRequest>,
) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE
        .patch_user(user_id.0, body.into_inner(), &req)
        .await
}

pub async fn patch_course(
    req: HttpRequest,
    course_id: SafeEntityId,
    body: web::Json<PatchCourseRequest>,
) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE
        .patch_course(course_id.0, body.into_inner(), &req)
        .await
}

pub async fn patch_section(
    req: HttpRequest,
    section_id: SafeEntityId,
    body: web::Json<PatchSectionRequest>,
) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE
        .patch_section(section_id.0, body.into_inner(), &req)
        .await
}

pub async fn delete_section(
    req: HttpRequest,
    section_id: SafeEntityId,
    query: web::Query<DeleteSectionQuery>,
) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE
        .delete_section(section_id.0, query.into_inner(), &req)
        .await
}

pub async fn patch_exam(
    req: HttpRequest,
    exam_id: SafeEntityId,
    body: web::Json<PatchExamRequest>,
) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE
        .patch_exam(exam_id.0, body.into_inner(), &req)
        .await
}

// 配置路由
pub fn configure_admin_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/v1/users/{id}").route(web::patch().to(patch_user)))
        .service(web::resource("/api/v1/courses/{id}").route(web::patch().to(patch_course)))
        .service(
            web::resource("/api/v1/sections/{id}")
                .route(web::patch().to(patch_section))
                // 硬删除，需 confirm=true
                .route(web::delete().to(delete_section)),
        )
        .service(web::resource("/api/v1/exams/{id}").route(web::patch().to(patch_exam)));
}
