pub mod entities;
pub mod sections;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::backend::BackendClient;
use crate::models::admin::requests::{
    DeleteSectionQuery, PatchCourseRequest, PatchExamRequest, PatchSectionRequest,
    PatchUserRequest,
};
use crate::services::context;

/// 单实体管理操作：改名、归档/恢复、删除班级
pub struct AdminService {
    client: Option<BackendClient>,
}

impl AdminService {
    pub fn new_lazy() -> Self {
        Self { client: None }
    }

    pub(crate) fn get_client(&self, request: &HttpRequest) -> BackendClient {
        match &self.client {
            Some(client) => client.clone(),
            None => context::backend_client(request),
        }
    }

    pub async fn patch_user(
        &self,
        user_id: String,
        body: PatchUserRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        entities::patch_user(self, user_id, body, request).await
    }

    pub async fn patch_course(
        &self,
        course_id: String,
        body: PatchCourseRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        entities::patch_course(self, course_id, body, request).await
    }

    pub async fn patch_exam(
        &self,
        exam_id: String,
        body: PatchExamRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        entities::patch_exam(self, exam_id, body, request).await
    }

    pub async fn patch_section(
        &self,
        section_id: String,
        body: PatchSectionRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        sections::patch_section(self, section_id, body, request).await
    }

    pub async fn delete_section(
        &self,
        section_id: String,
        query: DeleteSectionQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        sections::delete_section(self, section_id, query, request).await
    }
}
