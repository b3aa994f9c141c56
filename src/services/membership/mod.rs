pub mod commit;
pub mod stage;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::backend::BackendClient;
use crate::cache::MembershipCache;
use crate::models::membership::requests::{ImportMembersRequest, StageMembershipRequest};
use crate::services::context;

/// 课程成员编辑会话
pub struct MembershipService {
    client: Option<BackendClient>,
    plans: Option<MembershipCache>,
}

impl MembershipService {
    pub fn new_lazy() -> Self {
        Self {
            client: None,
            plans: None,
        }
    }

    pub(crate) fn get_client(&self, request: &HttpRequest) -> BackendClient {
        match &self.client {
            Some(client) => client.clone(),
            None => context::backend_client(request),
        }
    }

    pub(crate) fn get_plans(&self, request: &HttpRequest) -> MembershipCache {
        match &self.plans {
            Some(plans) => plans.clone(),
            None => context::membership_cache(request),
        }
    }

    pub async fn get_plan(
        &self,
        course_id: String,
        session_id: String,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        stage::get_plan(self, course_id, session_id, request).await
    }

    pub async fn stage_section(
        &self,
        course_id: String,
        session_id: String,
        section_id: String,
        body: StageMembershipRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        stage::stage_section(self, course_id, session_id, section_id, body, request).await
    }

    pub async fn import_members(
        &self,
        course_id: String,
        session_id: String,
        section_id: String,
        body: ImportMembersRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        stage::import_members(self, course_id, session_id, section_id, body, request).await
    }

    pub async fn discard(
        &self,
        course_id: String,
        session_id: String,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        stage::discard(self, course_id, session_id, request).await
    }

    pub async fn commit(
        &self,
        course_id: String,
        session_id: String,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        commit::commit(self, course_id, session_id, request).await
    }
}
