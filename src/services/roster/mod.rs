pub mod detail;
pub mod export;
pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::backend::BackendClient;
use crate::models::navigation::NavParams;
use crate::models::roster::requests::{DetailQuery, ExportPeopleQuery, PeopleQuery};
use crate::services::context;

/// 名册读侧：列表、详情聚合与导出
pub struct RosterService {
    client: Option<BackendClient>,
}

impl RosterService {
    pub fn new_lazy() -> Self {
        Self { client: None }
    }

    pub(crate) fn get_client(&self, request: &HttpRequest) -> BackendClient {
        match &self.client {
            Some(client) => client.clone(),
            None => context::backend_client(request),
        }
    }

    pub async fn list_people(
        &self,
        query: PeopleQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_people(self, query, request).await
    }

    pub async fn list_courses(
        &self,
        params: NavParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_courses(self, params, request).await
    }

    pub async fn course_detail(
        &self,
        course_id: String,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        detail::course_detail(self, course_id, request).await
    }

    pub async fn section_detail(
        &self,
        section_id: String,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        detail::section_detail(self, section_id, request).await
    }

    pub async fn user_detail(
        &self,
        user_id: String,
        query: DetailQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        detail::user_detail(self, user_id, query, request).await
    }

    pub async fn export_people(
        &self,
        query: ExportPeopleQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        export::export_people(self, query, request).await
    }

    pub async fn export_courses(
        &self,
        params: DetailQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        export::export_courses(self, params, request).await
    }
}
