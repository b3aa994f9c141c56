pub mod commit;
pub mod parse;
pub mod preview;
pub mod session;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::backend::BackendClient;
use crate::cache::StagingCache;
use crate::models::imports::entities::ImportTarget;
use crate::models::imports::requests::{
    CommitImportRequest, EditRowRequest, ParseImportRequest, PreviewQuery, UploadImportQuery,
};
use crate::services::context;

pub struct ImportService {
    client: Option<BackendClient>,
    staging: Option<StagingCache>,
}

impl ImportService {
    pub fn new_lazy() -> Self {
        Self {
            client: None,
            staging: None,
        }
    }

    pub(crate) fn get_client(&self, request: &HttpRequest) -> BackendClient {
        match &self.client {
            Some(client) => client.clone(),
            None => context::backend_client(request),
        }
    }

    pub(crate) fn get_staging(&self, request: &HttpRequest) -> StagingCache {
        match &self.staging {
            Some(staging) => staging.clone(),
            None => context::staging_cache(request),
        }
    }

    // 分配控制台会话
    pub async fn create_session(&self) -> ActixResult<HttpResponse> {
        session::create_session().await
    }

    // 解析粘贴文本
    pub async fn parse_text(
        &self,
        session_id: String,
        target: ImportTarget,
        body: ParseImportRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        parse::parse_text(self, session_id, target, body, request).await
    }

    // 解析上传文件
    pub async fn upload_file(
        &self,
        session_id: String,
        target: ImportTarget,
        query: UploadImportQuery,
        payload: Multipart,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        parse::upload_file(self, session_id, target, query, payload, request).await
    }

    // 预览
    pub async fn get_preview(
        &self,
        session_id: String,
        target: ImportTarget,
        query: PreviewQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        preview::get_preview(self, session_id, target, query, request).await
    }

    // 修改单行
    pub async fn edit_row(
        &self,
        session_id: String,
        target: ImportTarget,
        index: usize,
        body: EditRowRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        preview::edit_row(self, session_id, target, index, body, request).await
    }

    // 删除单行
    pub async fn remove_row(
        &self,
        session_id: String,
        target: ImportTarget,
        index: usize,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        preview::remove_row(self, session_id, target, index, request).await
    }

    // 取消导入
    pub async fn clear(
        &self,
        session_id: String,
        target: ImportTarget,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        preview::clear(self, session_id, target, request).await
    }

    // 提交
    pub async fn commit(
        &self,
        session_id: String,
        target: ImportTarget,
        body: CommitImportRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        commit::commit(self, session_id, target, body, request).await
    }

    // 导入模板
    pub async fn template(&self, target: ImportTarget) -> ActixResult<HttpResponse> {
        session::template(target).await
    }
}
