use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::RateLimit;
use crate::models::imports::requests::{
    CommitImportRequest, EditRowRequest, ParseImportRequest, PreviewQuery, UploadImportQuery,
};
use crate::services::ImportService;
use crate::utils::{SafeImportTarget, SafeRowIndex, SafeSessionId};

// 懒加载的全局 IMPORT_SERVICE 实例
static IMPORT_SERVICE: Lazy<ImportService> = Lazy::new(ImportService::new_lazy);

pub async fn create_session() -> ActixResult<HttpResponse> {
    IMPORT_SERVICE.create_session().await
}

pub async fn download_template(target: SafeImportTarget) -> ActixResult<HttpResponse> {
    IMPORT_SERVICE.template(target.0).await
}

pub async fn parse_text(
    req: HttpRequest,
    session: SafeSessionId,
    target: SafeImportTarget,
    body: web::Json<ParseImportRequest>,
) -> ActixResult<HttpResponse> {
    IMPORT_SERVICE
        .parse_text(session.0, target.0, body.into_inner(), &req)
        .await
}

pub async fn upload_file(
    req: HttpRequest,
    session: SafeSessionId,
    target: SafeImportTarget,
    query: web::Query<UploadImportQuery>,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    IMPORT_SERVICE
        .upload_file(session.0, target.0, query.into_inner(), payload, &req)
        .await
}

pub async fn get_preview(
    req: HttpRequest,
    session: SafeSessionId,
    target: SafeImportTarget,
    query: web::Query<PreviewQuery>,
) -> ActixResult<HttpResponse> {
    IMPORT_SERVICE
        .get_preview(session.0, target.0, query.into_inner(), &req)
        .await
}

pub async fn edit_row(
    req: HttpRequest,
    session: SafeSessionId,
    target: SafeImportTarget,
    index: SafeRowIndex,
    body: web::Json<EditRowRequest>,
) -> ActixResult<HttpResponse> {
    IMPORT_SERVICE
        .edit_row(session.0, target.0, index.0, body.into_inner(), &req)
        .await
}

pub async fn remove_row(
    req: HttpRequest,
    session: SafeSessionId,
    target: SafeImportTarget,
    index: SafeRowIndex,
) -> ActixResult<HttpResponse> {
    IMPORT_SERVICE
        .remove_row(session.0, target.0, index.0, &req)
        .await
}

pub async fn clear(
    req: HttpRequest,
    session: SafeSessionId,
    target: SafeImportTarget,
) -> ActixResult<HttpResponse> {
    IMPORT_SERVICE.clear(session.0, target.0, &req).await
}

pub async fn commit(
    req: HttpRequest,
    session: SafeSessionId,
    target: SafeImportTarget,
    body: Option<web::Json<CommitImportRequest>>,
) -> ActixResult<HttpResponse> {
    let body = body.map(web::Json::into_inner).unwrap_or_default();
    IMPORT_SERVICE.commit(session.0, target.0, body, &req).await
}

// 配置路由
pub fn configure_import_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/imports")
            .service(web::resource("/sessions").route(web::post().to(create_session)))
            // 模板需先于 /{session}/{target} 注册
            .service(web::resource("/templates/{target}").route(web::get().to(download_template)))
            .service(
                web::resource("/{session}/{target}")
                    .route(web::get().to(get_preview))
                    .route(web::delete().to(clear)),
            )
            .service(web::resource("/{session}/{target}/parse").route(web::post().to(parse_text)))
            .service(
                web::resource("/{session}/{target}/upload")
                    .route(web::post().to(upload_file).wrap(RateLimit::upload())),
            )
            .service(
                web::resource("/{session}/{target}/rows/{index}")
                    .route(web::put().to(edit_row))
                    .route(web::delete().to(remove_row)),
            )
            .service(
                web::resource("/{session}/{target}/commit")
                    .route(web::post().to(commit).wrap(RateLimit::commit())),
            ),
    );
}
