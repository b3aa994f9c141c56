use serde::Deserialize;
use ts_rs::TS;

use super::entities::{AssignmentContext, RowField};
use crate::models::directory::entities::{EntityId, PersonRole};
use crate::reconcile::CommitStrategy;

// 粘贴文本解析请求
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/import.ts")]
pub struct ParseImportRequest {
    pub text: String,
    #[serde(default)]
    pub context: Option<AssignmentContext>,
}

// 文件上传时通过查询参数传入的关联上下文
#[derive(Debug, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/import.ts")]
pub struct UploadImportQuery {
    pub course_id: Option<EntityId>,
    pub section_id: Option<EntityId>,
    pub role: Option<PersonRole>,
}

impl UploadImportQuery {
    pub fn into_context(self) -> Option<AssignmentContext> {
        let course_id = self.course_id?;
        Some(AssignmentContext {
            course_id,
            section_id: self.section_id,
            role: self.role.unwrap_or(PersonRole::Student),
        })
    }
}

// 预览查询参数
#[derive(Debug, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/import.ts")]
pub struct PreviewQuery {
    #[serde(default)]
    pub show_all: bool,
}

// 单行字段编辑请求
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/import.ts")]
pub struct EditRowRequest {
    pub field: RowField,
    pub value: String,
}

// 提交请求
#[derive(Debug, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/import.ts")]
pub struct CommitImportRequest {
    #[serde(default)]
    pub strategy: Option<CommitStrategy>,
}
