use serde::Deserialize;
use ts_rs::TS;

// 修改人员
#[derive(Debug, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/admin.ts")]
pub struct PatchUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub archived: Option<bool>,
}

// 修改课程（重命名 / 归档）
#[derive(Debug, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/admin.ts")]
pub struct PatchCourseRequest {
    pub code: Option<String>,
    pub name: Option<String>,
    pub archived: Option<bool>,
}

// 修改班级（重命名 / 归档）
#[derive(Debug, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/admin.ts")]
pub struct PatchSectionRequest {
    pub name: Option<String>,
    pub archived: Option<bool>,
}

// 归档 / 恢复考试
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/admin.ts")]
pub struct PatchExamRequest {
    pub archived: bool,
}

// 删除班级需显式确认
#[derive(Debug, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/admin.ts")]
pub struct DeleteSectionQuery {
    #[serde(default)]
    pub confirm: bool,
}
