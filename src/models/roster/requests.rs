use serde::Deserialize;
use ts_rs::TS;

use crate::models::directory::entities::PersonRole;
use crate::models::navigation::NavParams;

// 人员列表查询：导航参数加角色过滤
#[derive(Debug, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/roster.ts")]
pub struct PeopleQuery {
    #[serde(default)]
    pub role: Option<PersonRole>,
    #[serde(flatten)]
    pub nav: NavParams,
}

// 详情查询
#[derive(Debug, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/roster.ts")]
pub struct DetailQuery {
    #[serde(default)]
    pub include_archived: bool,
}

// 导出人员查询
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/roster.ts")]
pub struct ExportPeopleQuery {
    pub role: PersonRole,
    #[serde(default)]
    pub include_archived: bool,
}
