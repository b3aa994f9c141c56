use serde::Deserialize;
use ts_rs::TS;

use crate::models::directory::entities::{EntityId, PersonRole};

// 暂存某班级某角色的成员变更
//
// `intended` 给出时按期望成员与当前成员的差异计算增删，并与 add/remove 合并。
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/membership.ts")]
pub struct StageMembershipRequest {
    pub role: PersonRole,
    #[serde(default)]
    pub add: Vec<EntityId>,
    #[serde(default)]
    pub remove: Vec<EntityId>,
    #[serde(default)]
    pub intended: Option<Vec<EntityId>>,
}

fn default_import_role() -> PersonRole {
    PersonRole::Student
}

// 以 CSV 文本暂存需要创建并加入班级的用户
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/membership.ts")]
pub struct ImportMembersRequest {
    pub text: String,
    #[serde(default = "default_import_role")]
    pub role: PersonRole,
}
