//! 班级成员变更计划
//!
//! 一次课程编辑会话内，按班级 ID 记录每个角色的增删与 CSV 导入行。
//! 所有更新均返回新值，原值保持不变。

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::directory::entities::{EntityId, PersonRole};
use crate::models::imports::entities::ImportRecord;

// 单个角色的待提交变更
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/membership.ts")]
pub struct EnrollmentDelta {
    pub added: BTreeSet<EntityId>,
    pub removed: BTreeSet<EntityId>,
    /// 需要先创建用户再加入的行
    pub imported_rows: Vec<ImportRecord>,
}

impl EnrollmentDelta {
    /// 加入一名用户；若该用户待移除，则仅撤销移除
    pub fn with_added(&self, user_id: &str) -> Self {
        let mut next = self.clone();
        if !next.removed.remove(user_id) {
            next.added.insert(user_id.to_string());
        }
        next
    }

    /// 移除一名用户；若该用户待加入，则仅撤销加入
    pub fn with_removed(&self, user_id: &str) -> Self {
        let mut next = self.clone();
        if !next.added.remove(user_id) {
            next.removed.insert(user_id.to_string());
        }
        next
    }

    /// 追加导入行，按邮箱（小写）去重
    pub fn with_imported(&self, rows: impl IntoIterator<Item = ImportRecord>) -> Self {
        let mut next = self.clone();
        let mut seen: HashSet<String> = next
            .imported_rows
            .iter()
            .filter_map(ImportRecord::dedup_key)
            .collect();
        for row in rows {
            if let Some(key) = row.dedup_key()
                && seen.insert(key)
            {
                next.imported_rows.push(row);
            }
        }
        next
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.imported_rows.is_empty()
    }

    pub fn operation_count(&self) -> usize {
        self.added.len() + self.removed.len() + self.imported_rows.len()
    }
}

// 单个班级的变更（按角色）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/membership.ts")]
pub struct SectionDelta {
    pub teachers: EnrollmentDelta,
    pub students: EnrollmentDelta,
}

impl SectionDelta {
    pub fn for_role(&self, role: PersonRole) -> &EnrollmentDelta {
        match role {
            PersonRole::Teacher => &self.teachers,
            PersonRole::Student => &self.students,
        }
    }

    pub fn with_role(&self, role: PersonRole, delta: EnrollmentDelta) -> Self {
        let mut next = self.clone();
        match role {
            PersonRole::Teacher => next.teachers = delta,
            PersonRole::Student => next.students = delta,
        }
        next
    }

    pub fn is_empty(&self) -> bool {
        self.teachers.is_empty() && self.students.is_empty()
    }

    pub fn operation_count(&self) -> usize {
        self.teachers.operation_count() + self.students.operation_count()
    }
}

// 一门课程的成员变更计划：班级 ID -> 变更
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/membership.ts")]
pub struct MembershipPlan {
    pub course_id: EntityId,
    pub sections: BTreeMap<EntityId, SectionDelta>,
}

impl MembershipPlan {
    pub fn new(course_id: impl Into<EntityId>) -> Self {
        Self {
            course_id: course_id.into(),
            sections: BTreeMap::new(),
        }
    }

    pub fn section(&self, section_id: &str) -> Option<&SectionDelta> {
        self.sections.get(section_id)
    }

    /// 替换某班级某角色的变更；空变更会被移出计划
    pub fn with_delta(&self, section_id: &str, role: PersonRole, delta: EnrollmentDelta) -> Self {
        let mut next = self.clone();
        let section = next
            .sections
            .get(section_id)
            .cloned()
            .unwrap_or_default()
            .with_role(role, delta);
        if section.is_empty() {
            next.sections.remove(section_id);
        } else {
            next.sections.insert(section_id.to_string(), section);
        }
        next
    }

    /// 以函数更新某班级某角色的变更
    pub fn update<F>(&self, section_id: &str, role: PersonRole, f: F) -> Self
    where
        F: FnOnce(&EnrollmentDelta) -> EnrollmentDelta,
    {
        let current = self
            .section(section_id)
            .map(|s| s.for_role(role).clone())
            .unwrap_or_default();
        self.with_delta(section_id, role, f(&current))
    }

    pub fn is_empty(&self) -> bool {
        self.sections.values().all(SectionDelta::is_empty)
    }

    pub fn pending_operations(&self) -> usize {
        self.sections.values().map(SectionDelta::operation_count).sum()
    }
}

/// 对比当前成员与期望成员，得出增删集合
pub fn diff_membership<'a, C, I>(current: C, intended: I) -> EnrollmentDelta
where
    C: IntoIterator<Item = &'a EntityId>,
    I: IntoIterator<Item = &'a EntityId>,
{
    let current: BTreeSet<EntityId> = current.into_iter().cloned().collect();
    let intended: BTreeSet<EntityId> = intended.into_iter().cloned().collect();

    EnrollmentDelta {
        added: intended.difference(&current).cloned().collect(),
        removed: current.difference(&intended).cloned().collect(),
        imported_rows: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[&str]) -> Vec<EntityId> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_helpers_do_not_mutate_original() {
        let original = EnrollmentDelta::default();
        let next = original.with_added("u1").with_removed("u2");
        assert!(original.is_empty());
        assert!(next.added.contains("u1"));
        assert!(next.removed.contains("u2"));
    }

    #[test]
    fn test_add_cancels_pending_removal() {
        let delta = EnrollmentDelta::default().with_removed("u1").with_added("u1");
        assert!(delta.is_empty());

        let delta = EnrollmentDelta::default().with_added("u2").with_removed("u2");
        assert!(delta.is_empty());
    }

    #[test]
    fn test_imported_rows_dedup_by_email() {
        let rows = vec![
            ImportRecord::User {
                name: None,
                email: "a@x.com".into(),
            },
            ImportRecord::User {
                name: Some("A".into()),
                email: "A@X.com".into(),
            },
        ];
        let delta = EnrollmentDelta::default().with_imported(rows);
        assert_eq!(delta.imported_rows.len(), 1);
    }

    #[test]
    fn test_diff_membership() {
        let current = ids(&["u1", "u2", "u3"]);
        let intended = ids(&["u2", "u3", "u4"]);
        let delta = diff_membership(&current, &intended);
        assert_eq!(delta.added, ["u4".to_string()].into_iter().collect());
        assert_eq!(delta.removed, ["u1".to_string()].into_iter().collect());
    }

    #[test]
    fn test_plan_keeps_roles_separate_and_drops_empty_sections() {
        let plan = MembershipPlan::new("c1");
        let plan = plan.update("s1", PersonRole::Teacher, |d| d.with_added("t1"));
        let plan = plan.update("s1", PersonRole::Student, |d| d.with_added("u1"));
        assert_eq!(plan.pending_operations(), 2);
        assert!(plan.section("s1").unwrap().teachers.added.contains("t1"));

        let plan = plan
            .update("s1", PersonRole::Teacher, |d| d.with_removed("t1"))
            .update("s1", PersonRole::Student, |d| d.with_removed("u1"));
        assert!(plan.is_empty());
        assert!(plan.section("s1").is_none());
    }
}
