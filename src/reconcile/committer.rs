//! 提交执行器
//!
//! 逐行模式下每行独立执行，单行失败被记录后继续处理后续行（部分成功，不是事务）。
//! 成员计划按固定顺序执行：教师移除 -> 教师加入 -> 学生移除 -> 学生加入 -> 导入行创建并加入，
//! 每个阶段覆盖全部分班后再进入下一阶段，先移除再加入以释放唯一性约束。所有调用均顺序等待。

use serde::Serialize;
use std::collections::HashMap;
use tracing::{info, warn};
use ts_rs::TS;

use super::CommitStrategy;
use super::delta::{EnrollmentDelta, MembershipPlan};
use crate::backend::requests::{
    BatchEnroll, CreateEnrollment, DeleteEnrollment, NewCourse, NewSection, NewUser,
};
use crate::backend::{BackendClient, Ensured};
use crate::errors::{Result, RosterError};
use crate::models::directory::entities::{EntityId, PersonRole};
use crate::models::imports::entities::{AssignmentContext, CommitReport, ImportRecord, ImportTarget};

/// 提交时用于把邮箱 / 课程代码解析为 ID 的索引（键均为小写）
#[derive(Debug, Clone, Default)]
pub struct Lookup {
    pub user_ids_by_email: HashMap<String, EntityId>,
    pub course_ids_by_code: HashMap<String, EntityId>,
}

impl Lookup {
    pub fn user_id(&self, email: &str) -> Option<&EntityId> {
        self.user_ids_by_email.get(&email.trim().to_lowercase())
    }

    pub fn course_id(&self, code: &str) -> Option<&EntityId> {
        self.course_ids_by_code.get(&code.trim().to_lowercase())
    }
}

// 成员计划提交结果
#[derive(Debug, Clone, Default, Serialize, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/membership.ts")]
pub struct MembershipCommitReport {
    pub added: usize,
    pub removed: usize,
    pub created: usize,
    /// 目标状态已满足而未做变更的操作数
    pub skipped: usize,
    pub errors: Vec<String>,
}

enum RowOutcome {
    Created,
    Skipped,
}

pub struct Reconciler {
    client: BackendClient,
}

impl Reconciler {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    /// 提交暂存行。`rows` 为 (暂存下标, 记录)
    pub async fn commit_import(
        &self,
        target: ImportTarget,
        rows: &[(usize, ImportRecord)],
        context: Option<&AssignmentContext>,
        lookup: &Lookup,
        strategy: CommitStrategy,
    ) -> Result<CommitReport> {
        if target == ImportTarget::Assignments && context.is_none() {
            return Err(RosterError::validation(
                "Assignment import requires a course context",
            ));
        }

        info!(
            "Committing {} {} rows with {} strategy",
            rows.len(),
            target,
            strategy
        );

        let report = match strategy {
            CommitStrategy::PerRow => self.commit_per_row(target, rows, context, lookup).await,
            CommitStrategy::Batch => self.commit_batch(target, rows, context).await?,
        };

        info!(
            "Commit of {} finished: created={}, skipped={}, errors={}",
            target,
            report.created_count,
            report.skipped_count,
            report.errors.len()
        );
        Ok(report)
    }

    async fn commit_per_row(
        &self,
        target: ImportTarget,
        rows: &[(usize, ImportRecord)],
        context: Option<&AssignmentContext>,
        lookup: &Lookup,
    ) -> CommitReport {
        let mut report = CommitReport::default();

        for (index, record) in rows {
            match self.create_one(target, record, context, lookup).await {
                Ok(RowOutcome::Created) => report.created_count += 1,
                Ok(RowOutcome::Skipped) => report.skipped_count += 1,
                Err(e) if e.is_conflict() => report.skipped_count += 1,
                Err(e) => {
                    let message = format!("Row {} ({}): {}", index + 1, row_label(record), e.message());
                    warn!("Import row failed: {}", message);
                    report.errors.push(message);
                }
            }
        }

        report
    }

    async fn create_one(
        &self,
        target: ImportTarget,
        record: &ImportRecord,
        context: Option<&AssignmentContext>,
        lookup: &Lookup,
    ) -> Result<RowOutcome> {
        match record {
            ImportRecord::User { name, email } => {
                let role = target.person_role().ok_or_else(|| {
                    RosterError::validation(format!("{target} import does not create users"))
                })?;
                self.client
                    .create_user(role, name.clone(), email.trim().to_string())
                    .await?;
                Ok(RowOutcome::Created)
            }
            ImportRecord::Course { code, name } => {
                self.client
                    .create_course(code.trim().to_string(), name.trim().to_string())
                    .await?;
                Ok(RowOutcome::Created)
            }
            ImportRecord::Section { course_code, name } => {
                let course_id = lookup.course_id(course_code).ok_or_else(|| {
                    RosterError::not_found(format!("Unknown course code \"{course_code}\""))
                })?;
                self.client
                    .create_section(course_id.clone(), name.trim().to_string())
                    .await?;
                Ok(RowOutcome::Created)
            }
            ImportRecord::Assignment { email } => {
                let context = context.ok_or_else(|| {
                    RosterError::validation("Assignment import requires a course context")
                })?;
                let user_id = lookup.user_id(email).ok_or_else(|| {
                    RosterError::not_found(format!("No user with email \"{email}\""))
                })?;
                let ensured = self
                    .client
                    .ensure_enrolled(CreateEnrollment {
                        user_id: user_id.clone(),
                        course_id: context.course_id.clone(),
                        class_id: context.section_id.clone(),
                        role: context.role,
                    })
                    .await?;
                Ok(match ensured {
                    Ensured::Applied => RowOutcome::Created,
                    Ensured::AlreadySatisfied => RowOutcome::Skipped,
                })
            }
        }
    }

    /// 一次调用批量接口，结果原样返回
    async fn commit_batch(
        &self,
        target: ImportTarget,
        rows: &[(usize, ImportRecord)],
        context: Option<&AssignmentContext>,
    ) -> Result<CommitReport> {
        let records = rows.iter().map(|(_, record)| record);

        match target {
            ImportTarget::Teachers | ImportTarget::Students => {
                let users = records
                    .filter_map(|record| match record {
                        ImportRecord::User { name, email } => Some(NewUser {
                            name: name.clone(),
                            email: email.trim().to_string(),
                        }),
                        _ => None,
                    })
                    .collect();
                let role = target.person_role().unwrap_or(PersonRole::Student);
                self.client.batch_create_users(role, users).await
            }
            ImportTarget::Courses => {
                let courses = records
                    .filter_map(|record| match record {
                        ImportRecord::Course { code, name } => Some(NewCourse {
                            code: code.trim().to_string(),
                            name: name.trim().to_string(),
                        }),
                        _ => None,
                    })
                    .collect();
                self.client.batch_create_courses(courses).await
            }
            ImportTarget::Sections => {
                let sections = records
                    .filter_map(|record| match record {
                        ImportRecord::Section { course_code, name } => Some(NewSection {
                            course_code: course_code.trim().to_string(),
                            name: name.trim().to_string(),
                        }),
                        _ => None,
                    })
                    .collect();
                self.client.batch_create_sections(sections).await
            }
            ImportTarget::Assignments => {
                let context = context.ok_or_else(|| {
                    RosterError::validation("Assignment import requires a course context")
                })?;
                let emails = records
                    .filter_map(|record| record.email().map(|e| e.trim().to_string()))
                    .collect();
                self.client
                    .batch_enroll(BatchEnroll {
                        role: context.role,
                        course_id: context.course_id.clone(),
                        class_id: context.section_id.clone(),
                        emails,
                    })
                    .await
            }
        }
    }

    /// 执行成员变更计划
    ///
    /// 每个阶段覆盖计划中的全部分班后才进入下一阶段，跨分班调动时先移除再加入。
    pub async fn commit_membership(&self, plan: &MembershipPlan, lookup: &Lookup) -> MembershipCommitReport {
        let mut report = MembershipCommitReport::default();
        let course_id = &plan.course_id;

        info!(
            "Applying membership plan for course {} across {} sections",
            course_id,
            plan.sections.len()
        );

        for role in [PersonRole::Teacher, PersonRole::Student] {
            for (section_id, delta) in &plan.sections {
                self.apply_removals(section_id, delta.for_role(role), &mut report)
                    .await;
            }
            for (section_id, delta) in &plan.sections {
                self.apply_additions(course_id, section_id, role, delta.for_role(role), &mut report)
                    .await;
            }
        }

        for role in [PersonRole::Teacher, PersonRole::Student] {
            for (section_id, delta) in &plan.sections {
                self.apply_imported(course_id, section_id, role, delta.for_role(role), lookup, &mut report)
                    .await;
            }
        }

        report
    }

    async fn apply_removals(
        &self,
        section_id: &EntityId,
        delta: &EnrollmentDelta,
        report: &mut MembershipCommitReport,
    ) {
        for user_id in &delta.removed {
            let key = DeleteEnrollment::ByMember {
                user_id: user_id.clone(),
                class_id: section_id.clone(),
            };
            match self.client.ensure_unenrolled(key).await {
                Ok(Ensured::Applied) => report.removed += 1,
                Ok(Ensured::AlreadySatisfied) => report.skipped += 1,
                Err(e) => push_failure(report, section_id, "remove", user_id, &e),
            }
        }
    }

    async fn apply_additions(
        &self,
        course_id: &EntityId,
        section_id: &EntityId,
        role: PersonRole,
        delta: &EnrollmentDelta,
        report: &mut MembershipCommitReport,
    ) {
        for user_id in &delta.added {
            match self.enroll(course_id, section_id, role, user_id).await {
                Ok(Ensured::Applied) => report.added += 1,
                Ok(Ensured::AlreadySatisfied) => report.skipped += 1,
                Err(e) => push_failure(report, section_id, "add", user_id, &e),
            }
        }
    }

    async fn apply_imported(
        &self,
        course_id: &EntityId,
        section_id: &EntityId,
        role: PersonRole,
        delta: &EnrollmentDelta,
        lookup: &Lookup,
        report: &mut MembershipCommitReport,
    ) {
        for row in &delta.imported_rows {
            let Some(email) = row.email() else {
                continue;
            };
            let name = match row {
                ImportRecord::User { name, .. } => name.clone(),
                _ => None,
            };

            let user_id = match self.client.create_user(role, name, email.trim().to_string()).await {
                Ok(person) => {
                    report.created += 1;
                    person.id
                }
                Err(e) if e.is_conflict() => match lookup.user_id(email) {
                    Some(id) => id.clone(),
                    None => {
                        let e = RosterError::conflict(format!(
                            "{email} already exists but is not in the directory"
                        ));
                        push_failure(report, section_id, "create", email, &e);
                        continue;
                    }
                },
                Err(e) => {
                    push_failure(report, section_id, "create", email, &e);
                    continue;
                }
            };

            match self.enroll(course_id, section_id, role, &user_id).await {
                Ok(Ensured::Applied) => report.added += 1,
                Ok(Ensured::AlreadySatisfied) => report.skipped += 1,
                Err(e) => push_failure(report, section_id, "add", email, &e),
            }
        }
    }

    async fn enroll(
        &self,
        course_id: &EntityId,
        section_id: &EntityId,
        role: PersonRole,
        user_id: &EntityId,
    ) -> Result<Ensured> {
        self.client
            .ensure_enrolled(CreateEnrollment {
                user_id: user_id.clone(),
                course_id: course_id.clone(),
                class_id: Some(section_id.clone()),
                role,
            })
            .await
    }
}

fn push_failure(
    report: &mut MembershipCommitReport,
    section_id: &str,
    action: &str,
    subject: &str,
    error: &RosterError,
) {
    let message = format!("Section {section_id}: {action} {subject}: {}", error.message());
    warn!("Membership operation failed: {}", message);
    report.errors.push(message);
}

/// 错误信息中标识行的简短文本
fn row_label(record: &ImportRecord) -> String {
    record
        .cells()
        .into_iter()
        .filter(|cell| !cell.is_empty())
        .collect::<Vec<_>>()
        .join(" / ")
}
