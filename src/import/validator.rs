//! 行校验与批内去重
//!
//! 列约定（面向用户的 CSV 格式，必须保持）：
//! - 含邮箱的行：仅一列时该列为邮箱；否则第一列为姓名、第二列为邮箱
//! - 课程行：code, name
//! - 班级行：courseCode, name
//!
//! 同一批次内按小写键去重，首次出现者为准，后续重复行被拒绝并记入错误列表。

use std::collections::HashSet;

use super::parser::Row;
use crate::models::imports::entities::{ImportRecord, RowShape, RowStatus};
use crate::utils::validate::validate_email;

/// 校验结果：有效记录与完整的错误列表
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationOutcome {
    pub records: Vec<ImportRecord>,
    pub errors: Vec<String>,
}

/// 单行问题
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordIssue {
    Missing(&'static str),
    InvalidEmail(String),
}

impl RecordIssue {
    pub fn status(&self) -> RowStatus {
        match self {
            RecordIssue::Missing("email") | RecordIssue::InvalidEmail(_) => RowStatus::InvalidEmail,
            RecordIssue::Missing(_) => RowStatus::Incomplete,
        }
    }

    fn describe(&self, row_number: usize) -> String {
        match self {
            RecordIssue::Missing(field) => format!("Row {row_number}: missing {field}"),
            RecordIssue::InvalidEmail(value) => {
                format!("Row {row_number}: invalid email format \"{value}\"")
            }
        }
    }
}

/// 按列约定把原始行转换为记录，缺失字段留空
pub fn to_record(row: &[String], shape: RowShape) -> ImportRecord {
    let cell = |idx: usize| row.get(idx).map(|c| c.trim().to_string()).unwrap_or_default();

    match shape {
        RowShape::User => {
            if row.len() == 1 {
                ImportRecord::User {
                    name: None,
                    email: cell(0),
                }
            } else {
                let name = cell(0);
                ImportRecord::User {
                    name: if name.is_empty() { None } else { Some(name) },
                    email: cell(1),
                }
            }
        }
        RowShape::Assignment => ImportRecord::Assignment {
            email: if row.len() == 1 { cell(0) } else { cell(1) },
        },
        RowShape::Course => ImportRecord::Course {
            code: cell(0),
            name: cell(1),
        },
        RowShape::Section => ImportRecord::Section {
            course_code: cell(0),
            name: cell(1),
        },
    }
}

/// 单条记录的格式检查
pub fn check_record(record: &ImportRecord) -> Result<(), RecordIssue> {
    match record {
        ImportRecord::User { email, .. } | ImportRecord::Assignment { email } => {
            if email.trim().is_empty() {
                return Err(RecordIssue::Missing("email"));
            }
            validate_email(email).map_err(|_| RecordIssue::InvalidEmail(email.clone()))
        }
        ImportRecord::Course { code, name } => {
            if code.trim().is_empty() {
                Err(RecordIssue::Missing("course code"))
            } else if name.trim().is_empty() {
                Err(RecordIssue::Missing("course name"))
            } else {
                Ok(())
            }
        }
        ImportRecord::Section { course_code, name } => {
            if course_code.trim().is_empty() {
                Err(RecordIssue::Missing("course code"))
            } else if name.trim().is_empty() {
                Err(RecordIssue::Missing("section name"))
            } else {
                Ok(())
            }
        }
    }
}

/// 计算每行状态。状态是 (行, 批次) 的纯函数
///
/// `existing` 为已存在记录的小写键集合；提供时有效行细分为 `new` / `exists`。
pub fn row_statuses(records: &[ImportRecord], existing: Option<&HashSet<String>>) -> Vec<RowStatus> {
    let mut seen: HashSet<String> = HashSet::with_capacity(records.len());

    records
        .iter()
        .map(|record| {
            if let Err(issue) = check_record(record) {
                return issue.status();
            }
            let Some(key) = record.dedup_key() else {
                return RowStatus::Incomplete;
            };
            if !seen.insert(key.clone()) {
                return RowStatus::Duplicate;
            }
            match existing {
                Some(keys) if keys.contains(&key) => RowStatus::Exists,
                Some(_) => RowStatus::New,
                None => RowStatus::Valid,
            }
        })
        .collect()
}

/// 校验记录列表，返回有效记录与错误
pub fn validate_records(records: &[ImportRecord]) -> ValidationOutcome {
    let mut outcome = ValidationOutcome::default();
    let mut seen: HashSet<String> = HashSet::with_capacity(records.len());

    for (idx, record) in records.iter().enumerate() {
        let row_number = idx + 1;
        if let Err(issue) = check_record(record) {
            outcome.errors.push(issue.describe(row_number));
            continue;
        }
        let Some(key) = record.dedup_key() else {
            outcome.errors.push(format!("Row {row_number}: missing required field"));
            continue;
        };
        if !seen.insert(key.clone()) {
            outcome
                .errors
                .push(format!("Row {row_number}: duplicate \"{key}\""));
            continue;
        }
        outcome.records.push(record.clone());
    }

    outcome
}

/// 解析行 -> 记录 -> 校验
pub fn validate_rows(rows: &[Row], shape: RowShape) -> ValidationOutcome {
    let records: Vec<ImportRecord> = rows.iter().map(|row| to_record(row, shape)).collect();
    validate_records(&records)
}
