use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::directory::entities::{EntityId, PersonRole};

// 批量导入目标
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "../frontend/src/types/generated/import.ts")]
pub enum ImportTarget {
    Teachers,
    Students,
    Courses,
    Sections,
    Assignments,
}

impl ImportTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportTarget::Teachers => "teachers",
            ImportTarget::Students => "students",
            ImportTarget::Courses => "courses",
            ImportTarget::Sections => "sections",
            ImportTarget::Assignments => "assignments",
        }
    }

    /// 该目标对应的行结构
    pub fn shape(&self) -> RowShape {
        match self {
            ImportTarget::Teachers | ImportTarget::Students => RowShape::User,
            ImportTarget::Courses => RowShape::Course,
            ImportTarget::Sections => RowShape::Section,
            ImportTarget::Assignments => RowShape::Assignment,
        }
    }

    /// 创建人员时使用的角色
    pub fn person_role(&self) -> Option<PersonRole> {
        match self {
            ImportTarget::Teachers => Some(PersonRole::Teacher),
            ImportTarget::Students => Some(PersonRole::Student),
            _ => None,
        }
    }
}

impl std::fmt::Display for ImportTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ImportTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "teachers" => Ok(ImportTarget::Teachers),
            "students" => Ok(ImportTarget::Students),
            "courses" => Ok(ImportTarget::Courses),
            "sections" => Ok(ImportTarget::Sections),
            "assignments" => Ok(ImportTarget::Assignments),
            _ => Err(format!(
                "Invalid import target: {s}. Supported: teachers, students, courses, sections, assignments"
            )),
        }
    }
}

/// 行结构
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowShape {
    /// name?, email
    User,
    /// code, name
    Course,
    /// courseCode, name
    Section,
    /// email
    Assignment,
}

// 暂存中的一行导入数据
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[serde(tag = "kind", rename_all = "lowercase")]
#[ts(export, export_to = "../frontend/src/types/generated/import.ts")]
pub enum ImportRecord {
    User {
        name: Option<String>,
        email: String,
    },
    Course {
        code: String,
        name: String,
    },
    Section {
        #[serde(rename = "courseCode")]
        course_code: String,
        name: String,
    },
    Assignment {
        email: String,
    },
}

impl ImportRecord {
    pub fn shape(&self) -> RowShape {
        match self {
            ImportRecord::User { .. } => RowShape::User,
            ImportRecord::Course { .. } => RowShape::Course,
            ImportRecord::Section { .. } => RowShape::Section,
            ImportRecord::Assignment { .. } => RowShape::Assignment,
        }
    }

    /// 行中的邮箱（仅对含邮箱的行有效）
    pub fn email(&self) -> Option<&str> {
        match self {
            ImportRecord::User { email, .. } | ImportRecord::Assignment { email } => {
                Some(email.as_str())
            }
            _ => None,
        }
    }

    /// 批内去重键（小写）。必填字段缺失时返回 None
    pub fn dedup_key(&self) -> Option<String> {
        match self {
            ImportRecord::User { email, .. } | ImportRecord::Assignment { email } => {
                non_empty(email).map(str::to_lowercase)
            }
            ImportRecord::Course { code, .. } => non_empty(code).map(str::to_lowercase),
            ImportRecord::Section { course_code, name } => {
                let code = non_empty(course_code)?;
                let name = non_empty(name)?;
                Some(format!("{}::{}", code.to_lowercase(), name.to_lowercase()))
            }
        }
    }

    /// 原地修改单个字段
    pub fn set_field(&mut self, field: RowField, value: String) -> Result<(), String> {
        let value = value.trim().to_string();
        match (self, field) {
            (ImportRecord::User { name, .. }, RowField::Name) => {
                *name = if value.is_empty() { None } else { Some(value) };
            }
            (ImportRecord::User { email, .. }, RowField::Email)
            | (ImportRecord::Assignment { email }, RowField::Email) => *email = value,
            (ImportRecord::Course { code, .. }, RowField::Code) => *code = value,
            (ImportRecord::Course { name, .. }, RowField::Name)
            | (ImportRecord::Section { name, .. }, RowField::Name) => *name = value,
            (ImportRecord::Section { course_code, .. }, RowField::CourseCode) => {
                *course_code = value
            }
            (record, field) => {
                return Err(format!(
                    "Field '{}' does not exist on {:?} rows",
                    field.as_str(),
                    record.shape()
                ));
            }
        }
        Ok(())
    }

    /// 导出/展示用的字段序列
    pub fn cells(&self) -> Vec<&str> {
        match self {
            ImportRecord::User { name, email } => {
                vec![name.as_deref().unwrap_or(""), email.as_str()]
            }
            ImportRecord::Course { code, name } => vec![code.as_str(), name.as_str()],
            ImportRecord::Section { course_code, name } => {
                vec![course_code.as_str(), name.as_str()]
            }
            ImportRecord::Assignment { email } => vec![email.as_str()],
        }
    }
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() { None } else { Some(trimmed) }
}

// 可编辑字段
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/import.ts")]
pub enum RowField {
    Name,
    Email,
    Code,
    CourseCode,
}

impl RowField {
    pub fn as_str(&self) -> &'static str {
        match self {
            RowField::Name => "name",
            RowField::Email => "email",
            RowField::Code => "code",
            RowField::CourseCode => "courseCode",
        }
    }
}

// 行状态，由 (行, 批次) 推导，不持久化
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export, export_to = "../frontend/src/types/generated/import.ts")]
pub enum RowStatus {
    Valid,
    New,
    Exists,
    InvalidEmail,
    Duplicate,
    Incomplete,
}

impl RowStatus {
    /// 是否参与提交
    pub fn is_committable(&self) -> bool {
        matches!(self, RowStatus::Valid | RowStatus::New | RowStatus::Exists)
    }
}

// 状态计数
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/import.ts")]
pub struct StatusCounts {
    pub total: usize,
    pub valid: usize,
    pub new: usize,
    pub exists: usize,
    pub invalid_email: usize,
    pub duplicate: usize,
    pub incomplete: usize,
}

impl StatusCounts {
    pub fn record(&mut self, status: RowStatus) {
        self.total += 1;
        match status {
            RowStatus::Valid => self.valid += 1,
            RowStatus::New => self.new += 1,
            RowStatus::Exists => self.exists += 1,
            RowStatus::InvalidEmail => self.invalid_email += 1,
            RowStatus::Duplicate => self.duplicate += 1,
            RowStatus::Incomplete => self.incomplete += 1,
        }
    }

    pub fn committable(&self) -> usize {
        self.valid + self.new + self.exists
    }
}

// 关联导入（邮箱 -> 课程/班级）的上下文
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/import.ts")]
pub struct AssignmentContext {
    pub course_id: EntityId,
    #[serde(default)]
    pub section_id: Option<EntityId>,
    pub role: PersonRole,
}

// 提交结果（同时也是后端批量接口的响应结构）
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/import.ts")]
pub struct CommitReport {
    #[serde(default)]
    pub created_count: usize,
    #[serde(default)]
    pub skipped_count: usize,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl CommitReport {
    pub fn merge(&mut self, other: CommitReport) {
        self.created_count += other.created_count;
        self.skipped_count += other.skipped_count;
        self.errors.extend(other.errors);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_dedup_key_is_composite() {
        let record = ImportRecord::Section {
            course_code: "MATH101".into(),
            name: "Group A".into(),
        };
        assert_eq!(record.dedup_key().as_deref(), Some("math101::group a"));
    }

    #[test]
    fn test_dedup_key_missing_field() {
        let record = ImportRecord::Course {
            code: " ".into(),
            name: "Algebra".into(),
        };
        assert_eq!(record.dedup_key(), None);
    }

    #[test]
    fn test_set_field_rejects_foreign_field() {
        let mut record = ImportRecord::Assignment {
            email: "a@x.com".into(),
        };
        assert!(record.set_field(RowField::Code, "X".into()).is_err());
        record
            .set_field(RowField::Email, " b@x.com ".into())
            .unwrap();
        assert_eq!(record.email(), Some("b@x.com"));
    }

    #[test]
    fn test_record_serializes_with_kind_tag() {
        let record = ImportRecord::Section {
            course_code: "CS1".into(),
            name: "A".into(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["kind"], "section");
        assert_eq!(json["courseCode"], "CS1");
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&RowStatus::InvalidEmail).unwrap(),
            "\"invalid-email\""
        );
    }
}
