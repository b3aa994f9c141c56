use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 上游后端使用的实体 ID
pub type EntityId = String;

/// 每门课程隐式默认班级的保留名称，永不向管理员展示
pub const DEFAULT_SECTION_NAME: &str = "__default__";

/// 默认班级的展示名称
pub const DEFAULT_SECTION_LABEL: &str = "Default section";

// 人员角色
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "../frontend/src/types/generated/directory.ts")]
pub enum PersonRole {
    Teacher, // 教师
    Student, // 学生
}

impl PersonRole {
    pub const TEACHER: &'static str = "TEACHER";
    pub const STUDENT: &'static str = "STUDENT";

    pub fn as_str(&self) -> &'static str {
        match self {
            PersonRole::Teacher => Self::TEACHER,
            PersonRole::Student => Self::STUDENT,
        }
    }
}

impl std::fmt::Display for PersonRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PersonRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            Self::TEACHER | "TEACHERS" => Ok(PersonRole::Teacher),
            Self::STUDENT | "STUDENTS" => Ok(PersonRole::Student),
            _ => Err(format!("Invalid person role: {s}")),
        }
    }
}

/// 软删除（归档）的实体
pub trait Archivable {
    fn archived_at(&self) -> Option<&chrono::DateTime<chrono::Utc>>;

    fn is_archived(&self) -> bool {
        self.archived_at().is_some()
    }
}

macro_rules! impl_archivable {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Archivable for $ty {
                fn archived_at(&self) -> Option<&chrono::DateTime<chrono::Utc>> {
                    self.archived_at.as_ref()
                }
            }
        )*
    };
}

// 人员的课程成员关系
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/directory.ts")]
pub struct Membership {
    #[serde(default)]
    pub id: Option<EntityId>,
    pub course_id: EntityId,
    #[serde(default)]
    pub class_id: Option<EntityId>,
    pub role: PersonRole,
}

// 人员（教师或学生）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/directory.ts")]
pub struct Person {
    pub id: EntityId,
    #[serde(default)]
    pub name: Option<String>,
    pub email: String,
    pub role: PersonRole,
    #[serde(default)]
    pub archived_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    pub enrollments: Vec<Membership>,
}

impl Person {
    /// 展示名称，缺省时回退到邮箱
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.email)
    }
}

// 课程
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/directory.ts")]
pub struct Course {
    pub id: EntityId,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub archived_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    pub section_count: u32,
    #[serde(default)]
    pub exam_count: u32,
}

// 班级中的成员
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/directory.ts")]
pub struct SectionEnrollment {
    #[serde(default)]
    pub id: Option<EntityId>,
    pub user_id: EntityId,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub user_email: Option<String>,
    pub role: PersonRole,
}

impl SectionEnrollment {
    pub fn display_name(&self) -> &str {
        self.user_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .or(self.user_email.as_deref())
            .unwrap_or(&self.user_id)
    }
}

// 班级（课程下的分组）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/directory.ts")]
pub struct Section {
    pub id: EntityId,
    pub course_id: EntityId,
    pub name: String,
    #[serde(default)]
    pub archived_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    pub enrollments: Vec<SectionEnrollment>,
}

impl Section {
    pub fn is_default(&self) -> bool {
        self.name == DEFAULT_SECTION_NAME
    }

    /// 展示名称，默认班级不暴露保留名称
    pub fn display_name(&self) -> &str {
        if self.is_default() {
            DEFAULT_SECTION_LABEL
        } else {
            &self.name
        }
    }
}

// 考试状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "../frontend/src/types/generated/directory.ts")]
pub enum ExamStatus {
    Draft,
    Published,
}

// 考试
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/directory.ts")]
pub struct Exam {
    pub id: EntityId,
    pub course_id: EntityId,
    #[serde(default)]
    pub class_id: Option<EntityId>,
    pub title: String,
    pub status: ExamStatus,
    #[serde(default)]
    pub start_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub end_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    pub archived_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Exam {
    /// 结束时间：显式结束时间优先，否则由开始时间与时长推算
    pub fn effective_end(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        self.end_at.or_else(|| {
            let start = self.start_at?;
            let minutes = self.duration_minutes?;
            Some(start + chrono::Duration::minutes(i64::from(minutes)))
        })
    }
}

impl_archivable!(Person, Course, Section, Exam);

// 单个用户的详情档案（课程与考试）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/directory.ts")]
pub struct UserDetail {
    pub user: Person,
    #[serde(default)]
    pub courses: Vec<serde_json::Value>,
    #[serde(default)]
    pub exams: Vec<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_person_deserializes_backend_shape() {
        let json = r#"{
            "id": "u1",
            "name": "Alice",
            "email": "alice@test.com",
            "role": "STUDENT",
            "archivedAt": null,
            "enrollments": [{"courseId": "c1", "classId": "s1", "role": "STUDENT"}]
        }"#;
        let person: Person = serde_json::from_str(json).unwrap();
        assert_eq!(person.role, PersonRole::Student);
        assert!(!person.is_archived());
        assert_eq!(person.enrollments[0].class_id.as_deref(), Some("s1"));
    }

    #[test]
    fn test_display_name_falls_back_to_email() {
        let person = Person {
            id: "u1".into(),
            name: Some("  ".into()),
            email: "bob@test.com".into(),
            role: PersonRole::Teacher,
            archived_at: None,
            enrollments: vec![],
        };
        assert_eq!(person.display_name(), "bob@test.com");
    }

    #[test]
    fn test_default_section_is_never_displayed_by_sentinel() {
        let section = Section {
            id: "s0".into(),
            course_id: "c1".into(),
            name: DEFAULT_SECTION_NAME.into(),
            archived_at: None,
            enrollments: vec![],
        };
        assert!(section.is_default());
        assert_ne!(section.display_name(), DEFAULT_SECTION_NAME);
    }

    #[test]
    fn test_exam_end_from_duration() {
        let start = chrono::Utc.with_ymd_and_hms(2026, 1, 10, 9, 0, 0).unwrap();
        let exam = Exam {
            id: "e1".into(),
            course_id: "c1".into(),
            class_id: None,
            title: "Midterm".into(),
            status: ExamStatus::Published,
            start_at: Some(start),
            duration_minutes: Some(90),
            end_at: None,
            archived_at: None,
        };
        assert_eq!(
            exam.effective_end(),
            Some(chrono::Utc.with_ymd_and_hms(2026, 1, 10, 10, 30, 0).unwrap())
        );
    }

    #[test]
    fn test_role_parsing_accepts_plural_path_segments() {
        assert_eq!("teachers".parse::<PersonRole>(), Ok(PersonRole::Teacher));
        assert_eq!("STUDENT".parse::<PersonRole>(), Ok(PersonRole::Student));
        assert!("admin".parse::<PersonRole>().is_err());
    }
}
