//! 读侧聚合：课程 / 班级详情与可见子集
//!
//! 每次调用都基于当前集合重新计算，不修改输入集合。

use std::collections::HashMap;

use crate::errors::{Result, RosterError};
use crate::models::directory::entities::{
    Archivable, Course, EntityId, Person, PersonRole, Section, SectionEnrollment,
};
use crate::models::navigation::NavigationState;
use crate::models::roster::responses::{CourseDetail, MemberSummary, SectionDetail, SectionSummary};

use super::directory::Directory;

/// 按用户 ID 去重，保留首次出现的顺序，名称以最后一次写入为准
#[derive(Default)]
struct MemberIndex {
    order: Vec<EntityId>,
    names: HashMap<EntityId, String>,
}

impl MemberIndex {
    fn insert(&mut self, user_id: &str, name: &str) {
        if self.names.insert(user_id.to_string(), name.to_string()).is_none() {
            self.order.push(user_id.to_string());
        }
    }

    fn into_members(mut self) -> Vec<MemberSummary> {
        self.order
            .into_iter()
            .filter_map(|user_id| {
                let name = self.names.remove(&user_id)?;
                Some(MemberSummary { user_id, name })
            })
            .collect()
    }
}

#[derive(Default)]
struct Members {
    teachers: MemberIndex,
    students: MemberIndex,
}

impl Members {
    fn insert(&mut self, role: PersonRole, user_id: &str, name: &str) {
        match role {
            PersonRole::Teacher => self.teachers.insert(user_id, name),
            PersonRole::Student => self.students.insert(user_id, name),
        }
    }

    fn add_enrollments<'a>(&mut self, directory: &Directory, enrollments: impl IntoIterator<Item = &'a SectionEnrollment>) {
        for enrollment in enrollments {
            let name = member_name(directory, enrollment);
            self.insert(enrollment.role, &enrollment.user_id, &name);
        }
    }
}

/// 成员展示名：成员记录自带名称优先，否则取人员目录中的名称
fn member_name(directory: &Directory, enrollment: &SectionEnrollment) -> String {
    if enrollment
        .user_name
        .as_deref()
        .is_some_and(|n| !n.trim().is_empty())
    {
        return enrollment.display_name().to_string();
    }
    match directory.person(&enrollment.user_id) {
        Some(person) => person.display_name().to_string(),
        None => enrollment.display_name().to_string(),
    }
}

/// 班级摘要
pub fn section_summary(section: &Section) -> SectionSummary {
    let mut members = Members::default();
    for enrollment in &section.enrollments {
        members.insert(enrollment.role, &enrollment.user_id, "");
    }
    SectionSummary {
        id: section.id.clone(),
        name: section.display_name().to_string(),
        is_default: section.is_default(),
        teacher_count: members.teachers.order.len(),
        student_count: members.students.order.len(),
    }
}

/// 课程详情：班级（不含已归档与默认班级）、考试（按课程 ID 关联）、去重后的教师与学生
pub fn course_detail(directory: &Directory, course_id: &str) -> Result<CourseDetail> {
    let course = directory
        .course(course_id)
        .ok_or_else(|| RosterError::not_found(format!("Course {course_id} not found")))?;

    let course_sections: Vec<&Section> = directory
        .sections
        .iter()
        .filter(|s| s.course_id == course.id && !s.is_archived())
        .collect();

    let sections = course_sections
        .iter()
        .filter(|s| !s.is_default())
        .map(|s| section_summary(s))
        .collect();

    let exams = directory
        .exams
        .iter()
        .filter(|e| e.course_id == course.id && !e.is_archived())
        .cloned()
        .collect();

    let mut members = Members::default();
    for section in &course_sections {
        members.add_enrollments(directory, &section.enrollments);
    }
    // 仅有课程级成员关系（无班级）的人员
    for person in directory.people.iter().filter(|p| !p.is_archived()) {
        for membership in &person.enrollments {
            if membership.course_id == course.id && membership.class_id.is_none() {
                members.insert(membership.role, &person.id, person.display_name());
            }
        }
    }

    Ok(CourseDetail {
        course: course.clone(),
        sections,
        exams,
        teachers: members.teachers.into_members(),
        students: members.students.into_members(),
    })
}

/// 班级详情
pub fn section_detail(directory: &Directory, section_id: &str) -> Result<SectionDetail> {
    let section = directory
        .section(section_id)
        .ok_or_else(|| RosterError::not_found(format!("Section {section_id} not found")))?;

    let exams = directory
        .exams
        .iter()
        .filter(|e| e.class_id.as_deref() == Some(section.id.as_str()) && !e.is_archived())
        .cloned()
        .collect();

    let mut members = Members::default();
    members.add_enrollments(directory, &section.enrollments);

    Ok(SectionDetail {
        section: section_summary(section),
        course: directory.course(&section.course_id).cloned(),
        exams,
        teachers: members.teachers.into_members(),
        students: members.students.into_members(),
    })
}

/// 可见子集：未开启"显示已归档"时排除已归档项
pub fn visible<T: Archivable>(items: &[T], show_archived: bool) -> Vec<&T> {
    items
        .iter()
        .filter(|item| show_archived || !item.is_archived())
        .collect()
}

/// 按导航状态过滤人员，返回 (可见项, 被隐藏的已归档数)
pub fn filter_people(people: &[Person], state: &NavigationState) -> (Vec<Person>, usize) {
    let archived_hidden = if state.show_archived {
        0
    } else {
        people.iter().filter(|p| p.is_archived()).count()
    };
    let items = visible(people, state.show_archived)
        .into_iter()
        .filter(|p| state.matches_search([p.name.as_deref().unwrap_or(""), p.email.as_str()]))
        .cloned()
        .collect();
    (items, archived_hidden)
}

/// 按导航状态过滤课程
pub fn filter_courses(courses: &[Course], state: &NavigationState) -> (Vec<Course>, usize) {
    let archived_hidden = if state.show_archived {
        0
    } else {
        courses.iter().filter(|c| c.is_archived()).count()
    };
    let items = visible(courses, state.show_archived)
        .into_iter()
        .filter(|c| state.matches_search([c.code.as_str(), c.name.as_str()]))
        .cloned()
        .collect();
    (items, archived_hidden)
}
