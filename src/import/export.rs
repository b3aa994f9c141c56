//! CSV 导出与导入模板
//!
//! 字段包含引号、逗号、CR、LF 时加引号，内部引号双写（由 csv crate 保证）。

use crate::errors::{Result, RosterError};
use crate::models::directory::entities::{Course, Person};
use crate::models::imports::entities::ImportTarget;

fn write_csv<'a, I>(headers: &[&str], rows: I) -> Result<String>
where
    I: IntoIterator<Item = Vec<&'a str>>,
{
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(Vec::new());

    writer.write_record(headers)?;
    for row in rows {
        writer.write_record(&row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| RosterError::serialization(format!("Failed to flush CSV: {e}")))?;
    String::from_utf8(bytes)
        .map_err(|e| RosterError::serialization(format!("CSV output is not UTF-8: {e}")))
}

/// 导出人员：name,email
pub fn export_people(people: &[Person]) -> Result<String> {
    write_csv(
        &["name", "email"],
        people
            .iter()
            .map(|p| vec![p.name.as_deref().unwrap_or(""), p.email.as_str()]),
    )
}

/// 导出课程：code,name
pub fn export_courses(courses: &[Course]) -> Result<String> {
    write_csv(
        &["code", "name"],
        courses
            .iter()
            .map(|c| vec![c.code.as_str(), c.name.as_str()]),
    )
}

/// 仅包含表头的导入模板
pub fn template(target: ImportTarget) -> Result<String> {
    let headers: &[&str] = match target {
        ImportTarget::Teachers | ImportTarget::Students => &["name", "email"],
        ImportTarget::Courses => &["code", "name"],
        ImportTarget::Sections => &["course", "section"],
        ImportTarget::Assignments => &["email"],
    };
    write_csv(headers, std::iter::empty())
}

/// 下载文件名
pub fn file_name(stem: &str) -> String {
    format!(
        "{}-{}.csv",
        stem,
        chrono::Utc::now().format("%Y%m%d%H%M%S")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::parser::parse_rows;
    use crate::models::directory::entities::PersonRole;

    fn person(name: Option<&str>, email: &str) -> Person {
        Person {
            id: email.to_string(),
            name: name.map(str::to_string),
            email: email.to_string(),
            role: PersonRole::Student,
            archived_at: None,
            enrollments: vec![],
        }
    }

    #[test]
    fn test_name_with_comma_is_quoted_and_round_trips() {
        let csv_text = export_people(&[person(Some("Doe, John"), "john@test.com")]).unwrap();
        assert!(csv_text.contains("\"Doe, John\",john@test.com"));

        let mut reader = csv::Reader::from_reader(csv_text.as_bytes());
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(&record[0], "Doe, John");
        assert_eq!(&record[1], "john@test.com");
    }

    #[test]
    fn test_embedded_quote_is_doubled() {
        let csv_text = export_people(&[person(Some("Ann \"Al\" Lee"), "al@test.com")]).unwrap();
        assert!(csv_text.contains("\"Ann \"\"Al\"\" Lee\""));
    }

    #[test]
    fn test_export_reimports_through_parser() {
        let csv_text = export_people(&[
            person(Some("Doe, John"), "john@test.com"),
            person(None, "anon@test.com"),
        ])
        .unwrap();
        let rows = parse_rows(&csv_text);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], vec!["Doe, John", "john@test.com"]);
        assert_eq!(rows[1], vec!["", "anon@test.com"]);
    }

    #[test]
    fn test_courses_header() {
        let course = Course {
            id: "c1".into(),
            code: "MATH101".into(),
            name: "Algebra".into(),
            archived_at: None,
            section_count: 0,
            exam_count: 0,
        };
        let csv_text = export_courses(&[course]).unwrap();
        assert_eq!(csv_text, "code,name\nMATH101,Algebra\n");
    }

    #[test]
    fn test_templates_are_recognized_as_headers() {
        for target in [
            ImportTarget::Teachers,
            ImportTarget::Courses,
            ImportTarget::Sections,
            ImportTarget::Assignments,
        ] {
            let text = template(target).unwrap();
            assert!(parse_rows(&text).is_empty(), "template for {target}");
        }
    }
}
