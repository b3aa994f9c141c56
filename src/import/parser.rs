//! 表格文本解析
//!
//! 将粘贴文本或上传文件内容切分为行与字段：
//! - 按 CRLF/LF 分行，去除首尾空白，丢弃空行
//! - 每行以首个出现在引号外的分隔符（逗号、分号、制表符）切分，支持 RFC4180 引号
//! - 首行任一单元格命中表头关键字时视为表头并丢弃
//!
//! 解析从不失败，最坏情况返回零行，由调用方报告为空输入。

use once_cell::sync::Lazy;
use regex::Regex;

static LINE_BREAK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\r?\n").expect("Invalid line break regex"));

/// 可识别的表头关键字（大小写不敏感）
pub const HEADER_TOKENS: &[&str] = &[
    "email", "e-mail", "mail", "nom", "name", "course", "cours", "code", "section",
];

const SEPARATORS: &[u8] = b",;\t";

pub type Row = Vec<String>;

/// 解析原始文本为行列表
pub fn parse_rows(raw: &str) -> Vec<Row> {
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);

    let mut rows: Vec<Row> = LINE_BREAK_RE
        .split(raw)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(split_line)
        .filter(|cells| cells.iter().any(|cell| !cell.is_empty()))
        .collect();

    if rows.first().is_some_and(|row| is_header(row)) {
        rows.remove(0);
    }

    rows
}

/// 首行是否为表头
pub fn is_header(row: &[String]) -> bool {
    row.iter().any(|cell| {
        let cell = cell.trim().to_lowercase();
        HEADER_TOKENS.contains(&cell.as_str())
    })
}

/// 行内第一个位于引号外的分隔符
fn detect_separator(line: &str) -> Option<u8> {
    let mut in_quotes = false;
    for byte in line.bytes() {
        match byte {
            b'"' => in_quotes = !in_quotes,
            b if !in_quotes && SEPARATORS.contains(&b) => return Some(b),
            _ => {}
        }
    }
    None
}

fn split_line(line: &str) -> Row {
    let Some(delimiter) = detect_separator(line) else {
        return vec![unquote(line.trim())];
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .delimiter(delimiter)
        .from_reader(line.as_bytes());

    match reader.records().next() {
        Some(Ok(record)) => record.iter().map(str::to_string).collect(),
        // 引号不规范时退回到朴素切分
        _ => line
            .split(delimiter as char)
            .map(|cell| cell.trim().to_string())
            .collect(),
    }
}

fn unquote(cell: &str) -> String {
    if cell.len() >= 2 && cell.starts_with('"') && cell.ends_with('"') {
        cell[1..cell.len() - 1].replace("\"\"", "\"")
    } else {
        cell.to_string()
    }
}

/// 将行重新序列化为规范文本（逗号分隔，每个单元格都加引号）
///
/// 单元格内的分号或制表符不加引号会在重新解析时被当作分隔符。
pub fn canonicalize(rows: &[Row]) -> String {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(Vec::new());
    for row in rows {
        // 写入内存缓冲不会失败
        let _ = writer.write_record(row);
    }
    let bytes = writer.into_inner().unwrap_or_default();
    String::from_utf8_lossy(&bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(input: &[&[&str]]) -> Vec<Row> {
        input
            .iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_strips_header_and_blank_lines() {
        let parsed = parse_rows("name,email\r\n\r\nAlice, alice@test.com\n  \nBob,bob@test.com\n");
        assert_eq!(
            parsed,
            rows(&[&["Alice", "alice@test.com"], &["Bob", "bob@test.com"]])
        );
    }

    #[test]
    fn test_header_detection_is_case_insensitive() {
        let parsed = parse_rows("E-Mail\nalice@test.com");
        assert_eq!(parsed, rows(&[&["alice@test.com"]]));
    }

    #[test]
    fn test_first_row_without_header_token_is_kept() {
        let parsed = parse_rows("Alice,alice@test.com");
        assert_eq!(parsed.len(), 1);
    }

    #[test]
    fn test_semicolon_and_tab_separators() {
        let parsed = parse_rows("MATH1;Algebra\nPHYS1\tMechanics");
        assert_eq!(
            parsed,
            rows(&[&["MATH1", "Algebra"], &["PHYS1", "Mechanics"]])
        );
    }

    #[test]
    fn test_quoted_field_keeps_embedded_comma() {
        let parsed = parse_rows("\"Doe, John\",john@test.com");
        assert_eq!(parsed, rows(&[&["Doe, John", "john@test.com"]]));
    }

    #[test]
    fn test_separator_inside_quotes_is_not_detected() {
        let parsed = parse_rows("\"Doe, John\";john@test.com");
        assert_eq!(parsed, rows(&[&["Doe, John", "john@test.com"]]));
    }

    #[test]
    fn test_rows_of_only_separators_are_dropped() {
        let parsed = parse_rows(",,\n;;\nalice@test.com");
        assert_eq!(parsed, rows(&[&["alice@test.com"]]));
    }

    #[test]
    fn test_empty_input_yields_no_rows() {
        assert!(parse_rows("").is_empty());
        assert!(parse_rows("\n\r\n   \n").is_empty());
        assert!(parse_rows("email").is_empty());
    }

    #[test]
    fn test_bom_is_ignored() {
        let parsed = parse_rows("\u{feff}email\nalice@test.com");
        assert_eq!(parsed, rows(&[&["alice@test.com"]]));
    }

    #[test]
    fn test_reparse_of_canonical_output_is_stable() {
        let inputs = [
            "Alice;alice@test.com\nBob\tbob@test.com",
            "\"Doe, John\",john@test.com\n x@y.z ",
            "MATH1,Algebra,extra\n\nPHYS1,Mechanics",
            "\"Doe; John\",john@test.com",
            "\"Tab\there\";x@y.z\nsolo@y.z",
        ];
        for input in inputs {
            let first = parse_rows(input);
            let second = parse_rows(&canonicalize(&first));
            assert_eq!(first, second, "unstable for input {input:?}");
        }
    }

    #[test]
    fn test_canonical_output_quotes_embedded_separators() {
        let first = parse_rows("\"Doe; John\",john@test.com");
        assert_eq!(first, rows(&[&["Doe; John", "john@test.com"]]));
        assert_eq!(canonicalize(&first), "\"Doe; John\",\"john@test.com\"\n");
    }
}
