/// 截断错误列表用于展示：保留前 `limit` 条，剩余以 "+N more" 标记
///
/// 仅用于展示，完整列表由调用方保留。
pub fn summarize_errors(errors: &[String], limit: usize) -> Vec<String> {
    if errors.len() <= limit {
        return errors.to_vec();
    }

    let mut summary: Vec<String> = errors[..limit].to_vec();
    summary.push(format!("+{} more", errors.len() - limit));
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn errors(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("Row {i}: missing email")).collect()
    }

    #[test]
    fn test_short_list_is_unchanged() {
        assert_eq!(summarize_errors(&errors(3), 5), errors(3));
        assert_eq!(summarize_errors(&errors(5), 5), errors(5));
    }

    #[test]
    fn test_long_list_is_capped_with_marker() {
        let all = errors(8);
        let summary = summarize_errors(&all, 5);
        assert_eq!(summary.len(), 6);
        assert_eq!(summary[4], "Row 5: missing email");
        assert_eq!(summary[5], "+3 more");
        // 原列表不受影响
        assert_eq!(all.len(), 8);
    }

    #[test]
    fn test_zero_limit() {
        assert_eq!(summarize_errors(&errors(2), 0), vec!["+2 more".to_string()]);
    }
}
