//! 预览暂存
//!
//! 保存解析出的全部行（包括无效与重复行）以便逐行修改。
//! 状态、计数与错误均由当前内容即时计算，不按行存储。

use std::collections::HashSet;

use super::parser::Row;
use super::validator::{self, ValidationOutcome};
use crate::errors::{Result, RosterError};
use crate::models::imports::entities::{
    AssignmentContext, CommitReport, ImportRecord, ImportTarget, RowField, RowStatus,
    StatusCounts,
};
use crate::models::imports::responses::PreviewRow;

#[derive(Debug, Clone)]
pub struct PreviewStore {
    target: ImportTarget,
    records: Vec<ImportRecord>,
    existing: Option<HashSet<String>>,
    context: Option<AssignmentContext>,
    show_all: bool,
    last_report: Option<CommitReport>,
}

impl PreviewStore {
    pub fn new(target: ImportTarget) -> Self {
        Self {
            target,
            records: Vec::new(),
            existing: None,
            context: None,
            show_all: false,
            last_report: None,
        }
    }

    pub fn target(&self) -> ImportTarget {
        self.target
    }

    pub fn context(&self) -> Option<&AssignmentContext> {
        self.context.as_ref()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[ImportRecord] {
        &self.records
    }

    pub fn last_report(&self) -> Option<&CommitReport> {
        self.last_report.as_ref()
    }

    /// 以新解析结果替换暂存内容，重置展示与提交状态
    pub fn load(
        &mut self,
        rows: &[Row],
        context: Option<AssignmentContext>,
        existing: Option<HashSet<String>>,
    ) {
        let shape = self.target.shape();
        self.records = rows
            .iter()
            .map(|row| validator::to_record(row, shape))
            .collect();
        self.context = context;
        self.existing = existing;
        self.show_all = false;
        self.last_report = None;
    }

    /// 原地修改某行的某个字段
    pub fn edit(&mut self, index: usize, field: RowField, value: String) -> Result<&ImportRecord> {
        let len = self.records.len();
        let record = self
            .records
            .get_mut(index)
            .ok_or_else(|| row_not_found(index, len))?;
        record.set_field(field, value).map_err(RosterError::validation)?;
        self.last_report = None;
        Ok(&self.records[index])
    }

    /// 删除某行，后续行的下标前移
    pub fn remove(&mut self, index: usize) -> Result<ImportRecord> {
        if index >= self.records.len() {
            return Err(row_not_found(index, self.records.len()));
        }
        self.last_report = None;
        Ok(self.records.remove(index))
    }

    pub fn set_show_all(&mut self, show_all: bool) {
        self.show_all = show_all;
    }

    pub fn show_all(&self) -> bool {
        self.show_all
    }

    /// 取消：丢弃全部暂存行及相关结果
    pub fn clear(&mut self) {
        self.records.clear();
        self.existing = None;
        self.context = None;
        self.show_all = false;
        self.last_report = None;
    }

    pub fn record_commit(&mut self, report: CommitReport) {
        self.last_report = Some(report);
    }

    pub fn statuses(&self) -> Vec<RowStatus> {
        validator::row_statuses(&self.records, self.existing.as_ref())
    }

    pub fn counts(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for status in self.statuses() {
            counts.record(status);
        }
        counts
    }

    /// 完整错误列表（不截断）
    pub fn errors(&self) -> Vec<String> {
        self.validation().errors
    }

    pub fn validation(&self) -> ValidationOutcome {
        validator::validate_records(&self.records)
    }

    /// 可提交的行及其在暂存中的下标
    pub fn committable(&self) -> Vec<(usize, ImportRecord)> {
        self.statuses()
            .into_iter()
            .zip(self.records.iter())
            .enumerate()
            .filter(|(_, (status, _))| status.is_committable())
            .map(|(idx, (_, record))| (idx, record.clone()))
            .collect()
    }

    /// 当前应展示的行；未展开时只显示前 `limit` 行，返回 (行, 隐藏行数)
    pub fn visible(&self, limit: usize) -> (Vec<PreviewRow>, usize) {
        let statuses = self.statuses();
        let take = if self.show_all {
            self.records.len()
        } else {
            limit.min(self.records.len())
        };

        let rows = self
            .records
            .iter()
            .zip(statuses)
            .take(take)
            .enumerate()
            .map(|(index, (record, status))| PreviewRow {
                index,
                record: record.clone(),
                status,
            })
            .collect();

        (rows, self.records.len() - take)
    }
}

fn row_not_found(index: usize, len: usize) -> RosterError {
    RosterError::not_found(format!(
        "Row {index} does not exist (staging holds {len} rows)"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::parser::parse_rows;

    fn store_with(text: &str) -> PreviewStore {
        let mut store = PreviewStore::new(ImportTarget::Students);
        store.load(&parse_rows(text), None, None);
        store
    }

    #[test]
    fn test_counts_follow_edits() {
        let mut store = store_with("a@x.com\nbroken\nA@X.com");
        assert_eq!(
            store.statuses(),
            vec![RowStatus::Valid, RowStatus::InvalidEmail, RowStatus::Duplicate]
        );

        store
            .edit(1, RowField::Email, "b@x.com".into())
            .unwrap();
        let counts = store.counts();
        assert_eq!(counts.valid, 2);
        assert_eq!(counts.duplicate, 1);
        assert_eq!(counts.invalid_email, 0);
    }

    #[test]
    fn test_removing_first_occurrence_promotes_duplicate() {
        let mut store = store_with("a@x.com\nA@X.com");
        store.remove(0).unwrap();
        assert_eq!(store.statuses(), vec![RowStatus::Valid]);
        assert_eq!(store.committable().len(), 1);
    }

    #[test]
    fn test_out_of_range_edit_is_not_found() {
        let mut store = store_with("a@x.com");
        let err = store.edit(3, RowField::Email, "x@y.z".into()).unwrap_err();
        assert!(err.is_not_found());
        assert!(store.remove(1).is_err());
    }

    #[test]
    fn test_visible_respects_show_all() {
        let text = (1..=8)
            .map(|i| format!("user{i}@x.com"))
            .collect::<Vec<_>>()
            .join("\n");
        let mut store = store_with(&text);

        let (rows, hidden) = store.visible(5);
        assert_eq!(rows.len(), 5);
        assert_eq!(hidden, 3);

        store.set_show_all(true);
        let (rows, hidden) = store.visible(5);
        assert_eq!(rows.len(), 8);
        assert_eq!(hidden, 0);
        assert_eq!(rows[7].index, 7);
    }

    #[test]
    fn test_existing_keys_split_new_and_exists() {
        let mut store = PreviewStore::new(ImportTarget::Students);
        let existing: HashSet<String> = ["old@x.com".to_string()].into_iter().collect();
        store.load(&parse_rows("OLD@x.com\nnew@x.com"), None, Some(existing));
        assert_eq!(store.statuses(), vec![RowStatus::Exists, RowStatus::New]);
        assert_eq!(store.counts().committable(), 2);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut store = store_with("a@x.com\nbad");
        store.set_show_all(true);
        store.record_commit(CommitReport::default());
        store.clear();
        assert!(store.is_empty());
        assert!(!store.show_all());
        assert!(store.last_report().is_none());
        assert!(store.errors().is_empty());
    }

    #[test]
    fn test_errors_are_complete() {
        let text = (1..=7)
            .map(|i| format!("broken{i}"))
            .collect::<Vec<_>>()
            .join("\n");
        let store = store_with(&text);
        assert_eq!(store.errors().len(), 7);
    }
}
