//! Core types for journal validation.
//!
//! The engine consumes a [`Table`] of string cells and produces a [`Verdict`].
//! Rule scans produce [`RuleFinding`] values that the engine folds together.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Column holding the lesson number.
pub const LESSON_COLUMN: usize = 0;
/// Column holding the lesson date (`dd.mm.yyyy`).
pub const DATE_COLUMN: usize = 1;
/// Column holding the lesson theme.
pub const THEME_COLUMN: usize = 2;
/// Column holding the homework assignment.
pub const HOMEWORK_COLUMN: usize = 3;

/// A single spreadsheet row.
pub type Row = Vec<String>;

/// A parsed spreadsheet: row 0 is the header, every other row is a lesson.
///
/// Rows may have different widths. Rules must not assume a column exists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Table {
    rows: Vec<Row>,
}

impl Table {
    /// Create a table from raw rows.
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// Build a table from string slices. Handy for tests and fixtures.
    pub fn from_str_rows<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        }
    }

    /// All rows, header included.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of rows, header included.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the final row, if any.
    pub fn last_index(&self) -> Option<usize> {
        self.rows.len().checked_sub(1)
    }

    /// Iterate lesson rows as `(row_index, row)`, skipping the header.
    pub fn data_rows(&self) -> impl Iterator<Item = (usize, &Row)> {
        self.rows.iter().enumerate().skip(1)
    }

    /// Cell text at `(row, col)`, or `None` when the row is too short.
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    /// False for a table with no rows or an empty header row.
    ///
    /// Loaders reject such tables before the engine ever sees them.
    pub fn has_content(&self) -> bool {
        self.rows.first().is_some_and(|header| !header.is_empty())
    }
}

impl From<Vec<Row>> for Table {
    fn from(rows: Vec<Row>) -> Self {
        Self::new(rows)
    }
}

/// A zero-based `(row, column)` coordinate. Row 0 is the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

impl CellRef {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Stable identifier of a validation rule.
///
/// The serialized tokens are consumed by presentation code to tag cells, so
/// they must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RuleId {
    #[serde(rename = "lastlessonnumber")]
    LastLessonNumber,
    #[serde(rename = "hometaskpresence")]
    HomeworkPresence,
    #[serde(rename = "hometasklink")]
    HomeworkLink,
    #[serde(rename = "themelength")]
    ThemeLength,
    #[serde(rename = "hometasklength")]
    HomeworkLength,
    #[serde(rename = "datevalidation")]
    DateValidation,
}

impl RuleId {
    /// Every rule identifier, in default registration order.
    pub const ALL: [RuleId; 6] = [
        RuleId::LastLessonNumber,
        RuleId::HomeworkPresence,
        RuleId::HomeworkLink,
        RuleId::ThemeLength,
        RuleId::HomeworkLength,
        RuleId::DateValidation,
    ];

    /// Short lowercase token for this rule.
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleId::LastLessonNumber => "lastlessonnumber",
            RuleId::HomeworkPresence => "hometaskpresence",
            RuleId::HomeworkLink => "hometasklink",
            RuleId::ThemeLength => "themelength",
            RuleId::HomeworkLength => "hometasklength",
            RuleId::DateValidation => "datevalidation",
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A cell flagged by a specific rule.
///
/// Ordering is row-major, then by rule, so a `BTreeSet` of these reads
/// naturally top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FlaggedCell {
    pub row: usize,
    pub col: usize,
    pub rule: RuleId,
}

impl FlaggedCell {
    pub fn new(cell: CellRef, rule: RuleId) -> Self {
        Self {
            row: cell.row,
            col: cell.col,
            rule,
        }
    }

    /// The coordinate without the rule tag.
    pub fn cell(&self) -> CellRef {
        CellRef::new(self.row, self.col)
    }
}

/// What a single rule found in one scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleFinding {
    /// Rule that produced this finding
    pub rule: RuleId,

    /// Cells the rule flagged
    pub cells: BTreeSet<CellRef>,

    /// Lesson numbers of the offending rows, ascending
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub lessons: BTreeSet<i64>,

    /// Rendered message; empty when nothing was flagged
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
}

impl RuleFinding {
    /// A finding with nothing flagged.
    pub fn pass(rule: RuleId) -> Self {
        Self {
            rule,
            cells: BTreeSet::new(),
            lessons: BTreeSet::new(),
            message: String::new(),
        }
    }

    pub fn is_pass(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn is_violation(&self) -> bool {
        !self.cells.is_empty()
    }

    /// Message for this finding, empty when the scan found nothing.
    pub fn message(&self) -> &str {
        if self.cells.is_empty() {
            ""
        } else {
            &self.message
        }
    }

    /// Offending lesson numbers as `"1, 2, 10"`.
    pub fn lesson_list(&self) -> String {
        self.lessons
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// The engine's aggregate result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// True iff no cell was flagged by any rule
    pub is_valid: bool,

    /// Deduplicated `(row, col, rule)` triples
    pub flagged_cells: BTreeSet<FlaggedCell>,

    /// One message per violating rule, in registration order
    pub messages: Vec<String>,

    /// Per-rule findings, in registration order
    pub findings: Vec<RuleFinding>,
}

impl Verdict {
    /// Flagged coordinates with rule tags dropped.
    pub fn flagged_coordinates(&self) -> BTreeSet<CellRef> {
        self.flagged_cells.iter().map(FlaggedCell::cell).collect()
    }

    /// Whether any rule flagged `(row, col)`.
    pub fn is_flagged(&self, row: usize, col: usize) -> bool {
        self.flagged_cells
            .iter()
            .any(|c| c.row == row && c.col == col)
    }

    /// Rules that flagged `(row, col)`.
    pub fn rules_at(&self, row: usize, col: usize) -> Vec<RuleId> {
        self.flagged_cells
            .iter()
            .filter(|c| c.row == row && c.col == col)
            .map(|c| c.rule)
            .collect()
    }

    /// Findings of rules that flagged something.
    pub fn violations(&self) -> impl Iterator<Item = &RuleFinding> {
        self.findings.iter().filter(|f| f.is_violation())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_cell_access_tolerates_short_rows() {
        let table = Table::from_str_rows(vec![vec!["#", "Date"], vec!["1"]]);
        assert_eq!(table.cell(1, 0), Some("1"));
        assert_eq!(table.cell(1, 1), None);
        assert_eq!(table.cell(5, 0), None);
    }

    #[test]
    fn test_data_rows_skip_header() {
        let table = Table::from_str_rows(vec![vec!["#"], vec!["1"], vec!["2"]]);
        let indices: Vec<usize> = table.data_rows().map(|(i, _)| i).collect();
        assert_eq!(indices, vec![1, 2]);
    }

    #[test]
    fn test_has_content() {
        assert!(!Table::default().has_content());
        assert!(!Table::new(vec![vec![]]).has_content());
        assert!(Table::from_str_rows(vec![vec!["#"]]).has_content());
    }

    #[test]
    fn test_rule_id_serializes_as_token() {
        let json = serde_json::to_string(&RuleId::HomeworkLink).unwrap();
        assert_eq!(json, "\"hometasklink\"");
        for id in RuleId::ALL {
            let json = serde_json::to_string(&id).unwrap();
            assert_eq!(json, format!("\"{}\"", id.as_str()));
        }
    }

    #[test]
    fn test_finding_message_empty_on_pass() {
        let mut finding = RuleFinding::pass(RuleId::ThemeLength);
        finding.message = "stale".to_string();
        assert_eq!(finding.message(), "");
    }

    #[test]
    fn test_lesson_list_sorted() {
        let mut finding = RuleFinding::pass(RuleId::ThemeLength);
        finding.lessons.extend([10, 2, 7]);
        assert_eq!(finding.lesson_list(), "2, 7, 10");
    }

    #[test]
    fn test_flagged_cell_ordering_is_row_major() {
        let a = FlaggedCell::new(CellRef::new(1, 3), RuleId::HomeworkLength);
        let b = FlaggedCell::new(CellRef::new(2, 0), RuleId::LastLessonNumber);
        assert!(a < b);
    }
}
