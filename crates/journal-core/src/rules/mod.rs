//! Validation rules for lesson journals.
//!
//! Each rule answers one question about the table and reports the cells it
//! objects to. Rules are independent: none reads another's output, and the
//! engine may run them in any order without changing individual results.
//!
//! | Rule | Column | Flags when |
//! |------|--------|------------|
//! | [`LastLessonNumberRule`] | 0 | last lesson number is not an expected total |
//! | [`HomeworkPresenceRule`] | 3 | lesson has a theme but no homework |
//! | [`HomeworkLinkRule`] | 3 | homework contains a web link |
//! | [`ThemeLengthRule`] | 2 | theme exceeds the length cap |
//! | [`HomeworkLengthRule`] | 3 | homework exceeds the length cap |
//! | [`DateValidationRule`] | 1 | date is missing, malformed, or outside the window |

mod dates;
mod homework;
mod last_lesson;
mod length;
pub mod patterns;

pub use dates::DateValidationRule;
pub use homework::{HomeworkLinkRule, HomeworkPresenceRule};
pub use last_lesson::LastLessonNumberRule;
pub use length::{HomeworkLengthRule, ThemeLengthRule};

use std::collections::BTreeSet;

use crate::config::EngineConfig;
use crate::types::{CellRef, RuleFinding, RuleId, Table};

/// A single validation rule.
///
/// `scan` is pure: everything a rule learns about a table is returned in the
/// [`RuleFinding`], so one instance can be reused for any number of tables.
pub trait Rule: Send + Sync {
    /// Stable identifier used to tag flagged cells.
    fn id(&self) -> RuleId;

    /// One-line summary of what the rule checks.
    fn description(&self) -> &'static str;

    /// Scan the table and report what this rule flags.
    fn scan(&self, table: &Table) -> RuleFinding;
}

/// The standard rule set, in registration order.
pub fn default_rules(config: &EngineConfig) -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(LastLessonNumberRule::new(config.expected_lesson_totals.clone())),
        Box::new(HomeworkPresenceRule::new()),
        Box::new(HomeworkLinkRule::new()),
        Box::new(ThemeLengthRule::new(config.theme_max_chars)),
        Box::new(HomeworkLengthRule::new(config.homework_max_chars)),
        Box::new(DateValidationRule::new(config.date_window)),
    ]
}

/// Parse a lesson number the way spreadsheet users write it.
///
/// Accepts integers and decimals (`"12"`, `"12.0"`, `" 7.9 "`), truncating
/// toward zero. Returns `None` for empty, non-numeric, or non-finite text.
pub fn parse_lesson_number(cell: &str) -> Option<i64> {
    let value: f64 = cell.trim().parse().ok()?;
    if !value.is_finite() || value.abs() >= i64::MAX as f64 {
        return None;
    }
    Some(value.trunc() as i64)
}

/// Cell text with surrounding whitespace removed; `None` if the column is missing.
pub(crate) fn trimmed(row: &[String], col: usize) -> Option<&str> {
    row.get(col).map(|c| c.trim())
}

/// True when the column exists and holds more than whitespace.
pub(crate) fn has_text(row: &[String], col: usize) -> bool {
    trimmed(row, col).is_some_and(|c| !c.is_empty())
}

/// Accumulates flagged cells and lesson numbers during a scan.
#[derive(Debug, Default)]
pub(crate) struct FindingBuilder {
    cells: BTreeSet<CellRef>,
    lessons: BTreeSet<i64>,
}

impl FindingBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Flag a cell of a lesson row.
    pub(crate) fn flag(&mut self, row: usize, col: usize, lesson: i64) {
        self.cells.insert(CellRef::new(row, col));
        self.lessons.insert(lesson);
    }

    /// Flag a cell with no lesson number attached.
    pub(crate) fn flag_cell(&mut self, row: usize, col: usize) {
        self.cells.insert(CellRef::new(row, col));
    }

    /// Finish the scan. `render` only runs when something was flagged.
    pub(crate) fn build<F>(self, rule: RuleId, render: F) -> RuleFinding
    where
        F: FnOnce(&str) -> String,
    {
        if self.cells.is_empty() {
            return RuleFinding::pass(rule);
        }

        let mut finding = RuleFinding {
            rule,
            cells: self.cells,
            lessons: self.lessons,
            message: String::new(),
        };
        finding.message = render(&finding.lesson_list());
        finding
    }
}
