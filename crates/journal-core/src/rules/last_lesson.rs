//! Last Lesson Number Rule
//!
//! **Question**: Does the journal end on a full course length?
//!
//! A course runs a whole number of 35-lesson blocks, so the last lesson
//! number must equal one of the expected totals. The closest total is
//! reported so the teacher knows what to aim for.

use crate::types::{RuleFinding, RuleId, Table, LESSON_COLUMN};

use super::{parse_lesson_number, FindingBuilder, Rule};

/// Flags the last lesson number when it is not an expected total.
pub struct LastLessonNumberRule {
    expected_totals: Vec<i64>,
}

impl LastLessonNumberRule {
    pub fn new(expected_totals: Vec<i64>) -> Self {
        Self { expected_totals }
    }

    /// Expected total closest to `value`. On a tie the smaller total wins.
    pub fn closest_expected(&self, value: i64) -> Option<i64> {
        self.expected_totals
            .iter()
            .copied()
            .min_by_key(|total| (total.abs_diff(value), *total))
    }
}

impl Default for LastLessonNumberRule {
    fn default() -> Self {
        Self::new(vec![35, 70, 105, 140])
    }
}

impl Rule for LastLessonNumberRule {
    fn id(&self) -> RuleId {
        RuleId::LastLessonNumber
    }

    fn description(&self) -> &'static str {
        "Last lesson number must equal an expected course length"
    }

    fn scan(&self, table: &Table) -> RuleFinding {
        // Header-only tables have no lessons to count
        let Some(last) = table.last_index().filter(|&last| last > 0) else {
            return RuleFinding::pass(self.id());
        };

        let cell = table.cell(last, LESSON_COLUMN).map(str::trim).unwrap_or("");
        if cell.is_empty() {
            return RuleFinding::pass(self.id());
        }

        let mut builder = FindingBuilder::new();

        let Some(lesson) = parse_lesson_number(cell) else {
            tracing::trace!(row = last, cell, "last lesson number is not a number");
            builder.flag_cell(last, LESSON_COLUMN);
            return builder.build(self.id(), |_| {
                format!(
                    "Невірна кількість занять: не вдалося прочитати номер останнього заняття (рядок {})",
                    last + 1
                )
            });
        };

        match self.closest_expected(lesson) {
            Some(expected) if expected != lesson => {
                builder.flag(last, LESSON_COLUMN, lesson);
                builder.build(self.id(), |_| {
                    format!("Невірна кількість занять. Має бути {}", expected)
                })
            }
            _ => RuleFinding::pass(self.id()),
        }
    }
}
