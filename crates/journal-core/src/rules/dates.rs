//! Date Validation Rule
//!
//! **Question**: Was every lesson held on a real date inside the term?
//!
//! Dates are written `day.month.year` (e.g. `03.02.2025`). A lesson row is
//! flagged when its date is missing, does not parse, names an impossible
//! calendar day, or falls outside the configured window.

use chrono::NaiveDate;

use crate::config::DateWindow;
use crate::types::{RuleFinding, RuleId, Table, DATE_COLUMN, LESSON_COLUMN};

use super::{parse_lesson_number, trimmed, FindingBuilder, Rule};

/// Parse a `day.month.year` date.
///
/// Exactly three dot-separated integers are required; surrounding whitespace
/// in each part is tolerated.
pub fn parse_journal_date(text: &str) -> Option<NaiveDate> {
    let mut parts = text.split('.');
    let day: i64 = parts.next()?.trim().parse().ok()?;
    let month: i64 = parts.next()?.trim().parse().ok()?;
    let year: i64 = parts.next()?.trim().parse().ok()?;
    if parts.next().is_some() {
        return None;
    }

    NaiveDate::from_ymd_opt(
        i32::try_from(year).ok()?,
        u32::try_from(month).ok()?,
        u32::try_from(day).ok()?,
    )
}

/// Flags lesson dates that are missing, malformed, or out of term.
pub struct DateValidationRule {
    window: DateWindow,
}

impl DateValidationRule {
    pub fn new(window: DateWindow) -> Self {
        Self { window }
    }

    fn is_valid_date(&self, text: &str) -> bool {
        parse_journal_date(text).is_some_and(|date| self.window.contains(date))
    }
}

impl Default for DateValidationRule {
    fn default() -> Self {
        Self::new(DateWindow::default())
    }
}

impl Rule for DateValidationRule {
    fn id(&self) -> RuleId {
        RuleId::DateValidation
    }

    fn description(&self) -> &'static str {
        "Lesson dates must be real dd.mm.yyyy dates inside the term"
    }

    fn scan(&self, table: &Table) -> RuleFinding {
        if table.len() < 2 {
            return RuleFinding::pass(self.id());
        }

        let mut builder = FindingBuilder::new();

        for (row_idx, row) in table.data_rows() {
            let Some(date) = trimmed(row, DATE_COLUMN) else {
                continue;
            };
            let Some(lesson) = row.get(LESSON_COLUMN).and_then(|c| parse_lesson_number(c)) else {
                tracing::trace!(row = row_idx, "skipping row with unreadable lesson number");
                continue;
            };

            if date.is_empty() || !self.is_valid_date(date) {
                builder.flag(row_idx, DATE_COLUMN, lesson);
            }
        }

        let window = self.window;
        builder.build(self.id(), |lessons| {
            format!(
                "Знайдено некоректні дати у заняттях: {}. Дати мають бути в межах з {} по {}",
                lessons, window.start, window.end
            )
        })
    }
}
