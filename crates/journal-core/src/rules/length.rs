//! Text length rules.
//!
//! The printed journal has fixed-width columns. Lengths are counted in
//! characters after trimming, not bytes, so Cyrillic text gets the same
//! budget as Latin.

use crate::types::{RuleFinding, RuleId, Table, HOMEWORK_COLUMN, LESSON_COLUMN, THEME_COLUMN};

use super::{parse_lesson_number, trimmed, FindingBuilder, Rule};

/// Collect rows whose trimmed `col` is longer than `max_chars`.
fn scan_max_length(table: &Table, col: usize, max_chars: usize) -> FindingBuilder {
    let mut builder = FindingBuilder::new();

    for (row_idx, row) in table.data_rows() {
        let Some(text) = trimmed(row, col) else {
            continue;
        };
        let Some(lesson) = row.get(LESSON_COLUMN).and_then(|c| parse_lesson_number(c)) else {
            continue;
        };
        if text.chars().count() > max_chars {
            builder.flag(row_idx, col, lesson);
        }
    }

    builder
}

/// Flags themes longer than the configured cap.
pub struct ThemeLengthRule {
    max_chars: usize,
}

impl ThemeLengthRule {
    pub fn new(max_chars: usize) -> Self {
        Self { max_chars }
    }
}

impl Default for ThemeLengthRule {
    fn default() -> Self {
        Self::new(100)
    }
}

impl Rule for ThemeLengthRule {
    fn id(&self) -> RuleId {
        RuleId::ThemeLength
    }

    fn description(&self) -> &'static str {
        "Lesson theme must fit the theme column"
    }

    fn scan(&self, table: &Table) -> RuleFinding {
        let max = self.max_chars;
        scan_max_length(table, THEME_COLUMN, max).build(self.id(), |lessons| {
            format!(
                "Занадто довга тема (макс. {} символів) у заняттях: {}",
                max, lessons
            )
        })
    }
}

/// Flags homework longer than the configured cap.
pub struct HomeworkLengthRule {
    max_chars: usize,
}

impl HomeworkLengthRule {
    pub fn new(max_chars: usize) -> Self {
        Self { max_chars }
    }
}

impl Default for HomeworkLengthRule {
    fn default() -> Self {
        Self::new(60)
    }
}

impl Rule for HomeworkLengthRule {
    fn id(&self) -> RuleId {
        RuleId::HomeworkLength
    }

    fn description(&self) -> &'static str {
        "Homework must fit the homework column"
    }

    fn scan(&self, table: &Table) -> RuleFinding {
        let max = self.max_chars;
        scan_max_length(table, HOMEWORK_COLUMN, max).build(self.id(), |lessons| {
            format!(
                "Занадто довге домашнє завдання (макс. {} символів) у заняттях: {}",
                max, lessons
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CellRef;

    fn row_with(lesson: &str, theme: &str, homework: &str) -> Table {
        Table::from_str_rows(vec![
            vec!["№".to_string(), "Дата".into(), "Тема".into(), "Д/З".into()],
            vec![lesson.to_string(), "01.02.2025".into(), theme.into(), homework.into()],
        ])
    }

    #[test]
    fn test_theme_at_limit_passes() {
        let t = row_with("1", &"a".repeat(100), "Read");
        assert!(ThemeLengthRule::default().scan(&t).is_pass());
    }

    #[test]
    fn test_theme_over_limit_flagged() {
        let t = row_with("1", &"a".repeat(101), "Read");
        let finding = ThemeLengthRule::default().scan(&t);
        assert!(finding.cells.contains(&CellRef::new(1, 2)));
        assert_eq!(
            finding.message(),
            "Занадто довга тема (макс. 100 символів) у заняттях: 1"
        );
    }

    #[test]
    fn test_theme_length_counts_chars_not_bytes() {
        // 100 Cyrillic letters are 200 bytes
        let t = row_with("1", &"т".repeat(100), "Read");
        assert!(ThemeLengthRule::default().scan(&t).is_pass());
    }

    #[test]
    fn test_theme_whitespace_trimmed_before_counting() {
        let theme = format!("  {}  ", "a".repeat(100));
        let t = row_with("1", &theme, "Read");
        assert!(ThemeLengthRule::default().scan(&t).is_pass());
    }

    #[test]
    fn test_unreadable_lesson_skipped() {
        let t = row_with("—", &"a".repeat(150), "Read");
        assert!(ThemeLengthRule::default().scan(&t).is_pass());
    }

    #[test]
    fn test_homework_limits() {
        let ok = row_with("2", "Theme", &"b".repeat(60));
        assert!(HomeworkLengthRule::default().scan(&ok).is_pass());

        let long = row_with("2", "Theme", &"b".repeat(61));
        let finding = HomeworkLengthRule::default().scan(&long);
        assert!(finding.cells.contains(&CellRef::new(1, 3)));
        assert!(finding.message().contains("макс. 60"));
    }

    #[test]
    fn test_custom_limit_in_message() {
        let t = row_with("7", &"a".repeat(30), "Read");
        let finding = ThemeLengthRule::new(20).scan(&t);
        assert!(finding.message().contains("макс. 20 символів"));
        assert!(finding.message().ends_with(": 7"));
    }
}
