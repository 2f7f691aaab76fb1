//! Homework rules.
//!
//! Every taught lesson needs homework, and that homework must be written out
//! rather than pointing at a web page.

use crate::types::{RuleFinding, RuleId, Table, HOMEWORK_COLUMN, LESSON_COLUMN, THEME_COLUMN};

use super::patterns::contains_link;
use super::{has_text, parse_lesson_number, trimmed, FindingBuilder, Rule};

/// Flags lessons that have a theme but no homework.
pub struct HomeworkPresenceRule;

impl HomeworkPresenceRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HomeworkPresenceRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for HomeworkPresenceRule {
    fn id(&self) -> RuleId {
        RuleId::HomeworkPresence
    }

    fn description(&self) -> &'static str {
        "Every lesson with a theme must have homework"
    }

    fn scan(&self, table: &Table) -> RuleFinding {
        let mut builder = FindingBuilder::new();

        for (row_idx, row) in table.data_rows() {
            let taught = has_text(row, LESSON_COLUMN) && has_text(row, THEME_COLUMN);
            if !taught || has_text(row, HOMEWORK_COLUMN) {
                continue;
            }

            let Some(lesson) = row.get(LESSON_COLUMN).and_then(|c| parse_lesson_number(c)) else {
                tracing::trace!(row = row_idx, "skipping row with unreadable lesson number");
                continue;
            };
            builder.flag(row_idx, HOMEWORK_COLUMN, lesson);
        }

        builder.build(self.id(), |lessons| {
            format!("Відсутнє домашнє завдання у наступних заняттях: {}", lessons)
        })
    }
}

/// Flags homework that contains web links.
pub struct HomeworkLinkRule;

impl HomeworkLinkRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HomeworkLinkRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for HomeworkLinkRule {
    fn id(&self) -> RuleId {
        RuleId::HomeworkLink
    }

    fn description(&self) -> &'static str {
        "Homework must not contain web links"
    }

    fn scan(&self, table: &Table) -> RuleFinding {
        let mut builder = FindingBuilder::new();

        for (row_idx, row) in table.data_rows() {
            let Some(homework) = trimmed(row, HOMEWORK_COLUMN) else {
                continue;
            };
            if homework.is_empty() || !contains_link(homework) {
                continue;
            }

            let Some(lesson) = row.get(LESSON_COLUMN).and_then(|c| parse_lesson_number(c)) else {
                tracing::trace!(row = row_idx, "skipping row with unreadable lesson number");
                continue;
            };
            builder.flag(row_idx, HOMEWORK_COLUMN, lesson);
        }

        builder.build(self.id(), |lessons| {
            format!(
                "Домашнє завдання не повинно містити посилань (знайдено у заняттях: {})",
                lessons
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CellRef;

    const HEADER: [&str; 4] = ["№", "Дата", "Тема", "Д/З"];

    fn table(rows: Vec<Vec<&str>>) -> Table {
        let mut all = vec![HEADER.to_vec()];
        all.extend(rows);
        Table::from_str_rows(all)
    }

    #[test]
    fn test_missing_homework_flagged() {
        let t = table(vec![vec!["3", "01.02.2025", "Intro", ""]]);
        let finding = HomeworkPresenceRule::new().scan(&t);
        assert!(finding.cells.contains(&CellRef::new(1, 3)));
        assert_eq!(
            finding.message(),
            "Відсутнє домашнє завдання у наступних заняттях: 3"
        );
    }

    #[test]
    fn test_short_row_counts_as_missing_homework() {
        let t = table(vec![vec!["4", "01.02.2025", "Intro"]]);
        let finding = HomeworkPresenceRule::new().scan(&t);
        assert!(finding.cells.contains(&CellRef::new(1, 3)));
    }

    #[test]
    fn test_whitespace_homework_is_missing() {
        let t = table(vec![vec!["5", "01.02.2025", "Intro", "   "]]);
        assert!(HomeworkPresenceRule::new().scan(&t).is_violation());
    }

    #[test]
    fn test_no_theme_no_flag() {
        let t = table(vec![
            vec!["3", "01.02.2025", "", ""],
            vec!["4", "01.02.2025", "  ", "Read"],
        ]);
        assert!(HomeworkPresenceRule::new().scan(&t).is_pass());
    }

    #[test]
    fn test_no_lesson_number_no_flag() {
        let t = table(vec![vec!["", "01.02.2025", "Intro", ""]]);
        assert!(HomeworkPresenceRule::new().scan(&t).is_pass());
    }

    #[test]
    fn test_unparseable_lesson_skipped() {
        let t = table(vec![
            vec!["x", "01.02.2025", "Intro", ""],
            vec!["9", "01.02.2025", "Intro", ""],
        ]);
        let finding = HomeworkPresenceRule::new().scan(&t);
        assert_eq!(finding.cells.len(), 1);
        assert!(finding.cells.contains(&CellRef::new(2, 3)));
    }

    #[test]
    fn test_header_ignored() {
        let t = Table::from_str_rows(vec![vec!["1", "", "Theme", ""]]);
        assert!(HomeworkPresenceRule::new().scan(&t).is_pass());
    }

    #[test]
    fn test_link_flagged() {
        let t = table(vec![
            vec!["1", "01.02.2025", "Intro", "see http://example.com"],
            vec!["2", "02.02.2025", "Next", "page 12"],
        ]);
        let finding = HomeworkLinkRule::new().scan(&t);
        assert_eq!(finding.cells.len(), 1);
        assert!(finding.cells.contains(&CellRef::new(1, 3)));
        assert_eq!(
            finding.message(),
            "Домашнє завдання не повинно містити посилань (знайдено у заняттях: 1)"
        );
    }

    #[test]
    fn test_link_lessons_sorted() {
        let t = table(vec![
            vec!["12", "01.02.2025", "A", "www.site.ua"],
            vec!["2", "01.02.2025", "B", "naurok.com.ua"],
        ]);
        let finding = HomeworkLinkRule::new().scan(&t);
        assert!(finding.message().ends_with("заняттях: 2, 12)"));
    }

    #[test]
    fn test_link_with_unreadable_lesson_skipped() {
        let t = table(vec![vec!["", "01.02.2025", "A", "www.site.ua"]]);
        assert!(HomeworkLinkRule::new().scan(&t).is_pass());
    }

    #[test]
    fn test_link_rule_ignores_missing_column() {
        let t = table(vec![vec!["1", "01.02.2025"]]);
        assert!(HomeworkLinkRule::new().scan(&t).is_pass());
    }
}
