//! # journal-core
//!
//! Deterministic rule engine for lesson-journal spreadsheets.
//!
//! A journal is a table with one lesson per row: lesson number, date, theme,
//! homework. Row 0 is the header. The engine runs a fixed set of independent
//! rules over the table and answers:
//! - Is the journal acceptable as submitted?
//! - Which cells need fixing, and which rule objects to each?
//! - What should the teacher be told?
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: Same table always produces the same verdict
//! 2. **Best effort**: Unreadable cells never abort a scan; the row is skipped
//! 3. **Traceable**: Every flagged cell carries the id of the rule that flagged it
//! 4. **Stateless**: Rules keep nothing between scans, so an engine can be reused
//!
//! ## Example
//!
//! ```rust
//! use journal_core::{Table, ValidationEngine};
//!
//! let table = Table::from_str_rows(vec![
//!     vec!["№", "Дата", "Тема", "Домашнє завдання"],
//!     vec!["1", "01.01.2025", "Intro to X", "Read ch.1"],
//! ]);
//!
//! let verdict = ValidationEngine::default().validate(&table);
//! assert!(!verdict.is_valid);
//! assert_eq!(verdict.messages.len(), 1);
//! ```

pub mod config;
pub mod engine;
pub mod rules;
pub mod types;

// Re-export main types at crate root
pub use config::{ConfigError, DateWindow, EngineConfig};
pub use engine::ValidationEngine;
pub use rules::{
    default_rules, DateValidationRule, HomeworkLengthRule, HomeworkLinkRule,
    HomeworkPresenceRule, LastLessonNumberRule, Rule, ThemeLengthRule,
};
pub use types::{CellRef, FlaggedCell, Row, RuleFinding, RuleId, Table, Verdict};

/// Validate a table with the default configuration.
///
/// Equivalent to `ValidationEngine::default().validate(table)`.
pub fn validate(table: &Table) -> Verdict {
    ValidationEngine::default().validate(table)
}

/// Validate a table with a custom configuration.
pub fn validate_with_config(table: &Table, config: &EngineConfig) -> Verdict {
    ValidationEngine::new(config).validate(table)
}
