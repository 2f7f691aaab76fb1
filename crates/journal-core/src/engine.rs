//! Engine: runs every rule and folds the findings into a verdict.
//!
//! Aggregation policy is fixed:
//! 1. Flagged cells from all rules are merged, tagged with the rule id
//! 2. A rule contributes a message only if it flagged at least one cell
//! 3. The table is valid iff no cell was flagged
//!
//! Rule order only affects message order.

use std::collections::BTreeSet;

use crate::config::EngineConfig;
use crate::rules::{default_rules, Rule};
use crate::types::{FlaggedCell, RuleFinding, Table, Verdict};

/// Applies an ordered list of rules to tables.
pub struct ValidationEngine {
    rules: Vec<Box<dyn Rule>>,
}

impl ValidationEngine {
    /// Engine with the standard rule set configured by `config`.
    pub fn new(config: &EngineConfig) -> Self {
        Self::with_rules(default_rules(config))
    }

    /// Engine with a custom rule list. Messages follow the list order.
    pub fn with_rules(rules: Vec<Box<dyn Rule>>) -> Self {
        Self { rules }
    }

    /// Registered rules, in order.
    pub fn rules(&self) -> &[Box<dyn Rule>] {
        &self.rules
    }

    /// Validate a table against every rule.
    pub fn validate(&self, table: &Table) -> Verdict {
        let findings: Vec<RuleFinding> = self
            .rules
            .iter()
            .map(|rule| {
                let finding = rule.scan(table);
                tracing::debug!(
                    rule = %rule.id(),
                    flagged = finding.cells.len(),
                    "rule scanned"
                );
                finding
            })
            .collect();

        self.synthesize(findings, table)
    }

    fn synthesize(&self, findings: Vec<RuleFinding>, table: &Table) -> Verdict {
        let mut flagged_cells = BTreeSet::new();
        let mut messages = Vec::new();

        for finding in &findings {
            if finding.is_pass() {
                continue;
            }
            flagged_cells.extend(
                finding
                    .cells
                    .iter()
                    .map(|cell| FlaggedCell::new(*cell, finding.rule)),
            );
            messages.push(finding.message().to_string());
        }

        let is_valid = flagged_cells.is_empty();
        tracing::info!(
            rows = table.len(),
            flagged = flagged_cells.len(),
            violated_rules = messages.len(),
            is_valid,
            "journal validated"
        );

        Verdict {
            is_valid,
            flagged_cells,
            messages,
            findings,
        }
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}
