use std::collections::BTreeMap;
use std::time::Instant;

use submval_core::{DEFAULT_DELIMITER, PropertyTable};

use crate::model::{RuleSummary, Summary, ValidationOutcome};
use crate::rules::{Rule, RuleContext, default_rules};
use crate::table::Submission;

/// Options for a validation run.
#[derive(Debug, Clone)]
pub struct ValidateOptions {
    /// Multi-value separator of the commons the schema belongs to.
    pub delimiter: char,
    /// Check files of one rule concurrently.
    pub parallel: bool,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            parallel: true,
        }
    }
}

/// Runs the rule set over a loaded submission.
pub struct ValidationEngine {
    options: ValidateOptions,
    rules: Vec<Box<dyn Rule>>,
}

impl ValidationEngine {
    pub fn new(options: ValidateOptions) -> Self {
        Self {
            options,
            rules: default_rules(),
        }
    }

    pub fn options(&self) -> &ValidateOptions {
        &self.options
    }

    pub fn run(&self, schema: &PropertyTable, submission: &Submission) -> ValidationOutcome {
        let ctx = RuleContext::new(schema, &submission.tables, self.options.delimiter);
        tracing::info!(
            event = "validation_started",
            files = submission.tables.len(),
            rejected = submission.rejected.len(),
            properties = schema.len()
        );

        let mut reports = Vec::with_capacity(self.rules.len());
        for rule in &self.rules {
            let started = Instant::now();
            let report = rule.evaluate(&ctx, self.options.parallel);
            tracing::info!(
                event = "rule_finished",
                rule = rule.id(),
                sections = report.sections.len(),
                elapsed_ms = started.elapsed().as_millis() as u64
            );
            reports.push(report);
        }

        let mut severity_counts = BTreeMap::new();
        let mut rules = Vec::with_capacity(reports.len());
        for report in &reports {
            let counts = report.counts();
            for (severity, count) in &counts {
                *severity_counts.entry(*severity).or_insert(0) += count;
            }
            rules.push(RuleSummary {
                rule: report.rule.to_string(),
                counts,
                aborted: report.aborted.clone(),
            });
        }

        let summary = Summary {
            files_loaded: submission
                .tables
                .iter()
                .map(|table| table.file_name().to_string())
                .collect(),
            rejected_files: submission.rejected.clone(),
            excluded_files: submission.excluded.clone(),
            severity_counts,
            rules,
            schema_fingerprint: schema.fingerprint().ok(),
        };

        ValidationOutcome { reports, summary }
    }
}
