//! Rules command - lists the rule catalog.

use clap::Args;
use colored::Colorize;

use argus_core::AnalysisEngine;
use argus_core::rules::{RuleCategory, Severity};

#[derive(Args, Debug)]
pub struct RulesArgs {}

impl RulesArgs {
    pub fn run(&self) {
        let engine = AnalysisEngine::new();

        for rule in engine.registry().rules() {
            let metadata = rule.metadata();
            let category = match metadata.category {
                RuleCategory::Bug => "bug".red(),
                RuleCategory::CodeSmell => "smell".yellow(),
            };
            let severity = match metadata.severity {
                Severity::Error => "error",
                Severity::Warning => "warning",
                Severity::Info => "info",
                Severity::Hint => "hint",
            };

            println!(
                "{}  {:<24} {:<8} {:<8} {}",
                metadata.key.bold(),
                metadata.name,
                category,
                severity,
                metadata.description
            );
        }
    }
}
