//! Human-readable terminal output.

use colored::Colorize;

use argus_core::{AnalysisResult, Issue, Severity};

pub fn print(result: &AnalysisResult) {
    for issue in &result.issues {
        print_issue(issue);
    }

    for file in &result.failed_files {
        eprintln!(
            "{} failed to analyze {}",
            "error:".red().bold(),
            file.path().display()
        );
    }

    let warnings = count(result, Severity::Warning);
    let errors = count(result, Severity::Error);
    println!(
        "\n{} issue(s): {} error(s), {} warning(s); {} file(s) failed",
        result.issues.len(),
        errors,
        warnings,
        result.failed_files.len()
    );
}

fn print_issue(issue: &Issue) {
    let severity = match issue.severity {
        Severity::Error => "error".red().bold(),
        Severity::Warning => "warning".yellow().bold(),
        Severity::Info => "info".blue().bold(),
        Severity::Hint => "hint".dimmed(),
    };

    println!(
        "{}:{}:{} {} [{}] {}",
        issue.file,
        issue.line,
        issue.column,
        severity,
        issue.rule_key.bold(),
        issue.message
    );

    if let Some(suggestion) = &issue.suggestion {
        println!("    {} {}", "help:".green(), suggestion);
    }
}

fn count(result: &AnalysisResult, severity: Severity) -> usize {
    result
        .issues
        .iter()
        .filter(|issue| issue.severity == severity)
        .count()
}
