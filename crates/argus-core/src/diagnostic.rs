//! Issue reporting for analysis results.

use serde::Serialize;

use crate::rules::Severity;

/// One reported rule violation, located by file and 1-based line/column.
///
/// Identity is the full tuple; two rules reporting the same position are
/// two distinct issues and both are preserved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issue {
    pub rule_key: String,
    pub severity: Severity,
    pub message: String,
    pub file: String,
    pub line: usize,
    pub column: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_column: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl Issue {
    pub fn new(
        rule_key: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
        file: impl Into<String>,
        line: usize,
        column: usize,
    ) -> Self {
        Self {
            rule_key: rule_key.into(),
            severity,
            message: message.into(),
            file: file.into(),
            line,
            column,
            end_line: None,
            end_column: None,
            suggestion: None,
        }
    }

    pub fn with_end(mut self, end_line: usize, end_column: usize) -> Self {
        self.end_line = Some(end_line);
        self.end_column = Some(end_column);
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_carries_location() {
        let issue = Issue::new("B001", Severity::Warning, "msg", "foo.ts", 3, 9);

        assert_eq!(issue.rule_key, "B001");
        assert_eq!(issue.file, "foo.ts");
        assert_eq!(issue.line, 3);
        assert_eq!(issue.column, 9);
        assert!(issue.end_line.is_none());
        assert!(issue.suggestion.is_none());
    }

    #[test]
    fn builder_methods_extend_issue() {
        let issue = Issue::new("C001", Severity::Warning, "msg", "foo.ts", 2, 9)
            .with_end(2, 10)
            .with_suggestion("remove it");

        assert_eq!(issue.end_line, Some(2));
        assert_eq!(issue.end_column, Some(10));
        assert_eq!(issue.suggestion.as_deref(), Some("remove it"));
    }

    #[test]
    fn serializes_without_empty_optionals() {
        let issue = Issue::new("C004", Severity::Warning, "msg", "foo.ts", 1, 1);
        let json = serde_json::to_string(&issue).unwrap();

        assert!(json.contains("\"rule_key\":\"C004\""));
        assert!(!json.contains("end_line"));
        assert!(!json.contains("suggestion"));
    }
}
