//! Rule system: catalog, registry and dispatch.
//!
//! Rules are independent checks over one parsed file. Dispatch order is
//! registration order; a rule that fails internally is contained at
//! rule-invocation granularity and contributes zero findings.

pub mod bugs;
pub mod smells;

use std::collections::{HashMap, HashSet};
use std::panic::{AssertUnwindSafe, catch_unwind};

use serde::Serialize;
use tracing::warn;

use crate::config::RulesConfig;
use crate::diagnostic::Issue;
use crate::parser::ParsedFile;
use crate::tsconfig::TsConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
    Hint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleCategory {
    Bug,
    CodeSmell,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMetadata {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: RuleCategory,
    pub severity: Severity,
}

/// One independent check: a pure function of (syntax model, compilation
/// descriptor) to findings, with no other observable effects.
pub trait Rule: Send + Sync {
    fn metadata(&self) -> &RuleMetadata;
    fn check(&self, file: &ParsedFile, config: &TsConfig) -> Vec<Issue>;
}

pub struct RuleRegistry {
    rules: Vec<Box<dyn Rule>>,
    disabled_rules: HashSet<String>,
    severity_overrides: HashMap<String, Severity>,
    bugs_enabled: bool,
    smells_enabled: bool,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            disabled_rules: HashSet::new(),
            severity_overrides: HashMap::new(),
            bugs_enabled: true,
            smells_enabled: true,
        }
    }

    pub fn register(&mut self, rule: Box<dyn Rule>) {
        self.rules.push(rule);
    }

    pub fn configure(&mut self, config: &RulesConfig) {
        self.disabled_rules = config.disabled.iter().cloned().collect();
        self.severity_overrides = config
            .severity
            .iter()
            .map(|(rule, value)| (rule.clone(), (*value).into()))
            .collect();
        self.bugs_enabled = config.bugs.unwrap_or(true);
        self.smells_enabled = config.smells.unwrap_or(true);
    }

    pub fn rules(&self) -> impl Iterator<Item = &dyn Rule> {
        self.rules.iter().map(|r| r.as_ref())
    }

    pub fn get_rule(&self, key_or_name: &str) -> Option<&dyn Rule> {
        self.rules
            .iter()
            .find(|r| {
                let metadata = r.metadata();
                metadata.key == key_or_name || metadata.name == key_or_name
            })
            .map(|r| r.as_ref())
    }

    pub fn is_rule_enabled(&self, key_or_name: &str) -> bool {
        self.get_rule(key_or_name)
            .is_some_and(|rule| self.should_run(rule))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run every enabled rule over one file, in registration order.
    ///
    /// A panicking rule is logged and treated as having produced zero
    /// findings for this file; remaining rules still run.
    pub fn run_all(&self, file: &ParsedFile, config: &TsConfig) -> Vec<Issue> {
        let mut issues = Vec::new();

        for rule in self.rules.iter().filter(|r| self.should_run(r.as_ref())) {
            match catch_unwind(AssertUnwindSafe(|| rule.check(file, config))) {
                Ok(mut found) => {
                    self.apply_severity_override(rule.as_ref(), &mut found);
                    issues.append(&mut found);
                }
                Err(_) => {
                    warn!(
                        rule = rule.metadata().key,
                        file = %file.metadata().filename,
                        "rule check failed internally; no findings reported for this file"
                    );
                }
            }
        }

        issues
    }

    fn should_run(&self, rule: &dyn Rule) -> bool {
        let metadata = rule.metadata();

        let category_enabled = match metadata.category {
            RuleCategory::Bug => self.bugs_enabled,
            RuleCategory::CodeSmell => self.smells_enabled,
        };

        category_enabled
            && !self.disabled_rules.contains(metadata.key)
            && !self.disabled_rules.contains(metadata.name)
    }

    fn apply_severity_override(&self, rule: &dyn Rule, issues: &mut [Issue]) {
        let metadata = rule.metadata();
        let severity = self
            .severity_overrides
            .get(metadata.key)
            .or_else(|| self.severity_overrides.get(metadata.name));

        if let Some(severity) = severity {
            for issue in issues.iter_mut() {
                issue.severity = *severity;
            }
        }
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[macro_export]
macro_rules! declare_rule {
    (
        $name:ident,
        key = $key:literal,
        name = $rule_name:literal,
        description = $desc:literal,
        category = $cat:ident,
        severity = $sev:ident
    ) => {
        pub struct $name {
            metadata: $crate::rules::RuleMetadata,
        }

        impl $name {
            pub fn new() -> Self {
                Self {
                    metadata: $crate::rules::RuleMetadata {
                        key: $key,
                        name: $rule_name,
                        description: $desc,
                        category: $crate::rules::RuleCategory::$cat,
                        severity: $crate::rules::Severity::$sev,
                    },
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestRule {
        metadata: RuleMetadata,
        issues: Vec<Issue>,
    }

    impl TestRule {
        fn new(key: &'static str) -> Self {
            Self {
                metadata: RuleMetadata {
                    key,
                    name: "test-rule",
                    description: "a test rule",
                    category: RuleCategory::CodeSmell,
                    severity: Severity::Warning,
                },
                issues: Vec::new(),
            }
        }

        fn with_name(mut self, name: &'static str) -> Self {
            self.metadata.name = name;
            self
        }

        fn with_category(mut self, category: RuleCategory) -> Self {
            self.metadata.category = category;
            self
        }

        fn with_issue(mut self, issue: Issue) -> Self {
            self.issues.push(issue);
            self
        }
    }

    impl Rule for TestRule {
        fn metadata(&self) -> &RuleMetadata {
            &self.metadata
        }

        fn check(&self, _file: &ParsedFile, _config: &TsConfig) -> Vec<Issue> {
            self.issues.clone()
        }
    }

    struct PanickingRule {
        metadata: RuleMetadata,
    }

    impl PanickingRule {
        fn new() -> Self {
            Self {
                metadata: RuleMetadata {
                    key: "X999",
                    name: "panicking-rule",
                    description: "always fails internally",
                    category: RuleCategory::Bug,
                    severity: Severity::Error,
                },
            }
        }
    }

    impl Rule for PanickingRule {
        fn metadata(&self) -> &RuleMetadata {
            &self.metadata
        }

        fn check(&self, _file: &ParsedFile, _config: &TsConfig) -> Vec<Issue> {
            panic!("internal fault");
        }
    }

    fn issue(key: &str, line: usize) -> Issue {
        Issue::new(key, Severity::Warning, "msg", "test.ts", line, 1)
    }

    fn parsed() -> ParsedFile {
        ParsedFile::from_source("test.ts", "const x = 1;")
    }

    #[test]
    fn run_all_collects_in_registration_order() {
        let mut registry = RuleRegistry::new();
        registry.register(Box::new(TestRule::new("T001").with_issue(issue("T001", 1))));
        registry.register(Box::new(TestRule::new("T002").with_issue(issue("T002", 1))));

        let issues = registry.run_all(&parsed(), &TsConfig::default());

        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].rule_key, "T001");
        assert_eq!(issues[1].rule_key, "T002");
    }

    #[test]
    fn panicking_rule_is_contained() {
        let mut registry = RuleRegistry::new();
        registry.register(Box::new(TestRule::new("T001").with_issue(issue("T001", 1))));
        registry.register(Box::new(PanickingRule::new()));
        registry.register(Box::new(TestRule::new("T002").with_issue(issue("T002", 2))));

        let issues = registry.run_all(&parsed(), &TsConfig::default());

        assert_eq!(issues.len(), 2, "surviving rules still report");
        assert_eq!(issues[0].rule_key, "T001");
        assert_eq!(issues[1].rule_key, "T002");
    }

    #[test]
    fn duplicate_findings_are_preserved() {
        let mut registry = RuleRegistry::new();
        registry.register(Box::new(
            TestRule::new("T001")
                .with_issue(issue("T001", 3))
                .with_issue(issue("T001", 3)),
        ));

        let issues = registry.run_all(&parsed(), &TsConfig::default());

        assert_eq!(issues.len(), 2);
    }

    #[test]
    fn disabled_rule_does_not_run() {
        let mut registry = RuleRegistry::new();
        registry.register(Box::new(TestRule::new("T001").with_issue(issue("T001", 1))));

        let config = RulesConfig {
            disabled: vec!["T001".to_string()],
            ..Default::default()
        };
        registry.configure(&config);

        assert!(registry.run_all(&parsed(), &TsConfig::default()).is_empty());
        assert!(!registry.is_rule_enabled("T001"));
    }

    #[test]
    fn disable_by_name_works_too() {
        let mut registry = RuleRegistry::new();
        registry.register(Box::new(
            TestRule::new("T001")
                .with_name("some-name")
                .with_issue(issue("T001", 1)),
        ));

        let config = RulesConfig {
            disabled: vec!["some-name".to_string()],
            ..Default::default()
        };
        registry.configure(&config);

        assert!(registry.run_all(&parsed(), &TsConfig::default()).is_empty());
    }

    #[test]
    fn category_toggle_filters_rules() {
        let mut registry = RuleRegistry::new();
        registry.register(Box::new(
            TestRule::new("B900")
                .with_category(RuleCategory::Bug)
                .with_issue(issue("B900", 1)),
        ));
        registry.register(Box::new(
            TestRule::new("C900")
                .with_category(RuleCategory::CodeSmell)
                .with_issue(issue("C900", 1)),
        ));

        let config = RulesConfig {
            smells: Some(false),
            ..Default::default()
        };
        registry.configure(&config);

        let issues = registry.run_all(&parsed(), &TsConfig::default());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].rule_key, "B900");
    }

    #[test]
    fn severity_override_applies_to_findings() {
        use crate::config::SeverityValue;

        let mut registry = RuleRegistry::new();
        registry.register(Box::new(TestRule::new("T001").with_issue(issue("T001", 1))));

        let config = RulesConfig {
            severity: HashMap::from([("T001".to_string(), SeverityValue::Error)]),
            ..Default::default()
        };
        registry.configure(&config);

        let issues = registry.run_all(&parsed(), &TsConfig::default());
        assert_eq!(issues[0].severity, Severity::Error);
    }

    #[test]
    fn get_rule_finds_by_key_or_name() {
        let mut registry = RuleRegistry::new();
        registry.register(Box::new(TestRule::new("T001").with_name("first-rule")));

        assert!(registry.get_rule("T001").is_some());
        assert!(registry.get_rule("first-rule").is_some());
        assert!(registry.get_rule("nope").is_none());
    }

    declare_rule!(
        MacroRule,
        key = "M001",
        name = "macro-rule",
        description = "declared through the macro",
        category = Bug,
        severity = Info
    );

    impl Rule for MacroRule {
        fn metadata(&self) -> &RuleMetadata {
            &self.metadata
        }

        fn check(&self, _file: &ParsedFile, _config: &TsConfig) -> Vec<Issue> {
            Vec::new()
        }
    }

    #[test]
    fn declare_rule_macro_builds_metadata() {
        let rule = MacroRule::new();
        let metadata = rule.metadata();

        assert_eq!(metadata.key, "M001");
        assert_eq!(metadata.name, "macro-rule");
        assert_eq!(metadata.category, RuleCategory::Bug);
        assert_eq!(metadata.severity, Severity::Info);
    }
}
