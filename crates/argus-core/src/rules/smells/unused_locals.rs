//! no-unused-locals (C001): local variables and parameters never read.
//!
//! Scope-aware via the semantic model. Two shapes are reported, both at
//! the declaration site:
//! - never used: no reads and no writes;
//! - dead store: written to but never read.
//!
//! Exemptions:
//! - module-level declarations (the file's API surface);
//! - `_`-prefixed names (conventionally intentional);
//! - catch-clause parameters;
//! - parameters that precede a used parameter (API-imposed signatures).

use std::collections::HashSet;

use swc_common::Span;

use crate::declare_rule;
use crate::diagnostic::Issue;
use crate::parser::ParsedFile;
use crate::rules::{Rule, RuleMetadata, Severity};
use crate::semantic::SemanticModel;
use crate::semantic::scope::ScopeKind;
use crate::semantic::symbols::SymbolKind;
use crate::tsconfig::TsConfig;
use crate::visitor::VisitorContext;

declare_rule!(
    UnusedLocals,
    key = "C001",
    name = "no-unused-locals",
    description = "Disallow local variables and parameters that are never read",
    category = CodeSmell,
    severity = Warning
);

impl Rule for UnusedLocals {
    fn metadata(&self) -> &RuleMetadata {
        &self.metadata
    }

    fn check(&self, file: &ParsedFile, _config: &TsConfig) -> Vec<Issue> {
        let Some(module) = file.module() else {
            return Vec::new();
        };

        let ctx = VisitorContext::new(file);
        let model = SemanticModel::build(module);
        let ignored_params = collect_ignored_params(&model);

        let file_path = file.metadata().filename.clone();
        let mut issues = Vec::new();

        for symbol in model.symbols.all_symbols() {
            if symbol.is_exported || symbol.name.starts_with('_') {
                continue;
            }
            if !matches!(
                symbol.kind,
                SymbolKind::Var | SymbolKind::Let | SymbolKind::Const | SymbolKind::Parameter
            ) {
                continue;
            }

            let scope = model.scopes.get(symbol.scope);
            if scope.kind == ScopeKind::Module {
                continue;
            }
            if symbol.kind == SymbolKind::Parameter {
                if scope.kind == ScopeKind::Catch {
                    continue;
                }
                if ignored_params.contains(&symbol.span) {
                    continue;
                }
            }

            let message = if symbol.is_never_used() {
                format!("'{}' is declared but never used", symbol.name)
            } else if symbol.is_write_only() {
                format!("'{}' is assigned a value but never read", symbol.name)
            } else {
                continue;
            };

            let (line, column, end_line, end_column) = ctx.span_to_range(symbol.span);
            issues.push(
                Issue::new("C001", Severity::Warning, message, &file_path, line, column)
                    .with_end(end_line, end_column)
                    .with_suggestion(format!(
                        "Remove '{}' or prefix it with an underscore if it is intentional",
                        symbol.name
                    )),
            );
        }

        issues
    }
}

/// Parameters that precede a used parameter cannot be removed without
/// changing the call signature; skip them.
fn collect_ignored_params(model: &SemanticModel) -> HashSet<Span> {
    let mut by_scope: std::collections::HashMap<_, Vec<(Span, bool)>> =
        std::collections::HashMap::new();

    for symbol in model.symbols.all_symbols() {
        if symbol.kind == SymbolKind::Parameter {
            let used = !symbol.reads.is_empty() || !symbol.writes.is_empty();
            by_scope
                .entry(symbol.scope)
                .or_default()
                .push((symbol.span, used));
        }
    }

    let mut ignored = HashSet::new();
    for (_, mut params) in by_scope {
        params.sort_by_key(|(span, _)| span.lo.0);
        if let Some(last_used) = params.iter().rposition(|(_, used)| *used) {
            for (span, used) in params.iter().take(last_used) {
                if !used {
                    ignored.insert(*span);
                }
            }
        }
    }

    ignored
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_rule(code: &str) -> Vec<Issue> {
        let file = ParsedFile::from_source("test.ts", code);
        UnusedLocals::new().check(&file, &TsConfig::default())
    }

    #[test]
    fn dead_store_reported_at_declaration_line() {
        let issues = run_rule("function foo() {\n    let x = 4; \n    if (x = 5) {}\n}");

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].rule_key, "C001");
        assert_eq!(issues[0].line, 2);
        assert!(issues[0].message.contains("never read"));
    }

    #[test]
    fn never_used_local_is_flagged() {
        let issues = run_rule("function f() { const unused = 1; }");

        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("never used"));
    }

    #[test]
    fn read_local_is_not_flagged() {
        let issues = run_rule("function f() { const used = 1; return used; }");
        assert!(issues.is_empty());
    }

    #[test]
    fn module_level_declarations_are_exempt() {
        let issues = run_rule("const topLevel = 1;\nfunction helper() {}");
        assert!(issues.is_empty());
    }

    #[test]
    fn underscore_prefix_is_exempt() {
        let issues = run_rule("function f() { const _ignored = 1; }");
        assert!(issues.is_empty());
    }

    #[test]
    fn unused_parameter_is_flagged() {
        let issues = run_rule("function f(a: number) { return 1; }");

        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("'a'"));
    }

    #[test]
    fn parameter_before_a_used_one_is_exempt() {
        let issues = run_rule("function f(first: number, second: number) { return second; }");
        assert!(issues.is_empty());
    }

    #[test]
    fn catch_parameter_is_exempt() {
        let issues = run_rule("function f() { try { f(); } catch (e) {} }");
        assert!(issues.is_empty());
    }

    #[test]
    fn closure_usage_counts_as_a_read() {
        let issues = run_rule("function f() { const captured = 1; return () => captured; }");
        assert!(issues.is_empty());
    }

    #[test]
    fn multiple_dead_locals_each_reported() {
        let issues = run_rule("function f() {\n  const a = 1;\n  const b = 2;\n}");

        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].line, 2);
        assert_eq!(issues[1].line, 3);
    }
}
