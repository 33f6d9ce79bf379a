//! prefer-strict-equality (C004): `==`/`!=` coerce their operands.
//!
//! Comparisons against the `null` literal are exempt; `x == null` is the
//! established way to test for null-or-undefined in one expression.

use std::ops::ControlFlow;

use swc_ecma_ast::{BinExpr, BinaryOp, Expr, Lit};

use crate::declare_rule;
use crate::diagnostic::Issue;
use crate::parser::ParsedFile;
use crate::rules::{Rule, RuleMetadata, Severity};
use crate::tsconfig::TsConfig;
use crate::visitor::{AstVisitor, VisitorContext, walk_ast};

declare_rule!(
    StrictEquality,
    key = "C004",
    name = "prefer-strict-equality",
    description = "Require === and !== instead of == and !=",
    category = CodeSmell,
    severity = Warning
);

impl Rule for StrictEquality {
    fn metadata(&self) -> &RuleMetadata {
        &self.metadata
    }

    fn check(&self, file: &ParsedFile, _config: &TsConfig) -> Vec<Issue> {
        let Some(module) = file.module() else {
            return Vec::new();
        };

        let ctx = VisitorContext::new(file);
        let mut visitor = EqualityVisitor {
            issues: Vec::new(),
            file_path: file.metadata().filename.clone(),
        };
        walk_ast(module, &mut visitor, &ctx);
        visitor.issues
    }
}

struct EqualityVisitor {
    issues: Vec<Issue>,
    file_path: String,
}

fn is_null_literal(expr: &Expr) -> bool {
    matches!(expr, Expr::Lit(Lit::Null(_)))
}

impl AstVisitor for EqualityVisitor {
    fn visit_bin_expr(&mut self, node: &BinExpr, ctx: &VisitorContext) -> ControlFlow<()> {
        let (loose, strict) = match node.op {
            BinaryOp::EqEq => ("==", "==="),
            BinaryOp::NotEq => ("!=", "!=="),
            _ => return ControlFlow::Continue(()),
        };

        if is_null_literal(&node.left) || is_null_literal(&node.right) {
            return ControlFlow::Continue(());
        }

        let (line, column) = ctx.span_to_location(node.span);
        self.issues.push(
            Issue::new(
                "C004",
                Severity::Warning,
                format!("Expected '{strict}' and instead saw '{loose}'"),
                &self.file_path,
                line,
                column,
            )
            .with_suggestion(format!("Replace '{loose}' with '{strict}'")),
        );

        ControlFlow::Continue(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_rule(code: &str) -> Vec<Issue> {
        let file = ParsedFile::from_source("test.ts", code);
        StrictEquality::new().check(&file, &TsConfig::default())
    }

    #[test]
    fn loose_equality_is_flagged() {
        let issues = run_rule("function f(x: number) { return x == 1; }");

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].rule_key, "C004");
        assert!(issues[0].message.contains("'==='"));
    }

    #[test]
    fn loose_inequality_is_flagged() {
        let issues = run_rule("function f(x: number) { return x != 1; }");

        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("'!=='"));
    }

    #[test]
    fn strict_comparisons_are_fine() {
        let issues = run_rule("function f(x: number) { return x === 1 || x !== 2; }");
        assert!(issues.is_empty());
    }

    #[test]
    fn null_comparison_is_exempt() {
        let issues = run_rule("function f(x: unknown) { return x == null || null != x; }");
        assert!(issues.is_empty());
    }

    #[test]
    fn each_occurrence_reported() {
        let issues = run_rule("function f(a: number, b: number) { return a == 1 && b == 2; }");
        assert_eq!(issues.len(), 2);
    }
}
