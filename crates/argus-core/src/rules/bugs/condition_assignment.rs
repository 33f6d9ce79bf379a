//! no-condition-assignment (B001): assignments used as conditions.
//!
//! `if (x = 5)` is almost always a mistyped comparison. The check covers
//! if/while/do-while statements, for-loop tests and ternary tests, and
//! looks through parentheses, sequences, logical operators and negation.

use std::ops::ControlFlow;

use swc_ecma_ast::{BinaryOp, CondExpr, DoWhileStmt, Expr, ForStmt, IfStmt, UnaryOp, WhileStmt};

use crate::declare_rule;
use crate::diagnostic::Issue;
use crate::parser::ParsedFile;
use crate::rules::{Rule, RuleMetadata, Severity};
use crate::tsconfig::TsConfig;
use crate::visitor::{AstVisitor, VisitorContext, walk_ast};

declare_rule!(
    ConditionAssignment,
    key = "B001",
    name = "no-condition-assignment",
    description = "Disallow assignments inside conditions",
    category = Bug,
    severity = Warning
);

impl Rule for ConditionAssignment {
    fn metadata(&self) -> &RuleMetadata {
        &self.metadata
    }

    fn check(&self, file: &ParsedFile, _config: &TsConfig) -> Vec<Issue> {
        let Some(module) = file.module() else {
            return Vec::new();
        };

        let ctx = VisitorContext::new(file);
        let mut visitor = ConditionVisitor {
            issues: Vec::new(),
            file_path: file.metadata().filename.clone(),
        };
        walk_ast(module, &mut visitor, &ctx);
        visitor.issues
    }
}

struct ConditionVisitor {
    issues: Vec<Issue>,
    file_path: String,
}

impl ConditionVisitor {
    fn scan_condition(&mut self, expr: &Expr, ctx: &VisitorContext) {
        match expr {
            Expr::Assign(assign) => {
                let (line, column) = ctx.span_to_location(assign.span);
                self.issues.push(
                    Issue::new(
                        "B001",
                        Severity::Warning,
                        "Assignment used as a condition",
                        &self.file_path,
                        line,
                        column,
                    )
                    .with_suggestion("Use a comparison operator, or move the assignment out of the condition"),
                );
                self.scan_condition(&assign.right, ctx);
            }
            Expr::Paren(paren) => self.scan_condition(&paren.expr, ctx),
            Expr::Seq(seq) => {
                for expr in &seq.exprs {
                    self.scan_condition(expr, ctx);
                }
            }
            Expr::Bin(bin)
                if matches!(
                    bin.op,
                    BinaryOp::LogicalAnd | BinaryOp::LogicalOr | BinaryOp::NullishCoalescing
                ) =>
            {
                self.scan_condition(&bin.left, ctx);
                self.scan_condition(&bin.right, ctx);
            }
            Expr::Unary(unary) if unary.op == UnaryOp::Bang => {
                self.scan_condition(&unary.arg, ctx);
            }
            _ => {}
        }
    }
}

impl AstVisitor for ConditionVisitor {
    fn visit_if_stmt(&mut self, node: &IfStmt, ctx: &VisitorContext) -> ControlFlow<()> {
        self.scan_condition(&node.test, ctx);
        ControlFlow::Continue(())
    }

    fn visit_while_stmt(&mut self, node: &WhileStmt, ctx: &VisitorContext) -> ControlFlow<()> {
        self.scan_condition(&node.test, ctx);
        ControlFlow::Continue(())
    }

    fn visit_do_while_stmt(&mut self, node: &DoWhileStmt, ctx: &VisitorContext) -> ControlFlow<()> {
        self.scan_condition(&node.test, ctx);
        ControlFlow::Continue(())
    }

    fn visit_for_stmt(&mut self, node: &ForStmt, ctx: &VisitorContext) -> ControlFlow<()> {
        // Only the test position; for-loop init and update assign by design.
        if let Some(test) = &node.test {
            self.scan_condition(test, ctx);
        }
        ControlFlow::Continue(())
    }

    fn visit_cond_expr(&mut self, node: &CondExpr, ctx: &VisitorContext) -> ControlFlow<()> {
        self.scan_condition(&node.test, ctx);
        ControlFlow::Continue(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_rule(code: &str) -> Vec<Issue> {
        let file = ParsedFile::from_source("test.ts", code);
        ConditionAssignment::new().check(&file, &TsConfig::default())
    }

    #[test]
    fn assignment_in_if_condition_is_flagged() {
        let issues = run_rule("function foo() {\n    let x = 4; \n    if (x = 5) {}\n}");

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].rule_key, "B001");
        assert_eq!(issues[0].line, 3);
    }

    #[test]
    fn comparison_is_not_flagged() {
        let issues = run_rule("function foo(x: number) { if (x === 5) {} }");
        assert!(issues.is_empty());
    }

    #[test]
    fn assignment_in_while_condition_is_flagged() {
        let issues = run_rule("function f(next: () => string) { let line; while (line = next()) {} }");
        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn assignment_in_for_test_is_flagged_but_not_init_or_update() {
        let issues = run_rule("for (let i = 0; i = 10; i += 1) {}");
        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn assignment_in_ternary_test_is_flagged() {
        let issues = run_rule("function f(a: number, b: number) { return (a = b) ? 1 : 2; }");
        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn assignment_behind_logical_operator_is_flagged() {
        let issues = run_rule("function f(a: boolean, b: number) { if (a && (b = 1)) {} }");
        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn compound_assignment_in_condition_is_flagged() {
        let issues = run_rule("function f(x: number) { if (x += 1) {} }");
        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn assignment_in_body_is_not_flagged() {
        let issues = run_rule("function f(x: number) { if (x > 1) { x = 2; } }");
        assert!(issues.is_empty());
    }

    #[test]
    fn nested_assignments_each_reported() {
        let issues = run_rule("function f(x: number, y: number) { if (x = (y = 2)) {} }");
        assert_eq!(issues.len(), 2);
    }
}
