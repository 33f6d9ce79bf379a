//! no-self-assignment (B003): `x = x` has no effect and usually hides a
//! typo in one of the operands.

use std::ops::ControlFlow;

use swc_ecma_ast::{AssignExpr, AssignOp, AssignTarget, Expr, SimpleAssignTarget};

use crate::declare_rule;
use crate::diagnostic::Issue;
use crate::parser::ParsedFile;
use crate::rules::{Rule, RuleMetadata, Severity};
use crate::tsconfig::TsConfig;
use crate::visitor::{AstVisitor, VisitorContext, walk_ast};

declare_rule!(
    SelfAssignment,
    key = "B003",
    name = "no-self-assignment",
    description = "Disallow assignments of a variable to itself",
    category = Bug,
    severity = Error
);

impl Rule for SelfAssignment {
    fn metadata(&self) -> &RuleMetadata {
        &self.metadata
    }

    fn check(&self, file: &ParsedFile, _config: &TsConfig) -> Vec<Issue> {
        let Some(module) = file.module() else {
            return Vec::new();
        };

        let ctx = VisitorContext::new(file);
        let mut visitor = SelfAssignmentVisitor {
            issues: Vec::new(),
            file_path: file.metadata().filename.clone(),
        };
        walk_ast(module, &mut visitor, &ctx);
        visitor.issues
    }
}

struct SelfAssignmentVisitor {
    issues: Vec<Issue>,
    file_path: String,
}

impl AstVisitor for SelfAssignmentVisitor {
    fn visit_assign_expr(&mut self, node: &AssignExpr, ctx: &VisitorContext) -> ControlFlow<()> {
        if node.op != AssignOp::Assign {
            return ControlFlow::Continue(());
        }

        let AssignTarget::Simple(SimpleAssignTarget::Ident(target)) = &node.left else {
            return ControlFlow::Continue(());
        };
        let Expr::Ident(source) = &*node.right else {
            return ControlFlow::Continue(());
        };

        if target.id.sym == source.sym {
            let (line, column) = ctx.span_to_location(node.span);
            self.issues.push(Issue::new(
                "B003",
                Severity::Error,
                format!("'{}' is assigned to itself", source.sym),
                &self.file_path,
                line,
                column,
            ));
        }

        ControlFlow::Continue(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_rule(code: &str) -> Vec<Issue> {
        let file = ParsedFile::from_source("test.ts", code);
        SelfAssignment::new().check(&file, &TsConfig::default())
    }

    #[test]
    fn self_assignment_is_flagged() {
        let issues = run_rule("function f(x: number) { x = x; }");

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].rule_key, "B003");
        assert_eq!(issues[0].severity, Severity::Error);
        assert!(issues[0].message.contains("'x'"));
    }

    #[test]
    fn ordinary_assignment_is_not_flagged() {
        let issues = run_rule("function f(x: number, y: number) { x = y; }");
        assert!(issues.is_empty());
    }

    #[test]
    fn compound_self_assignment_is_not_flagged() {
        // `x += x` doubles the value; only plain `x = x` is inert.
        let issues = run_rule("function f(x: number) { x += x; }");
        assert!(issues.is_empty());
    }

    #[test]
    fn member_self_assignment_is_not_flagged() {
        // Property writes can trigger setters; left to a type-aware check.
        let issues = run_rule("function f(o: { a: number }) { o.a = o.a; }");
        assert!(issues.is_empty());
    }
}
