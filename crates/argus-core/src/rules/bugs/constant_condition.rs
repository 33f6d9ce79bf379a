//! no-constant-condition (B002): conditions with a statically known
//! truth value.
//!
//! Covers literal conditions (`if (true)`, `if (0)`) and assignments of
//! literal values (`if (x = 5)` — the condition takes the value 5 and is
//! always truthy). `while (true)` is the idiomatic infinite loop and is
//! deliberately not covered.

use std::ops::ControlFlow;

use swc_common::Spanned;
use swc_ecma_ast::{CondExpr, Expr, IfStmt, Lit, UnaryOp};

use crate::declare_rule;
use crate::diagnostic::Issue;
use crate::parser::ParsedFile;
use crate::rules::{Rule, RuleMetadata, Severity};
use crate::tsconfig::TsConfig;
use crate::visitor::{AstVisitor, VisitorContext, walk_ast};

declare_rule!(
    ConstantCondition,
    key = "B002",
    name = "no-constant-condition",
    description = "Disallow conditions that always evaluate the same way",
    category = Bug,
    severity = Warning
);

impl Rule for ConstantCondition {
    fn metadata(&self) -> &RuleMetadata {
        &self.metadata
    }

    fn check(&self, file: &ParsedFile, _config: &TsConfig) -> Vec<Issue> {
        let Some(module) = file.module() else {
            return Vec::new();
        };

        let ctx = VisitorContext::new(file);
        let mut visitor = ConstantConditionVisitor {
            issues: Vec::new(),
            file_path: file.metadata().filename.clone(),
        };
        walk_ast(module, &mut visitor, &ctx);
        visitor.issues
    }
}

/// Truth value of an expression when it is statically known.
fn static_truthiness(expr: &Expr) -> Option<bool> {
    match expr {
        Expr::Lit(lit) => match lit {
            Lit::Bool(b) => Some(b.value),
            Lit::Num(n) => Some(n.value != 0.0 && !n.value.is_nan()),
            Lit::Str(s) => Some(!s.value.is_empty()),
            Lit::Null(_) => Some(false),
            Lit::Regex(_) => Some(true),
            _ => None,
        },
        Expr::Paren(paren) => static_truthiness(&paren.expr),
        // The value of an assignment is its right-hand side.
        Expr::Assign(assign) if assign.op == swc_ecma_ast::AssignOp::Assign => {
            static_truthiness(&assign.right)
        }
        Expr::Unary(unary) if unary.op == UnaryOp::Bang => {
            static_truthiness(&unary.arg).map(|v| !v)
        }
        _ => None,
    }
}

struct ConstantConditionVisitor {
    issues: Vec<Issue>,
    file_path: String,
}

impl ConstantConditionVisitor {
    fn check_condition(&mut self, test: &Expr, ctx: &VisitorContext) {
        if let Some(value) = static_truthiness(test) {
            let (line, column) = ctx.span_to_location(test.span());
            self.issues.push(Issue::new(
                "B002",
                Severity::Warning,
                format!(
                    "This condition always evaluates to {}",
                    if value { "true" } else { "false" }
                ),
                &self.file_path,
                line,
                column,
            ));
        }
    }
}

impl AstVisitor for ConstantConditionVisitor {
    fn visit_if_stmt(&mut self, node: &IfStmt, ctx: &VisitorContext) -> ControlFlow<()> {
        self.check_condition(&node.test, ctx);
        ControlFlow::Continue(())
    }

    fn visit_cond_expr(&mut self, node: &CondExpr, ctx: &VisitorContext) -> ControlFlow<()> {
        self.check_condition(&node.test, ctx);
        ControlFlow::Continue(())
    }
}
