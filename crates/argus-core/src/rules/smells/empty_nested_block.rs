//! no-empty-nested-block (C002): nested blocks with no statements.
//!
//! An empty if/else arm, loop body or try/finally block either marks
//! unfinished code or code that can be deleted. Function bodies and
//! catch handlers are exempt — both are routinely empty on purpose.

use std::ops::ControlFlow;

use swc_common::Spanned;
use swc_ecma_ast::{DoWhileStmt, ForInStmt, ForOfStmt, ForStmt, IfStmt, Stmt, TryStmt, WhileStmt};

use crate::declare_rule;
use crate::diagnostic::Issue;
use crate::parser::ParsedFile;
use crate::rules::{Rule, RuleMetadata, Severity};
use crate::tsconfig::TsConfig;
use crate::visitor::{AstVisitor, VisitorContext, walk_ast};

declare_rule!(
    EmptyNestedBlock,
    key = "C002",
    name = "no-empty-nested-block",
    description = "Disallow nested blocks of code that are empty",
    category = CodeSmell,
    severity = Warning
);

impl Rule for EmptyNestedBlock {
    fn metadata(&self) -> &RuleMetadata {
        &self.metadata
    }

    fn check(&self, file: &ParsedFile, _config: &TsConfig) -> Vec<Issue> {
        let Some(module) = file.module() else {
            return Vec::new();
        };

        let ctx = VisitorContext::new(file);
        let mut visitor = EmptyBlockVisitor {
            issues: Vec::new(),
            file_path: file.metadata().filename.clone(),
        };
        walk_ast(module, &mut visitor, &ctx);
        visitor.issues
    }
}

struct EmptyBlockVisitor {
    issues: Vec<Issue>,
    file_path: String,
}

impl EmptyBlockVisitor {
    fn check_stmt(&mut self, stmt: &Stmt, ctx: &VisitorContext) {
        if let Stmt::Block(block) = stmt {
            if block.stmts.is_empty() {
                let (line, column) = ctx.span_to_location(block.span);
                self.issues.push(Issue::new(
                    "C002",
                    Severity::Warning,
                    "Nested block of code is empty",
                    &self.file_path,
                    line,
                    column,
                ));
            }
        }
    }
}

impl AstVisitor for EmptyBlockVisitor {
    fn visit_if_stmt(&mut self, node: &IfStmt, ctx: &VisitorContext) -> ControlFlow<()> {
        self.check_stmt(&node.cons, ctx);
        if let Some(alt) = &node.alt {
            self.check_stmt(alt, ctx);
        }
        ControlFlow::Continue(())
    }

    fn visit_while_stmt(&mut self, node: &WhileStmt, ctx: &VisitorContext) -> ControlFlow<()> {
        self.check_stmt(&node.body, ctx);
        ControlFlow::Continue(())
    }

    fn visit_do_while_stmt(&mut self, node: &DoWhileStmt, ctx: &VisitorContext) -> ControlFlow<()> {
        self.check_stmt(&node.body, ctx);
        ControlFlow::Continue(())
    }

    fn visit_for_stmt(&mut self, node: &ForStmt, ctx: &VisitorContext) -> ControlFlow<()> {
        self.check_stmt(&node.body, ctx);
        ControlFlow::Continue(())
    }

    fn visit_for_in_stmt(&mut self, node: &ForInStmt, ctx: &VisitorContext) -> ControlFlow<()> {
        self.check_stmt(&node.body, ctx);
        ControlFlow::Continue(())
    }

    fn visit_for_of_stmt(&mut self, node: &ForOfStmt, ctx: &VisitorContext) -> ControlFlow<()> {
        self.check_stmt(&node.body, ctx);
        ControlFlow::Continue(())
    }

    fn visit_try_stmt(&mut self, node: &TryStmt, ctx: &VisitorContext) -> ControlFlow<()> {
        if node.block.stmts.is_empty() {
            let (line, column) = ctx.span_to_location(node.block.span());
            self.issues.push(Issue::new(
                "C002",
                Severity::Warning,
                "Nested block of code is empty",
                &self.file_path,
                line,
                column,
            ));
        }
        if let Some(finalizer) = &node.finalizer {
            if finalizer.stmts.is_empty() {
                let (line, column) = ctx.span_to_location(finalizer.span());
                self.issues.push(Issue::new(
                    "C002",
                    Severity::Warning,
                    "Nested block of code is empty",
                    &self.file_path,
                    line,
                    column,
                ));
            }
        }
        ControlFlow::Continue(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_rule(code: &str) -> Vec<Issue> {
        let file = ParsedFile::from_source("test.ts", code);
        EmptyNestedBlock::new().check(&file, &TsConfig::default())
    }

    #[test]
    fn empty_if_body_is_flagged() {
        let issues = run_rule("function foo() {\n    let x = 4; \n    if (x = 5) {}\n}");

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].rule_key, "C002");
        assert_eq!(issues[0].line, 3);
    }

    #[test]
    fn non_empty_if_body_is_not_flagged() {
        let issues = run_rule("function f(x: number) { if (x) { work(); } }");
        assert!(issues.is_empty());
    }

    #[test]
    fn empty_else_arm_is_flagged() {
        let issues = run_rule("function f(x: number) { if (x) { work(); } else {} }");
        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn else_if_chain_is_not_a_block() {
        let issues =
            run_rule("function f(x: number) { if (x) { a(); } else if (!x) { b(); } }");
        assert!(issues.is_empty());
    }

    #[test]
    fn empty_loop_bodies_are_flagged() {
        let issues = run_rule(
            "function f(xs: number[]) {\n  for (const x of xs) {}\n  while (f()) {}\n}",
        );
        assert_eq!(issues.len(), 2);
    }

    #[test]
    fn empty_function_body_is_exempt() {
        let issues = run_rule("function noop() {}");
        assert!(issues.is_empty());
    }

    #[test]
    fn empty_catch_handler_is_exempt() {
        let issues = run_rule("function f() { try { work(); } catch (e) {} }");
        assert!(issues.is_empty());
    }

    #[test]
    fn empty_try_block_is_flagged() {
        let issues = run_rule("function f() { try {} finally { cleanup(); } }");
        assert_eq!(issues.len(), 1);
    }
}
