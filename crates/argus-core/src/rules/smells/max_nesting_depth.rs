//! max-nesting-depth (C003): control-flow nesting deeper than the
//! threshold within one function.

use std::ops::ControlFlow;

use swc_common::{Span, Spanned};
use swc_ecma_ast::{ArrowExpr, BlockStmt, BlockStmtOrExpr, Function, Stmt};

use crate::declare_rule;
use crate::diagnostic::Issue;
use crate::parser::ParsedFile;
use crate::rules::{Rule, RuleMetadata, Severity};
use crate::tsconfig::TsConfig;
use crate::visitor::{AstVisitor, VisitorContext, walk_ast};

const DEFAULT_THRESHOLD: usize = 4;

declare_rule!(
    MaxNestingDepth,
    key = "C003",
    name = "max-nesting-depth",
    description = "Enforce a maximum control-flow nesting depth",
    category = CodeSmell,
    severity = Warning
);

impl Rule for MaxNestingDepth {
    fn metadata(&self) -> &RuleMetadata {
        &self.metadata
    }

    fn check(&self, file: &ParsedFile, _config: &TsConfig) -> Vec<Issue> {
        let Some(module) = file.module() else {
            return Vec::new();
        };

        let ctx = VisitorContext::new(file);
        let mut visitor = DepthVisitor {
            issues: Vec::new(),
            file_path: file.metadata().filename.clone(),
            threshold: DEFAULT_THRESHOLD,
        };
        walk_ast(module, &mut visitor, &ctx);
        visitor.issues
    }
}

struct DepthVisitor {
    issues: Vec<Issue>,
    file_path: String,
    threshold: usize,
}

impl DepthVisitor {
    fn check_body(&mut self, body: &BlockStmt, fallback: Span, ctx: &VisitorContext) {
        let (depth, deepest) = block_depth(body, 0);
        if depth > self.threshold {
            let (line, column) = ctx.span_to_location(deepest.unwrap_or(fallback));
            self.issues.push(
                Issue::new(
                    "C003",
                    Severity::Warning,
                    format!(
                        "Control flow is nested {} levels deep (max: {})",
                        depth, self.threshold
                    ),
                    &self.file_path,
                    line,
                    column,
                )
                .with_suggestion("Extract nested logic into separate functions"),
            );
        }
    }
}

/// Deepest nesting within a block; `depth` is the nesting of the block
/// itself. Nested function bodies are checked on their own.
fn block_depth(block: &BlockStmt, depth: usize) -> (usize, Option<Span>) {
    block
        .stmts
        .iter()
        .map(|stmt| stmt_depth(stmt, depth))
        .max_by_key(|(d, _)| *d)
        .unwrap_or((depth, None))
}

fn stmt_depth(stmt: &Stmt, depth: usize) -> (usize, Option<Span>) {
    let nested = |inner: &Stmt, span: Span| {
        let (d, s) = stmt_depth(inner, depth + 1);
        (d, Some(s.unwrap_or(span)))
    };

    match stmt {
        Stmt::If(if_stmt) => {
            let mut deepest = nested(&if_stmt.cons, if_stmt.span());
            if let Some(alt) = &if_stmt.alt {
                let alt_depth = nested(alt, if_stmt.span());
                if alt_depth.0 > deepest.0 {
                    deepest = alt_depth;
                }
            }
            deepest
        }
        Stmt::While(s) => nested(&s.body, s.span()),
        Stmt::DoWhile(s) => nested(&s.body, s.span()),
        Stmt::For(s) => nested(&s.body, s.span()),
        Stmt::ForIn(s) => nested(&s.body, s.span()),
        Stmt::ForOf(s) => nested(&s.body, s.span()),
        Stmt::With(s) => nested(&s.body, s.span()),
        Stmt::Switch(switch_stmt) => switch_stmt
            .cases
            .iter()
            .flat_map(|case| case.cons.iter())
            .map(|stmt| stmt_depth(stmt, depth + 1))
            .map(|(d, s)| (d, Some(s.unwrap_or(switch_stmt.span()))))
            .max_by_key(|(d, _)| *d)
            .unwrap_or((depth + 1, Some(switch_stmt.span()))),
        Stmt::Try(try_stmt) => {
            let mut deepest = block_depth(&try_stmt.block, depth + 1);
            if let Some(handler) = &try_stmt.handler {
                let handler_depth = block_depth(&handler.body, depth + 1);
                if handler_depth.0 > deepest.0 {
                    deepest = handler_depth;
                }
            }
            if let Some(finalizer) = &try_stmt.finalizer {
                let finally_depth = block_depth(finalizer, depth + 1);
                if finally_depth.0 > deepest.0 {
                    deepest = finally_depth;
                }
            }
            (deepest.0, Some(deepest.1.unwrap_or(try_stmt.span())))
        }
        // Bare blocks group statements without adding control flow.
        Stmt::Block(block) => block_depth(block, depth),
        Stmt::Labeled(labeled) => stmt_depth(&labeled.body, depth),
        _ => (depth, None),
    }
}

impl AstVisitor for DepthVisitor {
    fn visit_function(&mut self, node: &Function, ctx: &VisitorContext) -> ControlFlow<()> {
        if let Some(body) = &node.body {
            self.check_body(body, node.span, ctx);
        }
        ControlFlow::Continue(())
    }

    fn visit_arrow_expr(&mut self, node: &ArrowExpr, ctx: &VisitorContext) -> ControlFlow<()> {
        if let BlockStmtOrExpr::BlockStmt(body) = &*node.body {
            self.check_body(body, node.span, ctx);
        }
        ControlFlow::Continue(())
    }
}
