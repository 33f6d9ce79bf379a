//! AstVisitor trait for uniform AST traversal.

use std::ops::ControlFlow;

use swc_ecma_ast::{
    ArrowExpr, AssignExpr, BinExpr, CondExpr, DoWhileStmt, ForInStmt, ForOfStmt, ForStmt,
    Function, IfStmt, TryStmt, WhileStmt,
};

use super::context::VisitorContext;

/// Per-node hooks invoked during a walk. Returning `Break` stops the
/// traversal for the whole file.
pub trait AstVisitor {
    fn visit_function(&mut self, _node: &Function, _ctx: &VisitorContext) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    fn visit_arrow_expr(&mut self, _node: &ArrowExpr, _ctx: &VisitorContext) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    fn visit_if_stmt(&mut self, _node: &IfStmt, _ctx: &VisitorContext) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    fn visit_while_stmt(&mut self, _node: &WhileStmt, _ctx: &VisitorContext) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    fn visit_do_while_stmt(
        &mut self,
        _node: &DoWhileStmt,
        _ctx: &VisitorContext,
    ) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    fn visit_for_stmt(&mut self, _node: &ForStmt, _ctx: &VisitorContext) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    fn visit_for_in_stmt(&mut self, _node: &ForInStmt, _ctx: &VisitorContext) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    fn visit_for_of_stmt(&mut self, _node: &ForOfStmt, _ctx: &VisitorContext) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    fn visit_try_stmt(&mut self, _node: &TryStmt, _ctx: &VisitorContext) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    fn visit_cond_expr(&mut self, _node: &CondExpr, _ctx: &VisitorContext) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    fn visit_assign_expr(&mut self, _node: &AssignExpr, _ctx: &VisitorContext) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    fn visit_bin_expr(&mut self, _node: &BinExpr, _ctx: &VisitorContext) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}
