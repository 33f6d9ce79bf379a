//! Visitor pattern for AST traversal.
//!
//! Bridges the engine's [`AstVisitor`] hooks onto SWC's visit
//! machinery, with early-stop support.

mod context;
mod traits;

pub use context::VisitorContext;
pub use traits::AstVisitor;

use std::ops::ControlFlow;

use swc_ecma_ast::Module;
use swc_ecma_visit::{Visit, VisitWith};

struct Walker<'a, V: AstVisitor> {
    visitor: &'a mut V,
    ctx: &'a VisitorContext<'a>,
    stopped: bool,
}

macro_rules! forward_visit {
    ($($method:ident => $node:ty),+ $(,)?) => {
        $(
            fn $method(&mut self, node: &$node) {
                if self.stopped {
                    return;
                }
                if let ControlFlow::Break(()) = self.visitor.$method(node, self.ctx) {
                    self.stopped = true;
                    return;
                }
                node.visit_children_with(self);
            }
        )+
    };
}

impl<V: AstVisitor> Visit for Walker<'_, V> {
    forward_visit!(
        visit_function => swc_ecma_ast::Function,
        visit_arrow_expr => swc_ecma_ast::ArrowExpr,
        visit_if_stmt => swc_ecma_ast::IfStmt,
        visit_while_stmt => swc_ecma_ast::WhileStmt,
        visit_do_while_stmt => swc_ecma_ast::DoWhileStmt,
        visit_for_stmt => swc_ecma_ast::ForStmt,
        visit_for_in_stmt => swc_ecma_ast::ForInStmt,
        visit_for_of_stmt => swc_ecma_ast::ForOfStmt,
        visit_try_stmt => swc_ecma_ast::TryStmt,
        visit_cond_expr => swc_ecma_ast::CondExpr,
        visit_assign_expr => swc_ecma_ast::AssignExpr,
        visit_bin_expr => swc_ecma_ast::BinExpr,
    );
}

/// Walk a module, dispatching to the visitor's hooks.
pub fn walk_ast<V: AstVisitor>(module: &Module, visitor: &mut V, ctx: &VisitorContext) {
    let mut walker = Walker {
        visitor,
        ctx,
        stopped: false,
    };
    module.visit_with(&mut walker);
}
