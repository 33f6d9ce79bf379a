//! Construction of the semantic model from a parsed module.
//!
//! A single hand-rolled traversal declares bindings (with `var`
//! hoisting), then resolves identifier references through the scope
//! chain, classifying each as a read or a write. Assignment targets are
//! writes; compound assignments and update expressions count as both.

use swc_common::Spanned;
use swc_ecma_ast::{
    ArrowExpr, BlockStmt, BlockStmtOrExpr, CatchClause, Class, ClassMember, Decl, DefaultDecl,
    Expr, ForHead, Function, Ident, ImportSpecifier, Module, ModuleDecl, ModuleExportName,
    ModuleItem, ObjectPatProp, Pat, Prop, PropOrSpread, SimpleAssignTarget, Stmt, VarDecl,
    VarDeclKind, VarDeclOrExpr,
};

use super::scope::{ScopeId, ScopeKind, ScopeTree};
use super::symbols::{SymbolKind, SymbolTable};

/// Scope tree and symbol table of one file. Built once per dispatch and
/// shared read-only by scope-aware rules.
pub struct SemanticModel {
    pub scopes: ScopeTree,
    pub symbols: SymbolTable,
}

impl SemanticModel {
    pub fn build(module: &Module) -> SemanticModel {
        let mut scopes = ScopeTree::new();
        let root = scopes.create_scope(ScopeKind::Module, None, module.span);

        let mut builder = Builder {
            scopes,
            symbols: SymbolTable::new(),
            current: root,
        };

        for item in &module.body {
            builder.visit_module_item(item);
        }

        SemanticModel {
            scopes: builder.scopes,
            symbols: builder.symbols,
        }
    }
}

struct Builder {
    scopes: ScopeTree,
    symbols: SymbolTable,
    current: ScopeId,
}

impl Builder {
    fn visit_module_item(&mut self, item: &ModuleItem) {
        match item {
            ModuleItem::ModuleDecl(decl) => self.visit_module_decl(decl),
            ModuleItem::Stmt(stmt) => self.visit_stmt(stmt),
        }
    }

    fn visit_module_decl(&mut self, decl: &ModuleDecl) {
        match decl {
            ModuleDecl::Import(import) => {
                for specifier in &import.specifiers {
                    let local = match specifier {
                        ImportSpecifier::Named(named) => &named.local,
                        ImportSpecifier::Default(default) => &default.local,
                        ImportSpecifier::Namespace(namespace) => &namespace.local,
                    };
                    self.declare(&local.sym, SymbolKind::Import, local.span, false);
                }
            }
            ModuleDecl::ExportDecl(export) => self.visit_decl(&export.decl, true),
            ModuleDecl::ExportNamed(named) if named.src.is_none() => {
                // `export { x }` both exports and reads the local binding.
                for specifier in &named.specifiers {
                    if let swc_ecma_ast::ExportSpecifier::Named(spec) = specifier {
                        if let ModuleExportName::Ident(ident) = &spec.orig {
                            if let Some(id) =
                                self.symbols.lookup(&ident.sym, self.current, &self.scopes)
                            {
                                self.symbols.mark_exported(id);
                                self.symbols.add_read(id, ident.span);
                            }
                        }
                    }
                }
            }
            ModuleDecl::ExportDefaultDecl(export) => match &export.decl {
                DefaultDecl::Fn(fn_expr) => {
                    if let Some(ident) = &fn_expr.ident {
                        self.declare(&ident.sym, SymbolKind::Function, ident.span, true);
                    }
                    self.visit_function(&fn_expr.function);
                }
                DefaultDecl::Class(class_expr) => {
                    if let Some(ident) = &class_expr.ident {
                        self.declare(&ident.sym, SymbolKind::Class, ident.span, true);
                    }
                    self.visit_class(&class_expr.class);
                }
                DefaultDecl::TsInterfaceDecl(_) => {}
            },
            ModuleDecl::ExportDefaultExpr(export) => self.visit_expr(&export.expr),
            _ => {}
        }
    }

    fn visit_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Decl(decl) => self.visit_decl(decl, false),
            Stmt::Block(block) => self.visit_block_in_new_scope(block, ScopeKind::Block),
            Stmt::If(if_stmt) => {
                self.visit_expr(&if_stmt.test);
                self.visit_stmt(&if_stmt.cons);
                if let Some(alt) = &if_stmt.alt {
                    self.visit_stmt(alt);
                }
            }
            Stmt::While(while_stmt) => {
                self.visit_expr(&while_stmt.test);
                self.visit_stmt(&while_stmt.body);
            }
            Stmt::DoWhile(do_while) => {
                self.visit_stmt(&do_while.body);
                self.visit_expr(&do_while.test);
            }
            Stmt::For(for_stmt) => {
                let parent = self.current;
                self.current = self.scopes.create_scope(ScopeKind::For, Some(parent), for_stmt.span);

                match &for_stmt.init {
                    Some(VarDeclOrExpr::VarDecl(var_decl)) => self.visit_var_decl(var_decl, false),
                    Some(VarDeclOrExpr::Expr(expr)) => self.visit_expr(expr),
                    None => {}
                }
                if let Some(test) = &for_stmt.test {
                    self.visit_expr(test);
                }
                if let Some(update) = &for_stmt.update {
                    self.visit_expr(update);
                }
                self.visit_stmt(&for_stmt.body);

                self.current = parent;
            }
            Stmt::ForIn(for_in) => {
                self.visit_for_head(&for_in.left, for_in.span, &for_in.right, &for_in.body)
            }
            Stmt::ForOf(for_of) => {
                self.visit_for_head(&for_of.left, for_of.span, &for_of.right, &for_of.body)
            }
            Stmt::Switch(switch_stmt) => {
                self.visit_expr(&switch_stmt.discriminant);
                let parent = self.current;
                self.current =
                    self.scopes
                        .create_scope(ScopeKind::Switch, Some(parent), switch_stmt.span);
                for case in &switch_stmt.cases {
                    if let Some(test) = &case.test {
                        self.visit_expr(test);
                    }
                    for stmt in &case.cons {
                        self.visit_stmt(stmt);
                    }
                }
                self.current = parent;
            }
            Stmt::Try(try_stmt) => {
                self.visit_block_in_new_scope(&try_stmt.block, ScopeKind::Block);
                if let Some(handler) = &try_stmt.handler {
                    self.visit_catch_clause(handler);
                }
                if let Some(finalizer) = &try_stmt.finalizer {
                    self.visit_block_in_new_scope(finalizer, ScopeKind::Block);
                }
            }
            Stmt::Labeled(labeled) => self.visit_stmt(&labeled.body),
            Stmt::With(with_stmt) => {
                self.visit_expr(&with_stmt.obj);
                self.visit_stmt(&with_stmt.body);
            }
            Stmt::Return(ret) => {
                if let Some(arg) = &ret.arg {
                    self.visit_expr(arg);
                }
            }
            Stmt::Throw(throw) => self.visit_expr(&throw.arg),
            Stmt::Expr(expr_stmt) => self.visit_expr(&expr_stmt.expr),
            _ => {}
        }
    }

    fn visit_for_head(&mut self, left: &ForHead, span: swc_common::Span, right: &Expr, body: &Stmt) {
        let parent = self.current;
        self.current = self.scopes.create_scope(ScopeKind::For, Some(parent), span);

        match left {
            ForHead::VarDecl(var_decl) => self.visit_var_decl(var_decl, false),
            ForHead::Pat(pat) => self.visit_pat_write(pat),
            ForHead::UsingDecl(_) => {}
        }
        self.visit_expr(right);
        self.visit_stmt(body);

        self.current = parent;
    }

    fn visit_decl(&mut self, decl: &Decl, is_exported: bool) {
        match decl {
            Decl::Var(var_decl) => self.visit_var_decl(var_decl, is_exported),
            Decl::Fn(fn_decl) => {
                self.declare(
                    &fn_decl.ident.sym,
                    SymbolKind::Function,
                    fn_decl.ident.span,
                    is_exported,
                );
                self.visit_function(&fn_decl.function);
            }
            Decl::Class(class_decl) => {
                self.declare(
                    &class_decl.ident.sym,
                    SymbolKind::Class,
                    class_decl.ident.span,
                    is_exported,
                );
                self.visit_class(&class_decl.class);
            }
            _ => {}
        }
    }

    fn visit_var_decl(&mut self, var_decl: &VarDecl, is_exported: bool) {
        let kind = match var_decl.kind {
            VarDeclKind::Var => SymbolKind::Var,
            VarDeclKind::Let => SymbolKind::Let,
            VarDeclKind::Const => SymbolKind::Const,
        };

        for declarator in &var_decl.decls {
            self.declare_pat(&declarator.name, kind, is_exported);
            if let Some(init) = &declarator.init {
                self.visit_expr(init);
            }
        }
    }

    fn visit_function(&mut self, func: &Function) {
        let span = func.body.as_ref().map(|b| b.span).unwrap_or(func.span);
        let parent = self.current;
        self.current = self.scopes.create_scope(ScopeKind::Function, Some(parent), span);

        for param in &func.params {
            self.declare_pat(&param.pat, SymbolKind::Parameter, false);
        }
        if let Some(body) = &func.body {
            for stmt in &body.stmts {
                self.visit_stmt(stmt);
            }
        }

        self.current = parent;
    }

    fn visit_arrow(&mut self, arrow: &ArrowExpr) {
        let span = match &*arrow.body {
            BlockStmtOrExpr::BlockStmt(block) => block.span,
            BlockStmtOrExpr::Expr(expr) => expr.span(),
        };
        let parent = self.current;
        self.current = self.scopes.create_scope(ScopeKind::Function, Some(parent), span);

        for param in &arrow.params {
            self.declare_pat(param, SymbolKind::Parameter, false);
        }
        match &*arrow.body {
            BlockStmtOrExpr::BlockStmt(block) => {
                for stmt in &block.stmts {
                    self.visit_stmt(stmt);
                }
            }
            BlockStmtOrExpr::Expr(expr) => self.visit_expr(expr),
        }

        self.current = parent;
    }

    fn visit_class(&mut self, class: &Class) {
        let parent = self.current;
        self.current = self.scopes.create_scope(ScopeKind::Class, Some(parent), class.span);

        for member in &class.body {
            match member {
                ClassMember::Method(method) => self.visit_function(&method.function),
                ClassMember::PrivateMethod(method) => self.visit_function(&method.function),
                ClassMember::Constructor(ctor) => {
                    let ctor_parent = self.current;
                    self.current =
                        self.scopes
                            .create_scope(ScopeKind::Function, Some(ctor_parent), ctor.span);

                    for param in &ctor.params {
                        match param {
                            swc_ecma_ast::ParamOrTsParamProp::Param(p) => {
                                self.declare_pat(&p.pat, SymbolKind::Parameter, false);
                            }
                            swc_ecma_ast::ParamOrTsParamProp::TsParamProp(prop) => {
                                if let swc_ecma_ast::TsParamPropParam::Ident(ident) = &prop.param {
                                    self.declare(
                                        &ident.id.sym,
                                        SymbolKind::Parameter,
                                        ident.id.span,
                                        false,
                                    );
                                }
                            }
                        }
                    }
                    if let Some(body) = &ctor.body {
                        for stmt in &body.stmts {
                            self.visit_stmt(stmt);
                        }
                    }

                    self.current = ctor_parent;
                }
                ClassMember::ClassProp(prop) => {
                    if let Some(value) = &prop.value {
                        self.visit_expr(value);
                    }
                }
                ClassMember::StaticBlock(block) => {
                    self.visit_block_in_new_scope(&block.body, ScopeKind::Block)
                }
                _ => {}
            }
        }

        self.current = parent;
    }

    fn visit_block_in_new_scope(&mut self, block: &BlockStmt, kind: ScopeKind) {
        let parent = self.current;
        self.current = self.scopes.create_scope(kind, Some(parent), block.span);

        for stmt in &block.stmts {
            self.visit_stmt(stmt);
        }

        self.current = parent;
    }

    fn visit_catch_clause(&mut self, catch: &CatchClause) {
        let parent = self.current;
        self.current = self.scopes.create_scope(ScopeKind::Catch, Some(parent), catch.span);

        if let Some(param) = &catch.param {
            self.declare_pat(param, SymbolKind::Parameter, false);
        }
        for stmt in &catch.body.stmts {
            self.visit_stmt(stmt);
        }

        self.current = parent;
    }

    fn visit_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Ident(ident) => self.reference_read(ident),
            Expr::Assign(assign) => {
                match &assign.left {
                    swc_ecma_ast::AssignTarget::Simple(SimpleAssignTarget::Ident(ident)) => {
                        self.reference_write(&ident.id);
                        // Compound assignment reads the old value too.
                        if assign.op != swc_ecma_ast::AssignOp::Assign {
                            self.reference_read(&ident.id);
                        }
                    }
                    swc_ecma_ast::AssignTarget::Simple(SimpleAssignTarget::Member(member)) => {
                        self.visit_expr(&member.obj);
                        if let swc_ecma_ast::MemberProp::Computed(computed) = &member.prop {
                            self.visit_expr(&computed.expr);
                        }
                    }
                    swc_ecma_ast::AssignTarget::Pat(pat) => match pat {
                        swc_ecma_ast::AssignTargetPat::Array(array) => {
                            self.visit_pat_write(&Pat::Array(array.clone()))
                        }
                        swc_ecma_ast::AssignTargetPat::Object(object) => {
                            self.visit_pat_write(&Pat::Object(object.clone()))
                        }
                        swc_ecma_ast::AssignTargetPat::Invalid(_) => {}
                    },
                    _ => {}
                }
                self.visit_expr(&assign.right);
            }
            Expr::Update(update) => {
                // ++x reads the current value and writes a new one.
                if let Expr::Ident(ident) = &*update.arg {
                    self.reference_read(ident);
                    self.reference_write(ident);
                } else {
                    self.visit_expr(&update.arg);
                }
            }
            Expr::Bin(bin) => {
                self.visit_expr(&bin.left);
                self.visit_expr(&bin.right);
            }
            Expr::Unary(unary) => self.visit_expr(&unary.arg),
            Expr::Cond(cond) => {
                self.visit_expr(&cond.test);
                self.visit_expr(&cond.cons);
                self.visit_expr(&cond.alt);
            }
            Expr::Call(call) => {
                if let Some(callee) = call.callee.as_expr() {
                    self.visit_expr(callee);
                }
                for arg in &call.args {
                    self.visit_expr(&arg.expr);
                }
            }
            Expr::New(new_expr) => {
                self.visit_expr(&new_expr.callee);
                if let Some(args) = &new_expr.args {
                    for arg in args {
                        self.visit_expr(&arg.expr);
                    }
                }
            }
            Expr::Member(member) => {
                self.visit_expr(&member.obj);
                if let swc_ecma_ast::MemberProp::Computed(computed) = &member.prop {
                    self.visit_expr(&computed.expr);
                }
            }
            Expr::OptChain(opt) => match &*opt.base {
                swc_ecma_ast::OptChainBase::Member(member) => {
                    self.visit_expr(&member.obj);
                    if let swc_ecma_ast::MemberProp::Computed(computed) = &member.prop {
                        self.visit_expr(&computed.expr);
                    }
                }
                swc_ecma_ast::OptChainBase::Call(call) => {
                    self.visit_expr(&call.callee);
                    for arg in &call.args {
                        self.visit_expr(&arg.expr);
                    }
                }
            },
            Expr::Array(array) => {
                for elem in array.elems.iter().flatten() {
                    self.visit_expr(&elem.expr);
                }
            }
            Expr::Object(object) => {
                for prop in &object.props {
                    match prop {
                        PropOrSpread::Spread(spread) => self.visit_expr(&spread.expr),
                        PropOrSpread::Prop(prop) => match prop.as_ref() {
                            // `{ x }` is a read of the binding `x`.
                            Prop::Shorthand(ident) => self.reference_read(ident),
                            Prop::KeyValue(kv) => self.visit_expr(&kv.value),
                            Prop::Method(method) => self.visit_function(&method.function),
                            Prop::Getter(getter) => {
                                if let Some(body) = &getter.body {
                                    self.visit_block_in_new_scope(body, ScopeKind::Function);
                                }
                            }
                            Prop::Setter(setter) => {
                                let parent = self.current;
                                self.current = self.scopes.create_scope(
                                    ScopeKind::Function,
                                    Some(parent),
                                    setter.span,
                                );
                                self.declare_pat(&setter.param, SymbolKind::Parameter, false);
                                if let Some(body) = &setter.body {
                                    for stmt in &body.stmts {
                                        self.visit_stmt(stmt);
                                    }
                                }
                                self.current = parent;
                            }
                            Prop::Assign(assign) => self.visit_expr(&assign.value),
                        },
                    }
                }
            }
            Expr::Paren(paren) => self.visit_expr(&paren.expr),
            Expr::Seq(seq) => {
                for expr in &seq.exprs {
                    self.visit_expr(expr);
                }
            }
            Expr::Tpl(tpl) => {
                for expr in &tpl.exprs {
                    self.visit_expr(expr);
                }
            }
            Expr::TaggedTpl(tagged) => {
                self.visit_expr(&tagged.tag);
                for expr in &tagged.tpl.exprs {
                    self.visit_expr(expr);
                }
            }
            Expr::Await(await_expr) => self.visit_expr(&await_expr.arg),
            Expr::Yield(yield_expr) => {
                if let Some(arg) = &yield_expr.arg {
                    self.visit_expr(arg);
                }
            }
            Expr::Arrow(arrow) => self.visit_arrow(arrow),
            Expr::Fn(fn_expr) => self.visit_function(&fn_expr.function),
            Expr::Class(class_expr) => self.visit_class(&class_expr.class),
            Expr::TsAs(as_expr) => self.visit_expr(&as_expr.expr),
            Expr::TsNonNull(non_null) => self.visit_expr(&non_null.expr),
            Expr::TsTypeAssertion(assertion) => self.visit_expr(&assertion.expr),
            Expr::TsConstAssertion(assertion) => self.visit_expr(&assertion.expr),
            Expr::TsSatisfies(satisfies) => self.visit_expr(&satisfies.expr),
            Expr::JSXElement(element) => self.visit_jsx_element(element),
            Expr::JSXFragment(fragment) => {
                for child in &fragment.children {
                    self.visit_jsx_child(child);
                }
            }
            _ => {}
        }
    }

    fn visit_jsx_element(&mut self, element: &swc_ecma_ast::JSXElement) {
        // `<Foo />` reads the component binding.
        if let swc_ecma_ast::JSXElementName::Ident(ident) = &element.opening.name {
            if ident.sym.chars().next().is_some_and(|c| c.is_uppercase()) {
                self.reference_read(ident);
            }
        }
        for attr in &element.opening.attrs {
            match attr {
                swc_ecma_ast::JSXAttrOrSpread::JSXAttr(attr) => {
                    if let Some(swc_ecma_ast::JSXAttrValue::JSXExprContainer(container)) =
                        &attr.value
                    {
                        if let swc_ecma_ast::JSXExpr::Expr(expr) = &container.expr {
                            self.visit_expr(expr);
                        }
                    }
                }
                swc_ecma_ast::JSXAttrOrSpread::SpreadElement(spread) => {
                    self.visit_expr(&spread.expr)
                }
            }
        }
        for child in &element.children {
            self.visit_jsx_child(child);
        }
    }

    fn visit_jsx_child(&mut self, child: &swc_ecma_ast::JSXElementChild) {
        match child {
            swc_ecma_ast::JSXElementChild::JSXExprContainer(container) => {
                if let swc_ecma_ast::JSXExpr::Expr(expr) = &container.expr {
                    self.visit_expr(expr);
                }
            }
            swc_ecma_ast::JSXElementChild::JSXElement(element) => self.visit_jsx_element(element),
            swc_ecma_ast::JSXElementChild::JSXFragment(fragment) => {
                for child in &fragment.children {
                    self.visit_jsx_child(child);
                }
            }
            _ => {}
        }
    }

    /// Destructuring in assignment position: every bound ident is a write.
    fn visit_pat_write(&mut self, pat: &Pat) {
        match pat {
            Pat::Ident(binding) => self.reference_write(&binding.id),
            Pat::Array(array) => {
                for elem in array.elems.iter().flatten() {
                    self.visit_pat_write(elem);
                }
            }
            Pat::Object(object) => {
                for prop in &object.props {
                    match prop {
                        ObjectPatProp::KeyValue(kv) => self.visit_pat_write(&kv.value),
                        ObjectPatProp::Assign(assign) => {
                            self.reference_write(&assign.key.id);
                            if let Some(value) = &assign.value {
                                self.visit_expr(value);
                            }
                        }
                        ObjectPatProp::Rest(rest) => self.visit_pat_write(&rest.arg),
                    }
                }
            }
            Pat::Rest(rest) => self.visit_pat_write(&rest.arg),
            Pat::Assign(assign) => {
                self.visit_pat_write(&assign.left);
                self.visit_expr(&assign.right);
            }
            Pat::Expr(expr) => self.visit_expr(expr),
            Pat::Invalid(_) => {}
        }
    }

    fn declare_pat(&mut self, pat: &Pat, kind: SymbolKind, is_exported: bool) {
        match pat {
            Pat::Ident(binding) => {
                self.declare(&binding.id.sym, kind, binding.id.span, is_exported)
            }
            Pat::Array(array) => {
                for elem in array.elems.iter().flatten() {
                    self.declare_pat(elem, kind, is_exported);
                }
            }
            Pat::Object(object) => {
                for prop in &object.props {
                    match prop {
                        ObjectPatProp::KeyValue(kv) => self.declare_pat(&kv.value, kind, is_exported),
                        ObjectPatProp::Assign(assign) => {
                            self.declare(&assign.key.id.sym, kind, assign.key.id.span, is_exported);
                            if let Some(value) = &assign.value {
                                self.visit_expr(value);
                            }
                        }
                        ObjectPatProp::Rest(rest) => self.declare_pat(&rest.arg, kind, is_exported),
                    }
                }
            }
            Pat::Rest(rest) => self.declare_pat(&rest.arg, kind, is_exported),
            Pat::Assign(assign) => {
                self.declare_pat(&assign.left, kind, is_exported);
                self.visit_expr(&assign.right);
            }
            Pat::Invalid(_) | Pat::Expr(_) => {}
        }
    }

    fn declare(&mut self, name: &str, kind: SymbolKind, span: swc_common::Span, is_exported: bool) {
        let scope = if kind == SymbolKind::Var {
            self.scopes.hoisting_scope(self.current)
        } else {
            self.current
        };
        self.symbols.declare(name, kind, scope, span, is_exported);
    }

    fn reference_read(&mut self, ident: &Ident) {
        if let Some(id) = self.symbols.lookup(&ident.sym, self.current, &self.scopes) {
            self.symbols.add_read(id, ident.span);
        }
    }

    fn reference_write(&mut self, ident: &Ident) {
        if let Some(id) = self.symbols.lookup(&ident.sym, self.current, &self.scopes) {
            self.symbols.add_write(id, ident.span);
        }
    }
}
