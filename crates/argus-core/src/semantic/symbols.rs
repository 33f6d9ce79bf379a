//! Symbol table with read/write reference tracking.
//!
//! Declarations are stored per scope; references resolve through the
//! scope chain and are recorded as reads or writes, which is what
//! dead-store detection needs.

use std::collections::HashMap;

use id_arena::{Arena, Id};
use swc_common::Span;

use super::scope::{ScopeId, ScopeTree};

pub type SymbolId = Id<Symbol>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Var,
    Let,
    Const,
    Function,
    Class,
    Parameter,
    Import,
}

#[derive(Debug)]
pub struct Symbol {
    pub id: SymbolId,
    pub name: String,
    pub kind: SymbolKind,
    pub scope: ScopeId,
    pub span: Span,
    pub is_exported: bool,
    pub reads: Vec<Span>,
    pub writes: Vec<Span>,
}

impl Symbol {
    pub fn is_never_used(&self) -> bool {
        self.reads.is_empty() && self.writes.is_empty()
    }

    pub fn is_write_only(&self) -> bool {
        self.reads.is_empty() && !self.writes.is_empty()
    }
}

pub struct SymbolTable {
    arena: Arena<Symbol>,
    by_scope: HashMap<ScopeId, HashMap<String, SymbolId>>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            by_scope: HashMap::new(),
        }
    }

    pub fn declare(
        &mut self,
        name: &str,
        kind: SymbolKind,
        scope: ScopeId,
        span: Span,
        is_exported: bool,
    ) -> SymbolId {
        let id = self.arena.alloc_with_id(|id| Symbol {
            id,
            name: name.to_string(),
            kind,
            scope,
            span,
            is_exported,
            reads: Vec::new(),
            writes: Vec::new(),
        });

        self.by_scope
            .entry(scope)
            .or_default()
            .insert(name.to_string(), id);

        id
    }

    pub fn lookup(&self, name: &str, scope: ScopeId, tree: &ScopeTree) -> Option<SymbolId> {
        tree.ancestors(scope)
            .find_map(|s| self.by_scope.get(&s.id)?.get(name).copied())
    }

    pub fn get(&self, id: SymbolId) -> &Symbol {
        &self.arena[id]
    }

    pub fn add_read(&mut self, id: SymbolId, span: Span) {
        self.arena[id].reads.push(span);
    }

    pub fn add_write(&mut self, id: SymbolId, span: Span) {
        self.arena[id].writes.push(span);
    }

    pub fn mark_exported(&mut self, id: SymbolId) {
        self.arena[id].is_exported = true;
    }

    pub fn all_symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.arena.iter().map(|(_, s)| s)
    }
}
