//! Scope tree for nested program scopes.

use id_arena::{Arena, Id};
use swc_common::Span;

pub type ScopeId = Id<Scope>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Module,
    Function,
    Block,
    For,
    Switch,
    Catch,
    Class,
}

#[derive(Debug)]
pub struct Scope {
    pub id: ScopeId,
    pub kind: ScopeKind,
    pub parent: Option<ScopeId>,
    pub children: Vec<ScopeId>,
    pub span: Span,
}

pub struct ScopeTree {
    arena: Arena<Scope>,
    root: Option<ScopeId>,
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeTree {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    pub fn create_scope(&mut self, kind: ScopeKind, parent: Option<ScopeId>, span: Span) -> ScopeId {
        let id = self.arena.alloc_with_id(|id| Scope {
            id,
            kind,
            parent,
            children: Vec::new(),
            span,
        });

        if let Some(parent_id) = parent {
            self.arena[parent_id].children.push(id);
        }
        if self.root.is_none() {
            self.root = Some(id);
        }

        id
    }

    pub fn root(&self) -> Option<ScopeId> {
        self.root
    }

    pub fn get(&self, id: ScopeId) -> &Scope {
        &self.arena[id]
    }

    pub fn ancestors(&self, id: ScopeId) -> impl Iterator<Item = &Scope> {
        let mut current = Some(id);
        std::iter::from_fn(move || {
            let scope = &self.arena[current?];
            current = scope.parent;
            Some(scope)
        })
    }

    /// Nearest enclosing scope (inclusive) a `var` declaration hoists to.
    pub fn hoisting_scope(&self, from: ScopeId) -> ScopeId {
        self.ancestors(from)
            .find(|s| matches!(s.kind, ScopeKind::Module | ScopeKind::Function))
            .map(|s| s.id)
            .unwrap_or(from)
    }
}
