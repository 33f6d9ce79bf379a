//! Scope and symbol analysis shared by scope-aware rules.

mod builder;
pub mod scope;
pub mod symbols;

pub use builder::SemanticModel;
