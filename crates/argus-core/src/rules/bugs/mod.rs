//! Bug rules: patterns that are wrong at runtime, not just untidy.

mod condition_assignment;
mod constant_condition;
mod self_assignment;

pub use condition_assignment::ConditionAssignment;
pub use constant_condition::ConstantCondition;
pub use self_assignment::SelfAssignment;
