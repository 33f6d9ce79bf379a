//! Argus core — a TypeScript/JavaScript static-analysis engine.
//!
//! The engine accepts a set of input files plus an optional project
//! `tsconfig.json`, parses each file into a syntax model, evaluates an
//! independent rule catalog against the models, and returns a
//! deterministic, ordered set of located issues together with the files
//! that failed to parse.
//!
//! ```no_run
//! use argus_core::analysis::{AnalysisEngine, AnalysisRequest};
//! use argus_core::input::InputFile;
//!
//! let engine = AnalysisEngine::new();
//! let request = AnalysisRequest::new(
//!     "/path/to/project",
//!     std::env::temp_dir(),
//!     vec![InputFile::new("/path/to/project/src/index.ts")],
//! );
//! let result = engine.analyze(&request).unwrap();
//! for issue in &result.issues {
//!     println!("{}:{} [{}] {}", issue.file, issue.line, issue.rule_key, issue.message);
//! }
//! ```

pub mod analysis;
pub mod config;
pub mod diagnostic;
pub mod input;
pub mod parser;
pub mod rules;
pub mod semantic;
pub mod tsconfig;
pub mod visitor;

pub use analysis::{AnalysisEngine, AnalysisRequest, AnalysisResult, AnalysisSettings, SessionError};
pub use diagnostic::Issue;
pub use input::InputFile;
pub use rules::{Rule, RuleRegistry, Severity};
