//! Analysis engine and session orchestration.
//!
//! [`AnalysisEngine`] is the long-lived handle: it owns the rule
//! registry and is shared across invocations. Each [`analyze`] call runs
//! one single-use session over a fixed file set: resolve the project
//! context once, parse every file independently, dispatch rules over the
//! files that parsed, aggregate. Per-file failures never abort the
//! session; only a structurally invalid invocation does.
//!
//! [`analyze`]: AnalysisEngine::analyze

use std::collections::HashMap;
use std::path::PathBuf;

use rayon::prelude::*;
use tracing::{info, warn};

use crate::config::Config;
use crate::diagnostic::Issue;
use crate::input::InputFile;
use crate::parser::ParsedFile;
use crate::rules::RuleRegistry;
use crate::rules::bugs::{ConditionAssignment, ConstantCondition, SelfAssignment};
use crate::rules::smells::{EmptyNestedBlock, MaxNestingDepth, StrictEquality, UnusedLocals};
use crate::tsconfig::{self, ResolvedTsConfig};

/// Structurally invalid invocation; fatal to the session, unlike any
/// per-file outcome.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("project root '{}' is not a readable directory", path.display())]
    InvalidProjectRoot { path: PathBuf },
}

/// Recognized settings of one analysis invocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisSettings {
    /// Relative path to an explicit `tsconfig.json`; selects the
    /// explicit resolution branch when set.
    pub tsconfig_path: Option<PathBuf>,
}

impl AnalysisSettings {
    pub const TSCONFIG_PATH: &'static str = "tsconfigPath";

    /// Build settings from a string map; unrecognized keys are ignored.
    pub fn from_map(map: &HashMap<String, String>) -> Self {
        Self {
            tsconfig_path: map.get(Self::TSCONFIG_PATH).map(PathBuf::from),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    pub project_root: PathBuf,
    /// Scratch directory for transient artifacts; never part of the result.
    pub work_dir: PathBuf,
    pub files: Vec<InputFile>,
    pub settings: AnalysisSettings,
}

impl AnalysisRequest {
    pub fn new(
        project_root: impl Into<PathBuf>,
        work_dir: impl Into<PathBuf>,
        files: Vec<InputFile>,
    ) -> Self {
        Self {
            project_root: project_root.into(),
            work_dir: work_dir.into(),
            files,
            settings: AnalysisSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: AnalysisSettings) -> Self {
        self.settings = settings;
        self
    }
}

/// Outcome of one session. Every input file either was eligible to
/// contribute issues or appears in `failed_files` — never both.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    pub issues: Vec<Issue>,
    pub failed_files: Vec<InputFile>,
}

impl AnalysisResult {
    pub fn is_failed(&self, path: &std::path::Path) -> bool {
        self.failed_files.iter().any(|f| f.path() == path)
    }
}

/// Long-lived engine handle. Cheap to share; all mutable state is per
/// session.
pub struct AnalysisEngine {
    registry: RuleRegistry,
}

impl AnalysisEngine {
    pub fn new() -> Self {
        info!("Argus engine started");
        Self {
            registry: default_registry(),
        }
    }

    pub fn with_config(config: &Config) -> Self {
        info!("Argus engine started");
        let mut registry = default_registry();
        registry.configure(&config.rules);
        Self { registry }
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Run one analysis session. Blocking; returns one result.
    pub fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, SessionError> {
        Session {
            registry: &self.registry,
            request,
        }
        .run()
    }

    /// Like [`analyze`], additionally invoking `sink` exactly once per
    /// issue of the final sequence, in the same order.
    ///
    /// [`analyze`]: AnalysisEngine::analyze
    pub fn analyze_with_sink(
        &self,
        request: &AnalysisRequest,
        mut sink: impl FnMut(&Issue),
    ) -> Result<AnalysisResult, SessionError> {
        let result = self.analyze(request)?;
        for issue in &result.issues {
            sink(issue);
        }
        Ok(result)
    }
}

impl Default for AnalysisEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn default_registry() -> RuleRegistry {
    let mut registry = RuleRegistry::new();

    registry.register(Box::new(ConditionAssignment::new()));
    registry.register(Box::new(ConstantCondition::new()));
    registry.register(Box::new(SelfAssignment::new()));
    registry.register(Box::new(UnusedLocals::new()));
    registry.register(Box::new(EmptyNestedBlock::new()));
    registry.register(Box::new(MaxNestingDepth::new()));
    registry.register(Box::new(StrictEquality::new()));

    registry
}

/// One invocation. Consumed by [`Session::run`] — a session cannot be
/// re-entered or reused.
struct Session<'a> {
    registry: &'a RuleRegistry,
    request: &'a AnalysisRequest,
}

enum FileOutcome {
    Analyzed(Vec<Issue>),
    Failed(InputFile),
}

impl Session<'_> {
    fn run(self) -> Result<AnalysisResult, SessionError> {
        let root = &self.request.project_root;
        if !root.is_dir() {
            return Err(SessionError::InvalidProjectRoot { path: root.clone() });
        }

        info!(
            "Started analysis of {} file(s) in '{}'",
            self.request.files.len(),
            root.display()
        );

        let resolved = tsconfig::resolve(root, self.request.settings.tsconfig_path.as_deref());

        // Files are independent; parse and dispatch in parallel, with
        // input order restored by the indexed collect.
        let outcomes: Vec<FileOutcome> = self
            .request
            .files
            .par_iter()
            .map(|file| self.process_file(file, &resolved))
            .collect();

        Ok(aggregate(outcomes))
    }

    fn process_file(&self, file: &InputFile, resolved: &ResolvedTsConfig) -> FileOutcome {
        let source = match file.contents() {
            Ok(source) => source,
            Err(e) => {
                warn!("failed to read '{}': {e}", file.path().display());
                return FileOutcome::Failed(file.clone());
            }
        };

        let filename = file.path().display().to_string();
        let parsed = ParsedFile::from_source_with_options(
            &filename,
            &source,
            &resolved.config.compiler_options,
        );

        if !parsed.is_valid() {
            warn!(
                "failed to analyze '{}': {} syntax error(s)",
                filename,
                parsed.errors().len()
            );
            return FileOutcome::Failed(file.clone());
        }

        FileOutcome::Analyzed(self.registry.run_all(&parsed, &resolved.config))
    }
}

fn aggregate(outcomes: Vec<FileOutcome>) -> AnalysisResult {
    let mut issues = Vec::new();
    let mut failed_files = Vec::new();

    for outcome in outcomes {
        match outcome {
            FileOutcome::Analyzed(mut found) => issues.append(&mut found),
            FileOutcome::Failed(file) => failed_files.push(file),
        }
    }

    AnalysisResult {
        issues,
        failed_files,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_with(dir: &std::path::Path, files: Vec<InputFile>) -> AnalysisRequest {
        AnalysisRequest::new(dir, std::env::temp_dir(), files)
    }

    fn input(dir: &std::path::Path, name: &str, contents: &str) -> InputFile {
        InputFile::new(dir.join(name)).with_contents(contents)
    }

    #[test]
    fn valid_file_contributes_issues() {
        let dir = tempfile::tempdir().unwrap();
        let engine = AnalysisEngine::new();
        let request = request_with(
            dir.path(),
            vec![input(dir.path(), "a.ts", "function f(x: number) { if (x == 1) {} }")],
        );

        let result = engine.analyze(&request).unwrap();

        assert!(result.failed_files.is_empty());
        assert!(result.issues.iter().any(|i| i.rule_key == "C004"));
        assert!(result.issues.iter().any(|i| i.rule_key == "C002"));
    }

    #[test]
    fn invalid_project_root_is_a_session_error() {
        let engine = AnalysisEngine::new();
        let request = request_with(std::path::Path::new("/definitely/not/here"), vec![]);

        let err = engine.analyze(&request).unwrap_err();

        assert!(matches!(err, SessionError::InvalidProjectRoot { .. }));
    }

    #[test]
    fn parse_failure_lands_in_failed_files_only() {
        let dir = tempfile::tempdir().unwrap();
        let engine = AnalysisEngine::new();
        let request = request_with(
            dir.path(),
            vec![input(dir.path(), "broken.ts", "const = ;")],
        );

        let result = engine.analyze(&request).unwrap();

        assert!(result.issues.is_empty());
        assert_eq!(result.failed_files.len(), 1);
        assert!(result.is_failed(&dir.path().join("broken.ts")));
    }

    #[test]
    fn unreadable_file_lands_in_failed_files() {
        let dir = tempfile::tempdir().unwrap();
        let engine = AnalysisEngine::new();
        // No in-memory contents and nothing on disk.
        let request = request_with(dir.path(), vec![InputFile::new(dir.path().join("gone.ts"))]);

        let result = engine.analyze(&request).unwrap();

        assert_eq!(result.failed_files.len(), 1);
    }

    #[test]
    fn issues_keep_input_file_order() {
        let dir = tempfile::tempdir().unwrap();
        let engine = AnalysisEngine::new();
        let request = request_with(
            dir.path(),
            vec![
                input(dir.path(), "first.ts", "function f(a: number) { return a == 1; }"),
                input(dir.path(), "second.ts", "function g(b: number) { return b == 2; }"),
            ],
        );

        let result = engine.analyze(&request).unwrap();

        let files: Vec<&str> = result.issues.iter().map(|i| i.file.as_str()).collect();
        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("first.ts"));
        assert!(files[1].ends_with("second.ts"));
    }

    #[test]
    fn sink_sees_every_issue_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let engine = AnalysisEngine::new();
        let request = request_with(
            dir.path(),
            vec![input(
                dir.path(),
                "a.ts",
                "function f(x: number, y: number) { if (x == 1) {} if (y == 2) {} }",
            )],
        );

        let mut seen = Vec::new();
        let result = engine
            .analyze_with_sink(&request, |issue| seen.push(issue.clone()))
            .unwrap();

        assert_eq!(seen, result.issues);
    }

    #[test]
    fn with_config_disables_rules() {
        let dir = tempfile::tempdir().unwrap();
        let config: Config = toml::from_str(
            r#"
[rules]
disabled = ["C004"]
"#,
        )
        .unwrap();
        let engine = AnalysisEngine::with_config(&config);
        let request = request_with(
            dir.path(),
            vec![input(dir.path(), "a.ts", "function f(x: number) { return x == 1; }")],
        );

        let result = engine.analyze(&request).unwrap();

        assert!(result.issues.iter().all(|i| i.rule_key != "C004"));
    }

    #[test]
    fn settings_from_map_reads_tsconfig_path() {
        let map = HashMap::from([
            ("tsconfigPath".to_string(), "tsconfig.custom.json".to_string()),
            ("unrelated".to_string(), "x".to_string()),
        ]);

        let settings = AnalysisSettings::from_map(&map);

        assert_eq!(
            settings.tsconfig_path,
            Some(PathBuf::from("tsconfig.custom.json"))
        );
    }

    #[test]
    fn repeated_runs_are_identical() {
        let dir = tempfile::tempdir().unwrap();
        let engine = AnalysisEngine::new();
        let request = request_with(
            dir.path(),
            vec![
                input(
                    dir.path(),
                    "a.ts",
                    "function foo() {\n    let x = 4; \n    if (x = 5) {}\n}",
                ),
                input(dir.path(), "b.ts", "const broken = ;"),
            ],
        );

        let first = engine.analyze(&request).unwrap();
        let second = engine.analyze(&request).unwrap();

        assert_eq!(first, second);
    }
}
