//! Check command - analyzes TypeScript/JavaScript sources for issues.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, ValueEnum};
use walkdir::WalkDir;

use argus_core::analysis::{AnalysisEngine, AnalysisRequest, AnalysisSettings};
use argus_core::config::load_config_or_default;
use argus_core::input::InputFile;
use argus_core::rules::Severity;

use crate::output;

const ANALYZABLE_EXTENSIONS: &[&str] = &["ts", "mts", "cts", "tsx", "js", "mjs", "cjs", "jsx"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Pretty,
    Json,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// File or directory to analyze
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Output format for issues
    #[arg(short, long, value_enum, default_value = "pretty")]
    pub format: OutputFormat,

    /// Explicit tsconfig.json path, relative to the project root
    #[arg(long, value_name = "PATH")]
    pub tsconfig: Option<PathBuf>,

    /// Exit with code 1 on warnings, not just errors
    #[arg(long)]
    pub fail_on_warnings: bool,
}

impl CheckArgs {
    pub fn run(&self) -> anyhow::Result<i32> {
        let path = self
            .path
            .canonicalize()
            .with_context(|| format!("cannot access '{}'", self.path.display()))?;

        let project_root = if path.is_dir() {
            path.clone()
        } else {
            path.parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."))
        };

        let files = collect_input_files(&path);
        anyhow::ensure!(!files.is_empty(), "no analyzable files under '{}'", path.display());
        tracing::debug!("analyzing {} file(s) under '{}'", files.len(), path.display());

        let config = load_config_or_default(&project_root);
        let engine = AnalysisEngine::with_config(&config);

        let request = AnalysisRequest::new(&project_root, std::env::temp_dir(), files)
            .with_settings(AnalysisSettings {
                tsconfig_path: self.tsconfig.clone(),
            });

        let result = engine
            .analyze(&request)
            .context("analysis session failed")?;

        match self.format {
            OutputFormat::Pretty => output::pretty::print(&result),
            OutputFormat::Json => output::json::print(&result)?,
        }

        Ok(exit_code(&result, self.fail_on_warnings))
    }
}

/// Every analyzable source file under `path`, in a stable order.
/// `node_modules` and hidden directories are skipped.
fn collect_input_files(path: &Path) -> Vec<InputFile> {
    if path.is_file() {
        return vec![InputFile::new(path)];
    }

    WalkDir::new(path)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            let name = entry.file_name().to_string_lossy();
            !(name == "node_modules" || (name.starts_with('.') && entry.depth() > 0))
        })
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ANALYZABLE_EXTENSIONS.contains(&ext))
        })
        .map(|entry| InputFile::new(entry.path()))
        .collect()
}

fn exit_code(result: &argus_core::AnalysisResult, fail_on_warnings: bool) -> i32 {
    let has_errors = result
        .issues
        .iter()
        .any(|issue| issue.severity == Severity::Error);
    let has_warnings = result
        .issues
        .iter()
        .any(|issue| issue.severity == Severity::Warning);

    if has_errors || (fail_on_warnings && has_warnings) {
        1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argus_core::{AnalysisResult, Issue};

    #[test]
    fn collects_only_analyzable_extensions() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.ts"), "").unwrap();
        std::fs::write(dir.path().join("b.tsx"), "").unwrap();
        std::fs::write(dir.path().join("notes.md"), "").unwrap();
        std::fs::create_dir(dir.path().join("node_modules")).unwrap();
        std::fs::write(dir.path().join("node_modules/dep.ts"), "").unwrap();

        let files = collect_input_files(dir.path());

        let names: Vec<String> = files
            .iter()
            .map(|f| f.path().file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.ts", "b.tsx"]);
    }

    #[test]
    fn single_file_path_is_used_directly() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("only.ts");
        std::fs::write(&file, "").unwrap();

        let files = collect_input_files(&file);

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path(), file);
    }

    fn result_with(severity: Severity) -> AnalysisResult {
        AnalysisResult {
            issues: vec![Issue::new("T001", severity, "msg", "a.ts", 1, 1)],
            failed_files: Vec::new(),
        }
    }

    #[test]
    fn exit_code_reflects_severity() {
        assert_eq!(exit_code(&result_with(Severity::Error), false), 1);
        assert_eq!(exit_code(&result_with(Severity::Warning), false), 0);
        assert_eq!(exit_code(&result_with(Severity::Warning), true), 1);
        assert_eq!(
            exit_code(
                &AnalysisResult {
                    issues: Vec::new(),
                    failed_files: Vec::new()
                },
                true
            ),
            0
        );
    }
}
