//! Machine-readable JSON output.

use serde::Serialize;

use argus_core::{AnalysisResult, Issue};

#[derive(Serialize)]
struct JsonReport<'a> {
    issues: &'a [Issue],
    failed_files: Vec<String>,
}

pub fn print(result: &AnalysisResult) -> anyhow::Result<()> {
    let report = JsonReport {
        issues: &result.issues,
        failed_files: result
            .failed_files
            .iter()
            .map(|f| f.path().display().to_string())
            .collect(),
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
