//! Project compilation descriptor (`tsconfig.json`) loading and resolution.
//!
//! A session resolves its descriptor once, in this order: explicit
//! override path, then `tsconfig.json` at the project root, then a
//! synthesized default. Degraded resolution is logged and recovered —
//! it never aborts the session.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

pub const TSCONFIG_FILENAME: &str = "tsconfig.json";

/// Subset of `compilerOptions` that affects parsing. An empty object is
/// a valid configuration.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CompilerOptions {
    pub target: Option<String>,
    pub module: Option<String>,
    pub jsx: Option<String>,
    pub experimental_decorators: Option<bool>,
    pub strict: Option<bool>,
    pub lib: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct TsConfig {
    pub compiler_options: CompilerOptions,
    pub files: Vec<String>,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum TsConfigError {
    #[error("failed to read tsconfig '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid JSON in tsconfig '{path}': {message}")]
    Parse { path: PathBuf, message: String },
}

/// Which resolution branch produced the descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TsConfigSource {
    Explicit(PathBuf),
    ProjectDefault(PathBuf),
    Synthesized,
}

/// A descriptor together with its provenance. The provenance is the log
/// record of how the session was configured.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTsConfig {
    pub config: TsConfig,
    pub source: TsConfigSource,
}

pub fn load(path: &Path) -> Result<TsConfig, TsConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| TsConfigError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;

    serde_json::from_str(&content).map_err(|e| TsConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Resolve the descriptor governing one project root.
///
/// `explicit_path` is relative to the root. A missing or invalid
/// explicit descriptor is a configuration error: it is reported here and
/// the session proceeds under a synthesized default. The "no tsconfig
/// found" line fires exactly once per root, and only on the synthesized
/// branch without an explicit override.
pub fn resolve(project_root: &Path, explicit_path: Option<&Path>) -> ResolvedTsConfig {
    if let Some(relative) = explicit_path {
        let path = project_root.join(relative);
        match load(&path) {
            Ok(config) => {
                debug!("using tsconfig from '{}'", path.display());
                return ResolvedTsConfig {
                    config,
                    source: TsConfigSource::Explicit(path),
                };
            }
            Err(e) => {
                warn!("{e}; falling back to default configuration");
                return ResolvedTsConfig {
                    config: TsConfig::default(),
                    source: TsConfigSource::Synthesized,
                };
            }
        }
    }

    let default_path = project_root.join(TSCONFIG_FILENAME);
    if default_path.exists() {
        match load(&default_path) {
            Ok(config) => {
                debug!("using tsconfig from '{}'", default_path.display());
                return ResolvedTsConfig {
                    config,
                    source: TsConfigSource::ProjectDefault(default_path),
                };
            }
            Err(e) => {
                warn!("{e}; falling back to default configuration");
                return ResolvedTsConfig {
                    config: TsConfig::default(),
                    source: TsConfigSource::Synthesized,
                };
            }
        }
    }

    warn!(
        "No tsconfig.json file found for {}, using default configuration",
        project_root.display()
    );
    ResolvedTsConfig {
        config: TsConfig::default(),
        source: TsConfigSource::Synthesized,
    }
}
