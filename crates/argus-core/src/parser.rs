//! Parsing of TypeScript/JavaScript source units into syntax models.
//!
//! Wraps SWC's recovering parser. Parsing is pure given (content,
//! compiler options) and never touches other files; malformed input is a
//! typed outcome on the [`ParsedFile`], not a panic.

use std::ops::Range;
use std::sync::OnceLock;

use swc_common::sync::Lrc;
use swc_common::{BytePos, FileName, SourceMap, Spanned};
use swc_ecma_parser::{EsSyntax, Syntax, TsSyntax, parse_file_as_module};

use crate::tsconfig::CompilerOptions;

pub use swc_ecma_ast::{EsVersion, Module};

/// Source language, detected from the file extension. This engine is
/// TypeScript-first: unknown extensions parse as TypeScript.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    TypeScript,
    Tsx,
    JavaScript,
    Jsx,
}

pub fn detect_language(filename: &str) -> Language {
    let ext = filename.rsplit('.').next().unwrap_or("").to_lowercase();

    match ext.as_str() {
        "js" | "mjs" | "cjs" => Language::JavaScript,
        "jsx" => Language::Jsx,
        "tsx" => Language::Tsx,
        _ => Language::TypeScript,
    }
}

/// A positioned syntax error. Line and column are 1-based.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message} at {line}:{column}")]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub span_lo: u32,
    pub span_hi: u32,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMetadata {
    pub filename: String,
    pub language: Language,
    pub line_count: usize,
}

/// The syntax model of one input file: source text, metadata, and either
/// a parsed module or the errors that prevented one.
///
/// Owned by a single analysis session; a file with any recorded syntax
/// error is treated as failed and is excluded from rule dispatch.
pub struct ParsedFile {
    source: String,
    metadata: FileMetadata,
    ast_module: Option<Module>,
    errors: Vec<ParseError>,
    span_base: u32,
    line_ranges: OnceLock<Vec<Range<usize>>>,
}

impl std::fmt::Debug for ParsedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParsedFile")
            .field("metadata", &self.metadata)
            .field("has_module", &self.ast_module.is_some())
            .field("error_count", &self.errors.len())
            .finish()
    }
}

impl ParsedFile {
    /// Parse with default compiler options.
    pub fn from_source(filename: &str, source: &str) -> Self {
        Self::from_source_with_options(filename, source, &CompilerOptions::default())
    }

    /// Parse under the given project compiler options.
    pub fn from_source_with_options(
        filename: &str,
        source: &str,
        options: &CompilerOptions,
    ) -> Self {
        let language = detect_language(filename);
        let parser = Parser::for_file_with_options(filename, options);
        let outcome = parser.parse_module_recovering(source);

        let line_count = if source.is_empty() {
            0
        } else {
            source.lines().count()
        };

        Self {
            source: source.to_string(),
            metadata: FileMetadata {
                filename: filename.to_string(),
                language,
                line_count,
            },
            ast_module: outcome.module,
            errors: outcome.errors,
            span_base: outcome.span_base,
            line_ranges: OnceLock::new(),
        }
    }

    /// Whether the file parsed cleanly and is eligible for rule dispatch.
    pub fn is_valid(&self) -> bool {
        self.ast_module.is_some() && self.errors.is_empty()
    }

    pub fn metadata(&self) -> &FileMetadata {
        &self.metadata
    }

    pub fn module(&self) -> Option<&Module> {
        self.ast_module.as_ref()
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Byte offset into the source text for a span position. SWC span
    /// positions are global to the parse; this rebases them on the file
    /// start so slicing the original text is exact.
    pub fn offset_of(&self, pos: BytePos) -> usize {
        (pos.0.saturating_sub(self.span_base)) as usize
    }

    /// 1-based line content, or `None` when out of range.
    pub fn get_line(&self, line_number: usize) -> Option<&str> {
        if line_number == 0 {
            return None;
        }

        let ranges = self.line_ranges.get_or_init(|| build_line_ranges(&self.source));
        ranges
            .get(line_number - 1)
            .map(|range| &self.source[range.clone()])
    }
}

fn build_line_ranges(source: &str) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut start = 0;

    for (i, c) in source.char_indices() {
        if c == '\n' {
            ranges.push(start..i);
            start = i + 1;
        }
    }

    if start < source.len() || (start == 0 && !source.is_empty()) {
        ranges.push(start..source.len());
    }

    ranges
}

/// Result of one recovering parse pass.
#[derive(Debug)]
pub struct ParseOutcome {
    pub module: Option<Module>,
    pub errors: Vec<ParseError>,
    pub span_base: u32,
}

impl ParseOutcome {
    pub fn is_ok(&self) -> bool {
        self.module.is_some() && self.errors.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParserBuilder {
    typescript: bool,
    jsx: bool,
    decorators: bool,
}

impl ParserBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn typescript(mut self, enabled: bool) -> Self {
        self.typescript = enabled;
        self
    }

    pub fn jsx(mut self, enabled: bool) -> Self {
        self.jsx = enabled;
        self
    }

    pub fn decorators(mut self, enabled: bool) -> Self {
        self.decorators = enabled;
        self
    }

    pub fn build(self) -> Parser {
        let syntax = if self.typescript {
            Syntax::Typescript(TsSyntax {
                tsx: self.jsx,
                decorators: self.decorators,
                ..Default::default()
            })
        } else {
            Syntax::Es(EsSyntax {
                jsx: self.jsx,
                decorators: self.decorators,
                ..Default::default()
            })
        };

        Parser { syntax }
    }
}

/// A configured parser. Cheap to build; holds only the syntax settings
/// derived from the file's language and the project's compiler options.
#[derive(Debug, Clone)]
pub struct Parser {
    syntax: Syntax,
}

impl Parser {
    pub fn builder() -> ParserBuilder {
        ParserBuilder::new()
    }

    pub fn for_file(filename: &str) -> Self {
        Self::for_file_with_options(filename, &CompilerOptions::default())
    }

    pub fn for_file_with_options(filename: &str, options: &CompilerOptions) -> Self {
        let decorators = options.experimental_decorators.unwrap_or(false);

        let builder = match detect_language(filename) {
            Language::TypeScript => Self::builder().typescript(true),
            Language::Tsx => Self::builder().typescript(true).jsx(true),
            Language::Jsx => Self::builder().jsx(true),
            // The jsx compiler option opts plain .js files into JSX syntax.
            Language::JavaScript => Self::builder().jsx(options.jsx.is_some()),
        };

        builder.decorators(decorators).build()
    }

    /// Parse a module, collecting recoverable errors instead of bailing on
    /// the first one. A fatal error yields `module: None`.
    pub fn parse_module_recovering(&self, code: &str) -> ParseOutcome {
        let source_map: Lrc<SourceMap> = Default::default();
        let fm = source_map
            .new_source_file(FileName::Custom("input.ts".into()).into(), code.to_string());
        let span_base = fm.start_pos.0;

        let mut recovered = Vec::new();
        let result = parse_file_as_module(&fm, self.syntax, EsVersion::latest(), None, &mut recovered);

        let to_parse_error = |e: &swc_ecma_parser::error::Error| {
            let span = e.span();
            let loc = source_map.lookup_char_pos(span.lo);
            ParseError {
                line: loc.line,
                column: loc.col_display + 1,
                span_lo: span.lo.0,
                span_hi: span.hi.0,
                message: e.kind().msg().to_string(),
            }
        };

        let mut errors: Vec<ParseError> = recovered.iter().map(to_parse_error).collect();

        match result {
            Ok(module) => ParseOutcome {
                module: Some(module),
                errors,
                span_base,
            },
            Err(e) => {
                errors.push(to_parse_error(&e));
                ParseOutcome {
                    module: None,
                    errors,
                    span_base,
                }
            }
        }
    }
}
