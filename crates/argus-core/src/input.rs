//! Input files handed to an analysis session.

use std::io;
use std::path::{Path, PathBuf};

/// Text encoding of an input file. Sources are decoded to UTF-8 before
/// parsing; `Utf8Lossy` replaces invalid sequences instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    #[default]
    Utf8,
    Utf8Lossy,
}

/// One source unit of an analysis session.
///
/// Contents may be provided in memory (editors hand over unsaved buffers
/// this way) or read from disk through [`InputFile::contents`]. Immutable
/// for the duration of a session.
#[derive(Debug, Clone, PartialEq)]
pub struct InputFile {
    path: PathBuf,
    encoding: Encoding,
    contents: Option<String>,
    is_test: bool,
}

impl InputFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            encoding: Encoding::default(),
            contents: None,
            is_test: false,
        }
    }

    /// Attach in-memory contents; disk is never touched for this file.
    pub fn with_contents(mut self, contents: impl Into<String>) -> Self {
        self.contents = Some(contents.into());
        self
    }

    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn test(mut self, is_test: bool) -> Self {
        self.is_test = is_test;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_test(&self) -> bool {
        self.is_test
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// The source text: the in-memory buffer when present, the on-disk
    /// contents otherwise.
    pub fn contents(&self) -> io::Result<String> {
        if let Some(contents) = &self.contents {
            return Ok(contents.clone());
        }

        match self.encoding {
            Encoding::Utf8 => std::fs::read_to_string(&self.path),
            Encoding::Utf8Lossy => {
                let bytes = std::fs::read(&self.path)?;
                Ok(String::from_utf8_lossy(&bytes).into_owned())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_contents_win_over_disk() {
        let file = InputFile::new("/nonexistent/foo.ts").with_contents("const x = 1;");

        assert_eq!(file.contents().unwrap(), "const x = 1;");
    }

    #[test]
    fn missing_file_without_contents_is_an_error() {
        let file = InputFile::new("/nonexistent/foo.ts");

        assert!(file.contents().is_err());
    }

    #[test]
    fn defaults_to_production_utf8() {
        let file = InputFile::new("foo.ts");

        assert!(!file.is_test());
        assert_eq!(file.encoding(), Encoding::Utf8);
    }

    #[test]
    fn test_flag_is_preserved() {
        let file = InputFile::new("foo.spec.ts").test(true);

        assert!(file.is_test());
    }
}
