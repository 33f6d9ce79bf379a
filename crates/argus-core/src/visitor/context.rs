//! Visitor context providing file information during AST traversal.

use swc_common::Span;

use crate::parser::ParsedFile;

pub struct VisitorContext<'a> {
    file: &'a ParsedFile,
}

impl<'a> VisitorContext<'a> {
    pub fn new(file: &'a ParsedFile) -> Self {
        Self { file }
    }

    pub fn file(&self) -> &ParsedFile {
        self.file
    }

    /// 1-based (line, column) of the span start.
    pub fn span_to_location(&self, span: Span) -> (usize, usize) {
        self.location_of_offset(self.file.offset_of(span.lo))
    }

    /// 1-based (line, column, end_line, end_column) covering the span.
    pub fn span_to_range(&self, span: Span) -> (usize, usize, usize, usize) {
        let (line, column) = self.location_of_offset(self.file.offset_of(span.lo));
        let (end_line, end_column) = self.location_of_offset(self.file.offset_of(span.hi));
        (line, column, end_line, end_column)
    }

    pub fn get_source_text(&self, span: Span) -> Option<&str> {
        let source = self.file.source();
        let lo = self.file.offset_of(span.lo);
        let hi = self.file.offset_of(span.hi);

        if lo <= hi && hi <= source.len() {
            Some(&source[lo..hi])
        } else {
            None
        }
    }

    fn location_of_offset(&self, offset: usize) -> (usize, usize) {
        let source = self.file.source();
        let prefix = &source[..offset.min(source.len())];

        let line = prefix.matches('\n').count() + 1;
        let line_start = prefix.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let column = prefix.len() - line_start + 1;

        (line, column)
    }
}
