//! Diagnostic reporting.
//!
//! The parser owns no diagnostic storage. It announces which file and line it
//! is looking at through [`Reporter::set_context`] and
//! [`Reporter::set_current_line`], then calls [`Reporter::error`] for
//! recoverable problems and [`Reporter::fatal`] when a construct had to be
//! abandoned. [`Diagnostics`] is the bundled collector.

use std::fmt;

use kml_lexer::Line;
use serde::Serialize;

use crate::ParseError;

/// Receiver for parser diagnostics.
pub trait Reporter {
    /// Called before scanning `file`. `lines` are the file's tokenized lines.
    fn set_context(&mut self, file: &str, lines: &[Line]);

    /// Index into the lines of the current context.
    fn set_current_line(&mut self, index: usize);

    /// A recoverable grammar error. Parsing continues with the next line.
    fn error(&mut self, message: String);

    /// An error that aborted the current element or constant.
    fn fatal(&mut self, message: String) {
        self.error(message);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Fatal,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Fatal => "fatal error",
        }
    }
}

/// One line-stamped, user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub file: String,
    /// Index of the offending line in the file's tokenized lines.
    pub line_index: usize,
    /// 1-based source line, `0` if the file had no lines.
    pub line: usize,
    /// The offending statement's tokens.
    pub source: String,
    pub message: String,
    pub severity: Severity,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {}: {}",
            self.file,
            self.line,
            self.severity.as_str(),
            self.message
        )?;
        if !self.source.is_empty() {
            write!(f, "\n    | {}", self.source)?;
        }
        Ok(())
    }
}

/// Collects every diagnostic reported during a parse.
#[derive(Debug, Default)]
pub struct Diagnostics {
    file: String,
    /// Source line number and text of each line in the current context.
    lines: Vec<(usize, String)>,
    current: usize,
    diagnostics: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// `Err` with every collected diagnostic if anything was reported.
    pub fn finish(self) -> Result<(), ParseError> {
        if self.diagnostics.is_empty() {
            Ok(())
        } else {
            Err(ParseError::new(self.diagnostics))
        }
    }

    fn push(&mut self, message: String, severity: Severity) {
        let (line, source) = self
            .lines
            .get(self.current)
            .cloned()
            .unwrap_or_default();
        log::debug!("{}:{}: {}", self.file, line, message);
        self.diagnostics.push(Diagnostic {
            file: self.file.clone(),
            line_index: self.current,
            line,
            source,
            message,
            severity,
        });
    }
}

impl Reporter for Diagnostics {
    fn set_context(&mut self, file: &str, lines: &[Line]) {
        self.current = 0;
        self.file = file.to_string();
        self.lines = lines.iter().map(|l| (l.number(), l.text())).collect();
    }

    fn set_current_line(&mut self, index: usize) {
        self.current = index;
    }

    fn error(&mut self, message: String) {
        self.push(message, Severity::Error);
    }

    fn fatal(&mut self, message: String) {
        self.push(message, Severity::Fatal);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kml_lexer::Scanner;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_diagnostic_is_line_stamped() {
        let lines = Scanner::tokenize("a = 1;\n\nb 2;");
        let mut diagnostics = Diagnostics::new();
        diagnostics.set_context("main.kml", &lines);
        diagnostics.set_current_line(1);
        diagnostics.error("Expected '=' after 'b'".into());

        let d = diagnostics.iter().next().unwrap();
        assert_eq!(d.file, "main.kml");
        assert_eq!(d.line_index, 1);
        assert_eq!(d.line, 3);
        assert_eq!(d.source, "b 2");
        assert_eq!(d.severity, Severity::Error);
    }

    #[test]
    fn test_display() {
        let lines = Scanner::tokenize("x = (1;");
        let mut diagnostics = Diagnostics::new();
        diagnostics.set_context("a.kml", &lines);
        diagnostics.set_current_line(0);
        diagnostics.fatal("Expected a matching ')'".into());

        let rendered = diagnostics.iter().next().unwrap().to_string();
        assert_eq!(
            rendered,
            "a.kml:1: fatal error: Expected a matching ')'\n    | x = ( 1"
        );
    }

    #[test]
    fn test_out_of_range_line() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.set_context("empty.kml", &[]);
        diagnostics.error("Expected a closing '}'".into());
        let d = diagnostics.iter().next().unwrap();
        assert_eq!(d.line, 0);
        assert_eq!(d.source, "");
    }

    #[test]
    fn test_context_refreshed_for_same_name() {
        let first = Scanner::tokenize("x = 1;\nz = 3;");
        let second = Scanner::tokenize("\n\ny 2;\nw = 4;");
        let mut diagnostics = Diagnostics::new();
        diagnostics.set_context("a.kml", &first);
        diagnostics.set_context("a.kml", &second);
        diagnostics.error("Expected '=' after 'y', got '2'".into());

        let d = diagnostics.iter().next().unwrap();
        assert_eq!(d.line, 3);
        assert_eq!(d.source, "y 2");
    }

    #[test]
    fn test_context_switch() {
        let a = Scanner::tokenize("x = 1;");
        let b = Scanner::tokenize("\ny = 2;");
        let mut diagnostics = Diagnostics::new();
        diagnostics.set_context("a.kml", &a);
        diagnostics.error("first".into());
        diagnostics.set_context("b.kml", &b);
        diagnostics.error("second".into());

        let files: Vec<(&str, usize)> = diagnostics
            .iter()
            .map(|d| (d.file.as_str(), d.line))
            .collect();
        assert_eq!(files, vec![("a.kml", 1), ("b.kml", 2)]);
    }

    #[test]
    fn test_finish() {
        assert!(Diagnostics::new().finish().is_ok());

        let mut diagnostics = Diagnostics::new();
        diagnostics.set_context("a.kml", &[]);
        diagnostics.error("oops".into());
        let err = diagnostics.finish().unwrap_err();
        assert_eq!(err.diagnostics.len(), 1);
        assert_eq!(err.to_string(), "1 error(s) while parsing markup");
    }
}
