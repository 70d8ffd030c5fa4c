//! KML Parser
//!
//! Turns a batch of `.kml` markup files into element trees and constants.
//!
//! ```text
//! files → Scanner (per file) → read_file (per file)
//!       → build_element (per header) → ParseResult
//! ```
//!
//! Each file is scanned for top-level `element` and `const` declarations
//! first; every element header is then built into a [`UIElement`] tree
//! against its own file's lines. Diagnostics go to a [`Reporter`] and never
//! stop other files or other elements from being parsed.
//!
//! # Example
//!
//! ```
//! use kml_parser::{parse, FileEntry};
//!
//! let source = "element Menu { child UIText title { text = \"Hi\"; } }";
//! let files = [FileEntry::new("menu.kml", source)];
//! let result = parse(&files).unwrap();
//! assert_eq!(result.elements[0].root.children[0].type_name, "UIText");
//! ```

pub mod ast;
pub mod builder;
pub mod catalog;
pub mod report;
pub mod structure;
pub mod value;

pub use ast::{
    Constant, ElementKind, MarkupElement, ParseResult, Property, UIElement, Variable,
    VariableType,
};
pub use catalog::{BuiltinElements, ElementCatalog};
pub use report::{Diagnostic, Diagnostics, Reporter, Severity};
pub use value::ValueShape;

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use kml_lexer::{Line, Scanner};
use serde::Deserialize;

/// Every diagnostic from a parse that reported at least one error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{} error(s) while parsing markup", .diagnostics.len())]
pub struct ParseError {
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseError {
    pub fn new(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }
}

/// One named markup source in a batch.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileEntry {
    pub name: String,
    pub content: String,
}

impl FileEntry {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// Parse a batch of files, reporting every problem to `reporter`.
///
/// Files are processed in name order. When several entries share a name only
/// the first one is read. Always returns a result; it only contains the
/// elements and constants that survived their diagnostics.
pub fn parse_files(
    files: &[FileEntry],
    catalog: &dyn ElementCatalog,
    reporter: &mut dyn Reporter,
) -> ParseResult {
    let mut file_lines: BTreeMap<&str, Vec<Line>> = BTreeMap::new();
    for file in files {
        match file_lines.entry(file.name.as_str()) {
            Entry::Vacant(slot) => {
                slot.insert(Scanner::tokenize(&file.content));
            }
            Entry::Occupied(_) => log::warn!("ignoring duplicate file '{}'", file.name),
        }
    }

    let mut headers = Vec::new();
    let mut constants = Vec::new();

    for (name, lines) in &file_lines {
        log::debug!("reading {name} ({} lines)", lines.len());
        reporter.set_context(name, lines);

        let found = structure::read_file(lines, name, catalog, reporter);
        headers.extend(found.elements.into_iter().map(|h| (*name, lines, h)));
        constants.extend(found.constants);
    }

    let mut elements = Vec::with_capacity(headers.len());
    let mut context = None;
    for (name, lines, header) in &headers {
        if context != Some(*name) {
            reporter.set_context(name, lines);
            context = Some(*name);
        }

        match builder::build_element(header, lines, catalog, reporter) {
            Ok(element) => elements.push(element),
            Err(err) => {
                log::debug!(
                    "element '{}' abandoned at line {}: {err}",
                    header.name,
                    err.line()
                );
                reporter.fatal(err.to_string());
            }
        }
    }

    ParseResult {
        elements,
        constants,
    }
}

/// Parse with the built-in element catalog, failing on any diagnostic.
pub fn parse(files: &[FileEntry]) -> Result<ParseResult, ParseError> {
    let mut diagnostics = Diagnostics::new();
    let result = parse_files(files, &BuiltinElements::new(), &mut diagnostics);
    diagnostics.finish()?;
    Ok(result)
}
