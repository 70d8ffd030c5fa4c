//! File-level pass.
//!
//! Finds the top-level `element` headers and `const` declarations of one
//! file and checks global brace balance. Element bodies are skipped here and
//! built afterwards by [`crate::builder`].

use kml_lexer::{Cursor, Line};

use crate::ast::Constant;
use crate::catalog::ElementCatalog;
use crate::report::Reporter;
use crate::value::check_brackets;

/// A discovered `element Name {` whose body has not been built yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedElement {
    pub name: String,
    pub file: String,
    /// Index of the header line in the file's lines.
    pub start: usize,
    /// Source line of the header.
    pub start_line: usize,
}

/// Headers and constants found in one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileResult {
    pub elements: Vec<ParsedElement>,
    pub constants: Vec<Constant>,
}

/// Scan one file's lines for element headers and constants.
///
/// Errors are reported and the offending line skipped, so one call can
/// surface every structural problem in the file.
pub fn read_file(
    lines: &[Line],
    file: &str,
    catalog: &dyn ElementCatalog,
    reporter: &mut dyn Reporter,
) -> FileResult {
    let mut out = FileResult::default();
    let mut depth = 0usize;

    for (i, line) in lines.iter().enumerate() {
        reporter.set_current_line(i);
        let mut ln = line.cursor();

        match ln.peek() {
            "element" if depth == 0 => {
                if let Some(header) = read_element_header(&mut ln, i, file, catalog, reporter) {
                    log::trace!(
                        "found element '{}' at {}:{}",
                        header.name,
                        file,
                        header.start_line
                    );
                    out.elements.push(header);
                }
                // A rejected header still opens its body.
                if line.contains("{") {
                    depth += 1;
                }
            }
            "const" if depth == 0 => {
                if let Some(constant) = read_constant(&mut ln, reporter) {
                    out.constants.push(constant);
                }
            }
            _ if line.contains("{") => depth += 1,
            _ if line.contains("}") => {
                if depth == 0 {
                    reporter.error("Unexpected '}'".into());
                } else {
                    depth -= 1;
                }
            }
            token if depth == 0 => reporter.error(format!("Unexpected '{token}'")),
            _ => {}
        }
    }

    if depth != 0 {
        reporter.set_current_line(lines.len().saturating_sub(1));
        reporter.error("Expected a closing '}'".into());
    }

    out
}

fn read_element_header(
    ln: &mut Cursor<'_>,
    index: usize,
    file: &str,
    catalog: &dyn ElementCatalog,
    reporter: &mut dyn Reporter,
) -> Option<ParsedElement> {
    ln.get(); // element
    let name = ln.get();

    if name.is_empty() || name == "{" {
        reporter.error("Expected a name after 'element'".into());
        return None;
    }
    if catalog.is_default_element(name) {
        reporter.error(format!(
            "Invalid name: '{name}'. A default element with this name already exists."
        ));
        return None;
    }
    if ln.get() != "{" {
        reporter.error(format!("Expected a '{{' after 'element {name}'"));
        return None;
    }

    Some(ParsedElement {
        name: name.to_string(),
        file: file.to_string(),
        start: index,
        start_line: ln.line().number(),
    })
}

fn read_constant(ln: &mut Cursor<'_>, reporter: &mut dyn Reporter) -> Option<Constant> {
    ln.get(); // const
    let name = ln.get();

    if name.is_empty() {
        reporter.error("Expected a name after 'const'".into());
        return None;
    }

    match ln.get() {
        "=" => {}
        "" => {
            reporter.error("Expected a '=' after a constant definition.".into());
            return None;
        }
        other => {
            reporter.error(format!(
                "Unexpected '{other}' after a constant definition. Expected '='"
            ));
            return None;
        }
    }

    if let Err(err) = check_brackets(ln.clone()) {
        log::debug!("constant abandoned at line {}: {err}", err.line());
        reporter.fatal(err.to_string());
        return None;
    }

    Some(Constant {
        name: name.to_string(),
        value: ln.get_until(""),
    })
}
