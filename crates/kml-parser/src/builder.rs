//! Element-tree builder.
//!
//! Builds the body of one element header into a [`UIElement`] tree. Each
//! scope keeps a local depth counter: while it is above zero, lines are only
//! inspected for braces. Only `child` headers at depth zero recurse.

use kml_lexer::{Cursor, CursorError, Line};

use crate::ast::{ElementKind, MarkupElement, Property, UIElement, Variable};
use crate::catalog::ElementCatalog;
use crate::report::Reporter;
use crate::structure::ParsedElement;
use crate::value::check_brackets;

/// Build the tree for one header found by [`crate::structure::read_file`].
///
/// Grammar errors are reported and skipped. An unclosed bracket in a value
/// aborts the whole element and is returned as `Err`.
pub fn build_element(
    header: &ParsedElement,
    lines: &[Line],
    catalog: &dyn ElementCatalog,
    reporter: &mut dyn Reporter,
) -> Result<MarkupElement, CursorError> {
    log::debug!("building element '{}' from {}", header.name, header.file);

    let mut root = UIElement::new(header.name.clone(), ElementKind::UserDefined);
    let mut scope = Scope {
        lines,
        catalog,
        reporter,
    };
    scope.parse(&mut root, header.start + 1, true)?;

    Ok(MarkupElement {
        root,
        file: header.file.clone(),
    })
}

struct Scope<'a, 'c, 'r> {
    lines: &'a [Line],
    catalog: &'c dyn ElementCatalog,
    reporter: &'r mut dyn Reporter,
}

impl<'a> Scope<'a, '_, '_> {
    /// Parse lines from `start` into `elem` until the `}` closing this scope.
    fn parse(
        &mut self,
        elem: &mut UIElement,
        start: usize,
        is_root: bool,
    ) -> Result<(), CursorError> {
        let mut depth = 0usize;
        // Set after `child Type name;` when a lone `{` line may follow.
        let mut detached_brace = false;
        let lines = self.lines;

        for (i, line) in lines.iter().enumerate().skip(start) {
            self.reporter.set_current_line(i);
            let mut ln = line.cursor();
            let begin = ln.get();

            if begin == "}" {
                if depth == 0 {
                    return Ok(());
                }
                depth -= 1;
                continue;
            }
            if depth != 0 {
                if line.contains("{") {
                    depth += 1;
                }
                continue;
            }
            if std::mem::take(&mut detached_brace) && line.len() == 1 && begin == "{" {
                depth += 1;
                continue;
            }

            match begin {
                "{" => self.reporter.error("Unexpected '{'".into()),
                "var" => self.parse_variable(elem, &mut ln, is_root)?,
                "child" => detached_brace = self.parse_child(elem, &mut ln, i)?,
                _ => self.parse_property(elem, begin, &mut ln)?,
            }

            if line.contains("{") {
                depth += 1;
            }
        }

        Ok(())
    }

    fn parse_variable(
        &mut self,
        elem: &mut UIElement,
        ln: &mut Cursor<'a>,
        is_root: bool,
    ) -> Result<(), CursorError> {
        if !is_root {
            self.reporter.error("Cannot declare variable here.".into());
            return Ok(());
        }

        let name = ln.get();
        if name.is_empty() || name == "{" {
            self.reporter.error("Expected a name after 'var'".into());
            return Ok(());
        }

        let value = match ln.get() {
            "=" => capture_value(ln)?,
            "" | "{" => String::new(),
            other => {
                self.reporter.error(format!(
                    "Unexpected '{other}' after variable '{name}'. Expected '='"
                ));
                return Ok(());
            }
        };

        elem.variables
            .entry(name.to_string())
            .or_insert_with(|| Variable::new(value));
        Ok(())
    }

    /// Returns true when the header ended without `{` and the body may open
    /// on the next line.
    fn parse_child(
        &mut self,
        parent: &mut UIElement,
        ln: &mut Cursor<'a>,
        index: usize,
    ) -> Result<bool, CursorError> {
        let type_name = ln.get();
        if type_name.is_empty() || type_name == "{" {
            self.reporter.error("Expected an element type after 'child'".into());
            return Ok(false);
        }

        let kind = if self.catalog.is_default_element(type_name) {
            ElementKind::Default
        } else {
            ElementKind::UserDefined
        };
        let mut child = UIElement::new(type_name, kind);

        let mut opener = ln.get();
        if !opener.is_empty() && opener != "{" {
            child.element_name = Some(opener.to_string());
            opener = ln.get();
        }

        let detached = match opener {
            "{" => false,
            "" => true,
            other => {
                self.reporter.error(format!("Unexpected '{other}'"));
                return Ok(false);
            }
        };

        let body = if !detached {
            Some(index + 1)
        } else if self.lines.get(index + 1).is_some_and(is_lone_open_brace) {
            Some(index + 2)
        } else {
            None
        };

        if let Some(body) = body {
            self.parse(&mut child, body, false)?;
        }
        parent.children.push(child);
        Ok(detached)
    }

    fn parse_property(
        &mut self,
        elem: &mut UIElement,
        name: &str,
        ln: &mut Cursor<'a>,
    ) -> Result<(), CursorError> {
        match ln.get() {
            "=" => {}
            "" => {
                self.reporter.error(format!("Expected '=' after '{name}'"));
                return Ok(());
            }
            other => {
                self.reporter
                    .error(format!("Expected '=' after '{name}', got '{other}'"));
                return Ok(());
            }
        }

        let value = capture_value(ln)?;
        elem.properties.push(Property {
            name: name.to_string(),
            value,
        });
        Ok(())
    }
}

/// The rest of the line as value text, excluding a trailing `{`.
fn capture_value(ln: &mut Cursor<'_>) -> Result<String, CursorError> {
    check_brackets(ln.clone())?;
    Ok(ln.get_until("{"))
}

fn is_lone_open_brace(line: &Line) -> bool {
    line.len() == 1 && line.first() == "{"
}
