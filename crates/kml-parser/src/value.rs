//! Bracket checks and coarse classification of opaque value text.
//!
//! The parser never evaluates values. [`check_brackets`] is the only
//! validation it applies to them; [`ValueShape`] is offered to generators
//! that want to know whether a value is a vector, a call, or something else
//! before handing it to their own evaluator.

use std::fmt;

use kml_lexer::{is_string_token, Cursor, CursorError, Line, Scanner};
use serde::Serialize;

/// Walk the rest of the cursor and fail on the first unclosed `(` or `[`.
///
/// Stray closing brackets are left for the evaluator.
pub fn check_brackets(mut cursor: Cursor<'_>) -> Result<(), CursorError> {
    while !cursor.is_empty() {
        let inner = match cursor.get() {
            "(" => cursor.get_in_braces(false)?,
            "[" => cursor.get_in_braces(true)?,
            _ => continue,
        };
        check_brackets(inner.cursor())?;
    }
    Ok(())
}

/// Top-level structure of a value expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ValueShape {
    Empty,
    /// A single quoted string token, quotes included.
    String { literal: String },
    /// `(a, b, c)`
    Vector { components: Vec<String> },
    /// `name(a, b)`
    Call { name: String, args: Vec<String> },
    /// `target[index]`
    Index { target: String, index: String },
    /// Anything else, e.g. `width + 2` or a bare constant name.
    Plain { text: String },
}

impl ValueShape {
    /// Classify value text captured by the parser.
    ///
    /// Fails only when the text has an unclosed bracket.
    pub fn classify(text: &str) -> Result<ValueShape, CursorError> {
        let tokens: Vec<String> = Scanner::tokenize(text)
            .iter()
            .flat_map(|l| l.tokens().iter().cloned())
            .collect();
        let line = Line::new(tokens, 1);
        check_brackets(line.cursor())?;

        if line.is_empty() {
            return Ok(ValueShape::Empty);
        }
        if line.len() == 1 && is_string_token(line.first()) {
            return Ok(ValueShape::String {
                literal: line.first().to_string(),
            });
        }

        let mut c = line.cursor();
        if c.peek() == "(" {
            c.get();
            let components = c.get_lines_in_braces()?;
            if c.is_empty() {
                return Ok(ValueShape::Vector {
                    components: components.iter().map(Line::text).collect(),
                });
            }
        } else if is_identifier(c.peek()) {
            let name = c.get();
            match c.get() {
                "(" => {
                    let args = c.get_lines_in_braces()?;
                    if c.is_empty() {
                        return Ok(ValueShape::Call {
                            name: name.to_string(),
                            args: args.iter().map(Line::text).collect(),
                        });
                    }
                }
                "[" => {
                    let index = c.get_in_braces(true)?;
                    if c.is_empty() {
                        return Ok(ValueShape::Index {
                            target: name.to_string(),
                            index: index.text(),
                        });
                    }
                }
                _ => {}
            }
        }

        Ok(ValueShape::Plain { text: line.text() })
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            ValueShape::Empty => "empty",
            ValueShape::String { .. } => "string",
            ValueShape::Vector { .. } => "vector",
            ValueShape::Call { .. } => "call",
            ValueShape::Index { .. } => "index",
            ValueShape::Plain { .. } => "plain",
        }
    }
}

impl fmt::Display for ValueShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueShape::Empty => Ok(()),
            ValueShape::String { literal } => write!(f, "{literal}"),
            ValueShape::Vector { components } => write!(f, "({})", components.join(", ")),
            ValueShape::Call { name, args } => write!(f, "{name}({})", args.join(", ")),
            ValueShape::Index { target, index } => write!(f, "{target}[{index}]"),
            ValueShape::Plain { text } => write!(f, "{text}"),
        }
    }
}

fn is_identifier(token: &str) -> bool {
    token
        .chars()
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn shape(text: &str) -> ValueShape {
        ValueShape::classify(text).unwrap()
    }

    #[test]
    fn test_check_brackets_balanced() {
        let line = Line::new(
            ["f", "(", "a", "[", "1", "]", ",", "(", "b", ")", ")"]
                .iter()
                .map(|t| t.to_string())
                .collect(),
            1,
        );
        assert!(check_brackets(line.cursor()).is_ok());
    }

    #[test]
    fn test_check_brackets_nested_unclosed() {
        let lines = Scanner::tokenize("f(a, [1)");
        let err = check_brackets(lines[0].cursor()).unwrap_err();
        assert_eq!(err, CursorError::UnmatchedBracket { line: 1 });
    }

    #[test]
    fn test_check_brackets_ignores_strings() {
        let lines = Scanner::tokenize("\"(\" + x");
        assert!(check_brackets(lines[0].cursor()).is_ok());
    }

    #[test]
    fn test_empty() {
        assert_eq!(shape(""), ValueShape::Empty);
    }

    #[test]
    fn test_string() {
        assert_eq!(
            shape("\"Hello, world\""),
            ValueShape::String {
                literal: "\"Hello, world\"".into()
            }
        );
    }

    #[test]
    fn test_vector() {
        assert_eq!(
            shape("( 1 , 0 , 0.5 )"),
            ValueShape::Vector {
                components: vec!["1".into(), "0".into(), "0.5".into()]
            }
        );
    }

    #[test]
    fn test_nested_vector() {
        assert_eq!(
            shape("((1, 2), 3)"),
            ValueShape::Vector {
                components: vec!["( 1 , 2 )".into(), "3".into()]
            }
        );
    }

    #[test]
    fn test_vector_followed_by_operator_is_plain() {
        assert_eq!(
            shape("(1, 2) * scale"),
            ValueShape::Plain {
                text: "( 1 , 2 ) * scale".into()
            }
        );
    }

    #[test]
    fn test_call() {
        assert_eq!(
            shape("rgb(255, 0, max(a, b))"),
            ValueShape::Call {
                name: "rgb".into(),
                args: vec!["255".into(), "0".into(), "max ( a , b )".into()]
            }
        );
    }

    #[test]
    fn test_index() {
        assert_eq!(
            shape("colors[i + 1]"),
            ValueShape::Index {
                target: "colors".into(),
                index: "i + 1".into()
            }
        );
    }

    #[test]
    fn test_plain() {
        assert_eq!(shape("width + 2").kind_name(), "plain");
        assert_eq!(shape("Pi").to_string(), "Pi");
    }

    #[test]
    fn test_unclosed_is_error() {
        assert_eq!(
            ValueShape::classify("( 1 , 2").unwrap_err().to_string(),
            "Expected a matching ')'"
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(shape("(1,0,0)").to_string(), "(1, 0, 0)");
        assert_eq!(shape("f(x)").to_string(), "f(x)");
    }
}
