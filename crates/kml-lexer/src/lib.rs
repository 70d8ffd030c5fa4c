//! KML Lexer
//!
//! Tokenizes `.kml` markup files into logical lines of string tokens and
//! provides the [`Cursor`] used by the parser to read them.
//!
//! # Example
//!
//! ```
//! use kml_lexer::Scanner;
//!
//! let lines = Scanner::tokenize("width = 1;");
//! assert_eq!(lines.len(), 1);
//! assert_eq!(lines[0].text(), "width = 1");
//! ```

pub mod line;
pub mod scanner;
pub mod token;

pub use line::{Cursor, Line};
pub use scanner::Scanner;
pub use token::{is_string_token, is_vector_token};

/// A bracket scan ran off the end of its line before closing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CursorError {
    #[error("Expected a matching ')'")]
    UnmatchedParen { line: usize },

    #[error("Expected a matching ']'")]
    UnmatchedBracket { line: usize },
}

impl CursorError {
    /// Source line of the scan that failed.
    pub fn line(&self) -> usize {
        match self {
            CursorError::UnmatchedParen { line } | CursorError::UnmatchedBracket { line } => *line,
        }
    }
}
