use crate::line::Line;
use crate::token::{is_special_char, SCOPE_CLOSE, SCOPE_OPEN, STATEMENT_END};

/// KML source scanner.
///
/// Splits a file into logical [`Line`]s of tokens in a single pass:
/// - whitespace separates words and is otherwise dropped
/// - quoted strings are kept verbatim, quotes included
/// - operator characters become one-character tokens
/// - `;` ends a statement, `{` ends a statement and is kept as its last token,
///   `}` always becomes a line of its own
pub struct Scanner {
    lines: Vec<Line>,
    current: Vec<String>,
    word: String,
    /// Running 1-based line counter.
    line: usize,
    /// Source line where the line under construction started.
    line_start: Option<usize>,
    in_quotes: bool,
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}

impl Scanner {
    /// Create an empty scanner positioned at line 1.
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            current: Vec::new(),
            word: String::new(),
            line: 1,
            line_start: None,
            in_quotes: false,
        }
    }

    /// Tokenize the entire source into logical lines.
    ///
    /// Scanning never fails: an unterminated string is kept as a token and
    /// brace balance is checked by the parser.
    pub fn tokenize(source: &str) -> Vec<Line> {
        let mut scanner = Scanner::new();
        for c in source.chars() {
            scanner.scan_char(c);
        }
        let lines = scanner.finish();
        log::trace!("scanned {} lines", lines.len());
        lines
    }

    fn scan_char(&mut self, c: char) {
        if c == '\n' {
            self.line += 1;
        }

        if c == '"' {
            if self.in_quotes {
                self.word.push(c);
                self.flush_word();
                self.in_quotes = false;
            } else {
                self.flush_word();
                self.mark_start();
                self.in_quotes = true;
                self.word.push(c);
            }
            return;
        }

        if self.in_quotes {
            self.word.push(c);
            return;
        }

        match c {
            ' ' | '\t' | '\n' | '\r' => self.flush_word(),
            STATEMENT_END => {
                self.flush_word();
                self.flush_line();
            }
            '{' => {
                self.flush_word();
                self.current.push(SCOPE_OPEN.to_string());
                self.flush_line();
            }
            '}' => {
                self.flush_word();
                self.flush_line();
                self.lines
                    .push(Line::new(vec![SCOPE_CLOSE.to_string()], self.line));
            }
            c if is_special_char(c) => {
                self.flush_word();
                self.mark_start();
                self.current.push(c.to_string());
            }
            c => {
                self.mark_start();
                self.word.push(c);
            }
        }
    }

    fn finish(mut self) -> Vec<Line> {
        self.flush_word();
        self.flush_line();
        self.lines
    }

    fn mark_start(&mut self) {
        if self.line_start.is_none() {
            self.line_start = Some(self.line);
        }
    }

    fn flush_word(&mut self) {
        if !self.word.is_empty() {
            self.current.push(std::mem::take(&mut self.word));
        }
    }

    fn flush_line(&mut self) {
        let number = self.line_start.take().unwrap_or(self.line);
        if !self.current.is_empty() {
            let tokens = std::mem::take(&mut self.current);
            self.lines.push(Line::new(tokens, number));
        }
    }
}
