//! Logical lines and the cursor used to consume them.
//!
//! A [`Line`] is one statement (terminated by `;` or `{`) or a lone `}`.
//! Lines are immutable once scanned; all sequential reading goes through a
//! [`Cursor`], so the same line array can be walked by several passes.

use crate::CursorError;

/// Token sequence for one logical line of markup.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Line {
    tokens: Vec<String>,
    /// 1-based source line where the statement began.
    number: usize,
}

impl Line {
    /// Create a line from tokens and its originating source line.
    pub fn new(tokens: Vec<String>, number: usize) -> Self {
        Self { tokens, number }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn number(&self) -> usize {
        self.number
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// First token of the line, or `""` for an empty line.
    pub fn first(&self) -> &str {
        self.tokens.first().map(String::as_str).unwrap_or("")
    }

    /// Depth-unaware check for a token anywhere in the line.
    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    /// All tokens joined by single spaces.
    pub fn text(&self) -> String {
        self.tokens.join(" ")
    }

    /// Start reading the line from its first token.
    pub fn cursor(&self) -> Cursor<'_> {
        Cursor { line: self, pos: 0 }
    }

    /// Fold every balanced `( ... )` run into a single group token.
    ///
    /// Unbalanced runs are left as individual tokens.
    pub fn collapse_groups(&self) -> Line {
        let mut tokens = Vec::with_capacity(self.tokens.len());
        let mut i = 0;

        while i < self.tokens.len() {
            if self.tokens[i] != "(" {
                tokens.push(self.tokens[i].clone());
                i += 1;
                continue;
            }

            let mut depth = 0usize;
            let mut end = None;
            for (j, token) in self.tokens.iter().enumerate().skip(i) {
                match token.as_str() {
                    "(" => depth += 1,
                    ")" => {
                        depth -= 1;
                        if depth == 0 {
                            end = Some(j);
                            break;
                        }
                    }
                    _ => {}
                }
            }

            match end {
                Some(end) => {
                    tokens.push(join_group(&self.tokens[i..=end]));
                    i = end + 1;
                }
                None => {
                    tokens.extend(self.tokens[i..].iter().cloned());
                    break;
                }
            }
        }

        Line::new(tokens, self.number)
    }
}

/// Render a token run the way it would be written: `(1, 2, (3, 4))`.
fn join_group(tokens: &[String]) -> String {
    let mut out = String::new();
    let mut prev_word = false;
    for token in tokens {
        let word = token.chars().any(|c| c.is_alphanumeric() || c == '"' || c == '.');
        if word && prev_word {
            out.push(' ');
        }
        out.push_str(token);
        if token == "," {
            out.push(' ');
        }
        prev_word = word;
    }
    out
}

/// Sequential reader over a [`Line`].
///
/// Every read returns `""` once the line is exhausted, mirroring how the
/// grammar treats a missing token as an empty one.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    line: &'a Line,
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// The line being read.
    pub fn line(&self) -> &'a Line {
        self.line
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Move back to the first token.
    pub fn rewind(&mut self) {
        self.pos = 0;
    }

    /// True once every token has been consumed.
    pub fn is_empty(&self) -> bool {
        self.pos >= self.line.tokens.len()
    }

    /// Depth-unaware check over the whole line, independent of position.
    pub fn contains(&self, token: &str) -> bool {
        self.line.contains(token)
    }

    /// Current token without advancing.
    pub fn peek(&self) -> &'a str {
        self.line
            .tokens
            .get(self.pos)
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Current token, advancing past it.
    pub fn get(&mut self) -> &'a str {
        match self.line.tokens.get(self.pos) {
            Some(token) => {
                self.pos += 1;
                token.as_str()
            }
            None => "",
        }
    }

    /// The token most recently consumed.
    pub fn previous(&self) -> &'a str {
        if self.pos == 0 {
            return "";
        }
        self.line
            .tokens
            .get(self.pos - 1)
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Consume tokens until `stop` (consumed, not included) or the end.
    ///
    /// Returns the consumed tokens joined by single spaces. Passing `""`
    /// drains the rest of the line, since no token is ever empty.
    pub fn get_until(&mut self, stop: &str) -> String {
        let mut parts = Vec::new();
        while !self.is_empty() {
            let next = self.get();
            if next == stop {
                break;
            }
            parts.push(next);
        }
        parts.join(" ")
    }

    /// Consume tokens as a new line until `stop` or the enclosing `)`.
    ///
    /// Depth starts at 1. A `)` that brings it to 0 ends the scan. With
    /// `respect_parens`, `stop` only matches at depth 1.
    pub fn get_line_until(&mut self, stop: &str, respect_parens: bool) -> Line {
        let mut depth = 1usize;
        let mut tokens = Vec::new();

        while !self.is_empty() {
            let next = self.get();
            if next == "(" {
                depth += 1;
            }
            if next == ")" {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            if next == stop && (!respect_parens || depth == 1) {
                break;
            }
            tokens.push(next.to_string());
        }

        Line::new(tokens, self.line.number)
    }

    /// Consume the contents of a bracket pair whose opener was just read.
    ///
    /// Tracks `(`/`)` (and `[`/`]` with `use_square`) from depth 1 and
    /// returns the enclosed tokens once depth reaches 0. The closing token is
    /// consumed but not included.
    pub fn get_in_braces(&mut self, use_square: bool) -> Result<Line, CursorError> {
        let mut depth = 1usize;
        let mut tokens = Vec::new();

        while !self.is_empty() {
            let next = self.get();
            if next == "(" || (use_square && next == "[") {
                depth += 1;
            }
            if next == ")" || (use_square && next == "]") {
                depth -= 1;
                if depth == 0 {
                    return Ok(Line::new(tokens, self.line.number));
                }
            }
            tokens.push(next.to_string());
        }

        Err(self.unmatched(use_square))
    }

    /// Like [`Cursor::get_in_braces`], split into arguments on depth-1 commas.
    ///
    /// `()` yields no arguments and `(a,)` a trailing empty one. A leading
    /// comma only opens the first argument, so `(,a)` yields `[a]`.
    pub fn get_lines_in_braces(&mut self) -> Result<Vec<Line>, CursorError> {
        let mut depth = 1usize;
        let mut args: Vec<Vec<String>> = Vec::new();

        while !self.is_empty() {
            let next = self.get();
            if next == "(" {
                depth += 1;
            }
            if next == ")" {
                depth -= 1;
                if depth == 0 {
                    let number = self.line.number;
                    return Ok(args.into_iter().map(|t| Line::new(t, number)).collect());
                }
            }
            if next == "," && depth == 1 {
                args.push(Vec::new());
                continue;
            }
            match args.last_mut() {
                Some(current) => current.push(next.to_string()),
                None => args.push(vec![next.to_string()]),
            }
        }

        Err(self.unmatched(false))
    }

    fn unmatched(&self, square: bool) -> CursorError {
        let line = self.line.number;
        if square {
            CursorError::UnmatchedBracket { line }
        } else {
            CursorError::UnmatchedParen { line }
        }
    }
}
