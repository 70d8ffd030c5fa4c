/// Characters that always form a one-character token outside of quotes.
pub const SPECIAL_CHARS: &[char] = &[
    '<', '>', '(', ')', '=', ',', '+', '-', '*', '/', '%', '[', ']',
];

/// Structural characters. These end the line being accumulated.
pub const STATEMENT_END: char = ';';
pub const SCOPE_OPEN: &str = "{";
pub const SCOPE_CLOSE: &str = "}";

/// Check if a character is one of the single-character operator tokens.
pub fn is_special_char(c: char) -> bool {
    SPECIAL_CHARS.contains(&c)
}

/// A token is a string token if it is delimited by double quotes on both ends.
pub fn is_string_token(token: &str) -> bool {
    token.len() >= 2 && token.starts_with('"') && token.ends_with('"')
}

/// A token is a vector (group) token if it is a collapsed `( ... )` run.
pub fn is_vector_token(token: &str) -> bool {
    token.len() >= 2 && token.starts_with('(') && token.ends_with(')')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_token() {
        assert!(is_string_token("\"hello\""));
        assert!(is_string_token("\"\""));
        assert!(!is_string_token("\""));
        assert!(!is_string_token("hello"));
        assert!(!is_string_token("\"open"));
    }

    #[test]
    fn test_vector_token() {
        assert!(is_vector_token("(1, 2, 3)"));
        assert!(is_vector_token("()"));
        assert!(!is_vector_token("("));
        assert!(!is_vector_token("(1"));
        assert!(!is_vector_token("size"));
    }

    #[test]
    fn test_special_chars() {
        for c in "<>()=,+-*/%[]".chars() {
            assert!(is_special_char(c), "{c} should be special");
        }
        assert!(!is_special_char(';'));
        assert!(!is_special_char('{'));
        assert!(!is_special_char('a'));
        assert!(!is_special_char('"'));
    }
}
