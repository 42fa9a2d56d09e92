//! Wildcard text patterns
//!
//! `*` matches any run of characters (including none) and `?` matches exactly
//! one character. A pattern must match the whole text, so `"*request body*"`
//! means "contains `request body`".

use std::fmt;

use regex::Regex;

use crate::error::{DomainError, DomainResult};

/// A compiled wildcard pattern.
#[derive(Debug, Clone)]
pub struct WildcardPattern {
    source: String,
    regex: Regex,
}

impl WildcardPattern {
    /// Compiles `pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidPattern`] if the translated expression
    /// cannot be compiled.
    pub fn new(pattern: &str) -> DomainResult<Self> {
        let mut expression = String::with_capacity(pattern.len() + 8);
        expression.push_str("(?s)^");
        for ch in pattern.chars() {
            match ch {
                '*' => expression.push_str(".*"),
                '?' => expression.push('.'),
                other => expression.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
            }
        }
        expression.push('$');

        let regex =
            Regex::new(&expression).map_err(|e| DomainError::InvalidPattern(e.to_string()))?;
        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    /// Returns true if the whole of `text` matches.
    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// Returns the pattern as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl fmt::Display for WildcardPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_star_matches_any_run() {
        let pattern = WildcardPattern::new("*request body*").unwrap();

        assert!(pattern.is_match("Expected body to contain x\nrequest body\nend"));
        assert!(pattern.is_match("request body"));
        assert!(!pattern.is_match("request-body"));
    }

    #[test]
    fn test_pattern_must_match_whole_text() {
        let pattern = WildcardPattern::new("abc").unwrap();

        assert!(pattern.is_match("abc"));
        assert!(!pattern.is_match("xabc"));
    }

    #[test]
    fn test_question_mark_and_metacharacters() {
        let pattern = WildcardPattern::new("v?.(1)").unwrap();

        assert!(pattern.is_match("v2.(1)"));
        assert!(!pattern.is_match("v2x(1)"));
        assert_eq!(pattern.to_string(), "v?.(1)");
    }
}
