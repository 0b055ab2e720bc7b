//! Selection of token substrings before shingling.
use regex::Regex;

use crate::errors::{Result, SimhashError};

/// The default token pattern: word characters and CJK ideographs
/// (U+4E00..U+9FCC).
pub const DEFAULT_TOKEN_PATTERN: &str = r"[\w\x{4e00}-\x{9fcc}]+";

/// Rule selecting which substrings of lower-cased text count as tokens.
///
/// Matches of the pattern are concatenated into a single character stream,
/// which is then shingled into features.
#[derive(Clone, Debug)]
pub struct TokenRule {
    pattern: Regex,
}

impl TokenRule {
    /// Creates a rule from a regex pattern, or an error if the pattern does
    /// not compile.
    pub fn new(pattern: &str) -> Result<Self> {
        let pattern = Regex::new(pattern)
            .map_err(|e| SimhashError::input(format!("Invalid token pattern: {e}")))?;
        Ok(Self { pattern })
    }

    /// Lower-cases the text and concatenates all token matches.
    pub fn concat_tokens(&self, text: &str) -> String {
        let text = text.to_lowercase();
        self.pattern
            .find_iter(&text)
            .map(|m| m.as_str())
            .collect()
    }
}

impl Default for TokenRule {
    fn default() -> Self {
        Self {
            pattern: Regex::new(DEFAULT_TOKEN_PATTERN).unwrap(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rule() {
        let rule = TokenRule::default();
        assert_eq!(
            rule.concat_tokens("The quick brown fox"),
            "thequickbrownfox"
        );
    }

    #[test]
    fn test_punctuation_dropped() {
        let rule = TokenRule::default();
        assert_eq!(rule.concat_tokens("a-b, c!"), "abc");
    }

    #[test]
    fn test_cjk_retained() {
        let rule = TokenRule::default();
        assert_eq!(rule.concat_tokens("Hello, 世界!"), "hello世界");
    }

    #[test]
    fn test_custom_pattern() {
        let rule = TokenRule::new(r"[a-z]+").unwrap();
        assert_eq!(rule.concat_tokens("ab1cd2"), "abcd");
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(TokenRule::new(r"[").is_err());
    }
}
