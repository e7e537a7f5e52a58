//! SQL `LIKE` pattern matching.
//!
//! A pattern is literal text in which `%` stands for "zero or more of any
//! character". Every other character, including regex metacharacters, is
//! matched literally. Matching is case-insensitive and anchored at both ends,
//! so `"A%"` means "starts with a" and `"%a%"` means "contains a".

use regex::{Regex, RegexBuilder};
use serde_json::Value;

use crate::error::Result;
use crate::value::scalar_text;

/// The wildcard character.
pub const WILDCARD: char = '%';

/// A compiled `LIKE` pattern.
///
/// # Example
///
/// ```
/// use record_collection::LikePattern;
///
/// let pattern = LikePattern::compile("a%").unwrap();
/// assert!(pattern.is_match("Alice"));
/// assert!(!pattern.is_match("Bob"));
///
/// // Metacharacters are literal.
/// let dotted = LikePattern::compile("v1.2%").unwrap();
/// assert!(dotted.is_match("v1.2.3"));
/// assert!(!dotted.is_match("v102"));
/// ```
#[derive(Debug, Clone)]
pub struct LikePattern {
    source: String,
    regex: Regex,
}

impl LikePattern {
    /// Compiles a pattern into an anchored, case-insensitive matcher.
    ///
    /// Fails only when the translated expression exceeds the regex size
    /// limit.
    pub fn compile(pattern: &str) -> Result<Self> {
        let regex = RegexBuilder::new(&translate(pattern))
            .case_insensitive(true)
            .dot_matches_new_line(true)
            .build()?;
        Ok(LikePattern {
            source: pattern.to_string(),
            regex,
        })
    }

    /// The pattern as written.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Tests a string against the pattern.
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// Tests a field value against the pattern.
    ///
    /// Strings, numbers, and booleans match on their text; `null` and
    /// containers never match.
    pub fn matches_value(&self, value: &Value) -> bool {
        scalar_text(value).is_some_and(|text| self.is_match(&text))
    }
}

impl PartialEq for LikePattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

/// Translates a `LIKE` pattern into regex source.
fn translate(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 8);
    out.push('^');
    for (i, literal) in pattern.split(WILDCARD).enumerate() {
        if i > 0 {
            out.push_str(".*");
        }
        out.push_str(&regex::escape(literal));
    }
    out.push('$');
    out
}
