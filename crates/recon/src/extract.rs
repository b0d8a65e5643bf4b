//! Canonical question identifier extraction.
//!
//! A question text carries its identifier as `Question ID: <24 hex>`. The
//! separator is an optional colon with whitespace on either side of it.
//! The marker must be whole words, so "question identifies" is not one.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

/// Length of a canonical identifier (a 12-byte object id in hex).
pub const IDENTIFIER_LEN: usize = 24;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// Text is empty or has no "Question ID" marker.
    NotFound,
    /// Marker present, but the hex run after it is not exactly 24 characters.
    Malformed { found: String },
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "no Question ID marker"),
            Self::Malformed { found } => write!(
                f,
                "Question ID '{found}' is {} characters, expected {IDENTIFIER_LEN}",
                found.len()
            ),
        }
    }
}

impl std::error::Error for ExtractError {}

fn marker_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // The hex run is captured greedily so over-long ids are seen whole.
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)\bquestion id\b\s*:?\s*([0-9a-f]*)").expect("marker pattern compiles")
    })
}

/// Extract the lower-cased identifier from `text`.
///
/// The first marker followed by exactly 24 hex characters wins. If markers
/// exist but none qualifies, the first offending span is reported.
pub fn extract(text: &str) -> Result<String, ExtractError> {
    if text.trim().is_empty() {
        return Err(ExtractError::NotFound);
    }

    let mut malformed: Option<String> = None;
    for caps in marker_pattern().captures_iter(text) {
        let span = caps.get(1).map(|m| m.as_str()).unwrap_or("");
        if span.len() == IDENTIFIER_LEN {
            return Ok(span.to_ascii_lowercase());
        }
        if malformed.is_none() {
            malformed = Some(span.to_string());
        }
    }

    match malformed {
        Some(found) => Err(ExtractError::Malformed { found }),
        None => Err(ExtractError::NotFound),
    }
}

/// True when `candidate` is already a canonical identifier.
pub fn is_canonical(candidate: &str) -> bool {
    candidate.len() == IDENTIFIER_LEN
        && candidate
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "507f1f77bcf86cd799439011";

    #[test]
    fn colon_space_separator() {
        let text = format!("JEE Advanced 2019 Paper 1 ... Question ID: {ID}");
        assert_eq!(extract(&text).unwrap(), ID);
    }

    #[test]
    fn colon_no_space_separator() {
        let text = format!("Question ID:{ID} trailing words");
        assert_eq!(extract(&text).unwrap(), ID);
    }

    #[test]
    fn space_only_separator() {
        let text = format!("NCERT exemplar Question ID {ID}");
        assert_eq!(extract(&text).unwrap(), ID);
    }

    #[test]
    fn space_before_colon_separator() {
        let text = format!("Question ID : {ID}");
        assert_eq!(extract(&text).unwrap(), ID);
        let text = format!("Question ID :{ID}");
        assert_eq!(extract(&text).unwrap(), ID);
    }

    #[test]
    fn marker_must_be_whole_words() {
        let text = "This question identifies the limiting reagent";
        assert_eq!(extract(text), Err(ExtractError::NotFound));
        let text = format!("subquestion id: {ID}");
        assert_eq!(extract(&text), Err(ExtractError::NotFound));
    }

    #[test]
    fn uppercase_hex_is_normalized() {
        let text = format!("question id: {}", ID.to_uppercase());
        assert_eq!(extract(&text).unwrap(), ID);
    }

    #[test]
    fn marker_is_case_insensitive() {
        let text = format!("QUESTION ID: {ID}");
        assert_eq!(extract(&text).unwrap(), ID);
    }

    #[test]
    fn short_span_is_malformed() {
        let err = extract("Question ID: 507f1f77bcf86cd79943901").unwrap_err();
        assert_eq!(
            err,
            ExtractError::Malformed {
                found: "507f1f77bcf86cd79943901".into()
            }
        );
    }

    #[test]
    fn long_span_is_not_truncated() {
        let text = format!("Question ID: {ID}ab");
        assert!(matches!(extract(&text), Err(ExtractError::Malformed { .. })));
    }

    #[test]
    fn missing_marker_is_not_found() {
        assert_eq!(extract(&format!("just {ID}")), Err(ExtractError::NotFound));
    }

    #[test]
    fn empty_text_is_not_found() {
        assert_eq!(extract(""), Err(ExtractError::NotFound));
        assert_eq!(extract("   \n"), Err(ExtractError::NotFound));
    }

    #[test]
    fn first_valid_marker_wins() {
        let text = format!("Question ID: 12ab then Question ID: {ID} and Question ID: 507f191e810c19729de860ea");
        assert_eq!(extract(&text).unwrap(), ID);
    }

    #[test]
    fn canonical_check() {
        assert!(is_canonical(ID));
        assert!(!is_canonical(&ID.to_uppercase()));
        assert!(!is_canonical(&ID[..23]));
    }
}
