//! Composite string parsing - split "1h 30min 500,000ms" into terms

use serde::{Deserialize, Serialize};
use mensura_core::MeasureError;
use tracing::debug;

use crate::Result;

/// One numeric literal and the unit name that follows it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    /// Decimal literal with thousands separators removed
    pub literal: String,
    /// Raw unit name; multi-word names are joined by single spaces
    pub unit: String,
}

impl Term {
    fn new(literal: &str, unit: &str) -> Self {
        Term {
            literal: literal.replace(',', ""),
            unit: unit.to_string(),
        }
    }
}

/// Token classes, decided per whitespace-separated token
#[derive(Debug, PartialEq)]
enum Token<'a> {
    /// "1243minutes"
    Fused(&'a str, &'a str),
    /// "1,234.5"
    Number(&'a str),
    /// "min"
    Word(&'a str),
    Invalid,
}

fn is_numeric(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit() || b == b',' || b == b'.')
        && s.bytes().any(|b| b.is_ascii_digit())
}

fn is_word(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphabetic())
}

fn classify(token: &str) -> Token<'_> {
    let split = token.find(|c: char| c.is_ascii_alphabetic()).unwrap_or(token.len());
    let (head, tail) = token.split_at(split);

    match (head.is_empty(), tail.is_empty()) {
        (false, true) if is_numeric(head) => Token::Number(head),
        (true, false) if is_word(tail) => Token::Word(tail),
        (false, false) if is_numeric(head) && is_word(tail) => Token::Fused(head, tail),
        _ => Token::Invalid,
    }
}

/// Tokenize a composite measurement string
///
/// Left to right, no backtracking: a number (bare or fused with its unit)
/// closes the pending term, words extend the pending term's unit name.
pub fn parse_composite(text: &str) -> Result<Vec<Term>> {
    let mut terms = Vec::new();
    let mut pending: Option<Term> = None;

    for token in text.split_whitespace() {
        let (literal, unit) = match classify(token) {
            Token::Number(literal) => (literal, ""),
            Token::Fused(literal, unit) => (literal, unit),
            Token::Word(word) => {
                let term = pending.as_mut()
                    .ok_or_else(|| MeasureError::UnitWithoutValue(word.to_string()))?;
                if !term.unit.is_empty() {
                    term.unit.push(' ');
                }
                term.unit.push_str(word);
                continue;
            }
            Token::Invalid => return Err(MeasureError::InvalidToken(token.to_string())),
        };

        if let Some(previous) = pending.take() {
            if previous.unit.is_empty() {
                return Err(MeasureError::AdjacentNumericTokens(token.to_string()));
            }
            terms.push(previous);
        }
        pending = Some(Term::new(literal, unit));
    }

    match pending {
        Some(term) if term.unit.is_empty() => return Err(MeasureError::MissingUnit(term.literal)),
        Some(term) => terms.push(term),
        None => {}
    }

    if terms.is_empty() {
        return Err(MeasureError::InvalidFormat(text.to_string()));
    }

    debug!(input = text, terms = terms.len(), "parsed composite string");
    Ok(terms)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term(literal: &str, unit: &str) -> Term {
        Term { literal: literal.to_string(), unit: unit.to_string() }
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify("12"), Token::Number("12"));
        assert_eq!(classify("1,234.5"), Token::Number("1,234.5"));
        assert_eq!(classify("min"), Token::Word("min"));
        assert_eq!(classify("1243minutes"), Token::Fused("1243", "minutes"));
        assert_eq!(classify("1h30min"), Token::Invalid);
        assert_eq!(classify("-5"), Token::Invalid);
        assert_eq!(classify(".,"), Token::Invalid);
        assert_eq!(classify("kg2"), Token::Invalid);
        assert_eq!(classify("µs"), Token::Invalid);
    }

    #[test]
    fn test_spaced_and_fused_terms() {
        let terms = parse_composite("2h 15 min 500,000ms").unwrap();
        assert_eq!(terms, vec![term("2", "h"), term("15", "min"), term("500000", "ms")]);
    }

    #[test]
    fn test_fused_token() {
        assert_eq!(parse_composite("1243minutes").unwrap(), vec![term("1243", "minutes")]);
    }

    #[test]
    fn test_multi_word_unit() {
        let terms = parse_composite("3 fl  oz 2 cups").unwrap();
        assert_eq!(terms, vec![term("3", "fl oz"), term("2", "cups")]);
    }

    #[test]
    fn test_thousands_separator_stripped() {
        assert_eq!(parse_composite("1,234.5 kg").unwrap(), vec![term("1234.5", "kg")]);
    }

    #[test]
    fn test_repeated_whitespace_skipped() {
        let terms = parse_composite("  1h \t\n 30min  ").unwrap();
        assert_eq!(terms, vec![term("1", "h"), term("30", "min")]);
    }

    #[test]
    fn test_adjacent_numbers() {
        let err = parse_composite("1 2 kg").unwrap_err();
        assert_eq!(err, MeasureError::AdjacentNumericTokens("2".to_string()));

        let err = parse_composite("1 2kg").unwrap_err();
        assert_eq!(err, MeasureError::AdjacentNumericTokens("2kg".to_string()));
    }

    #[test]
    fn test_unit_without_value() {
        let err = parse_composite("kg 5").unwrap_err();
        assert_eq!(err, MeasureError::UnitWithoutValue("kg".to_string()));
    }

    #[test]
    fn test_invalid_token() {
        let err = parse_composite("1h 30-min").unwrap_err();
        assert_eq!(err, MeasureError::InvalidToken("30-min".to_string()));
    }

    #[test]
    fn test_trailing_number() {
        let err = parse_composite("1h 30").unwrap_err();
        assert_eq!(err, MeasureError::MissingUnit("30".to_string()));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse_composite("").unwrap_err(), MeasureError::InvalidFormat(String::new()));
        assert!(matches!(parse_composite(" \t ").unwrap_err(), MeasureError::InvalidFormat(_)));
    }

    #[test]
    fn test_terms_serialize() {
        let terms = parse_composite("1,500 fl oz 2h").unwrap();
        let json = serde_json::to_string(&terms).unwrap();
        assert_eq!(json, r#"[{"literal":"1500","unit":"fl oz"},{"literal":"2","unit":"h"}]"#);

        let restored: Vec<Term> = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, terms);
    }
}
