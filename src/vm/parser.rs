//! Program text parser.
//!
//! An Intcode program is a single line of comma-separated decimal
//! integers, optionally signed:
//!
//! ```text
//! 1,9,10,3,2,3,11,0,99,30,40,50
//! ```
//!
//! No other separators or whitespace are recognized.

use thiserror::Error;

/// Parse program text into the ordered code sequence.
///
/// Every comma-separated field must be a base-10 integer; the first
/// field that is not fails the whole parse.
pub fn parse(program: &str) -> Result<Vec<i64>, ParseError> {
    program
        .split(',')
        .enumerate()
        .map(|(field, token)| {
            token.parse::<i64>().map_err(|_| ParseError::BadToken {
                field,
                token: token.to_string(),
            })
        })
        .collect()
}

/// Errors that can occur while parsing program text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("field {field} is not an integer: {token:?}")]
    BadToken { field: usize, token: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_simple() {
        let codes = parse("1,9,10,3,2,3,11,0,99,30,40,50").unwrap();
        assert_eq!(codes, vec![1, 9, 10, 3, 2, 3, 11, 0, 99, 30, 40, 50]);
    }

    #[test]
    fn test_parse_negative() {
        let codes = parse("109,1,204,-1,99").unwrap();
        assert_eq!(codes, vec![109, 1, 204, -1, 99]);
    }

    #[test]
    fn test_parse_single_code() {
        assert_eq!(parse("99").unwrap(), vec![99]);
    }

    #[test]
    fn test_parse_large_literal() {
        assert_eq!(
            parse("104,1125899906842624,99").unwrap(),
            vec![104, 1125899906842624, 99]
        );
    }

    #[test]
    fn test_parse_bad_token() {
        let err = parse("1,2,x,4").unwrap_err();
        assert_eq!(
            err,
            ParseError::BadToken {
                field: 2,
                token: "x".to_string()
            }
        );
    }

    #[test]
    fn test_parse_rejects_whitespace() {
        assert!(parse("1, 2").is_err());
        assert!(parse("1,2\n").is_err());
    }

    #[test]
    fn test_parse_rejects_empty_field() {
        assert!(parse("1,,2").is_err());
        assert!(parse("").is_err());
    }

    proptest! {
        #[test]
        fn parse_roundtrips_serialized_codes(codes in proptest::collection::vec(any::<i64>(), 1..64)) {
            let text = codes
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join(",");
            prop_assert_eq!(parse(&text).unwrap(), codes);
        }
    }
}
