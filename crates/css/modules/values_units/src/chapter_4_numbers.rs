//! CSS Values & Units Level 3: §4 Numbers
//! Spec: <https://www.w3.org/TR/css-values-3/#numeric-types>

use crate::{ParseError, next_token};
use cssparser::{Parser, Token};

/// A CSS <number>
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Number(pub f32);

/// Parse a CSS <number> (§4.2). Accepts integer or real numbers.
///
/// # Errors
/// Returns `ParseError::UnexpectedToken` when the next token is not a `<number>`,
/// `ParseError::OutOfRange` for non-finite numbers and `ParseError::UnexpectedEnd` at the end
/// of input.
pub fn parse_number(input: &mut Parser) -> Result<Number, ParseError> {
    match next_token(input)? {
        Token::Number { value, .. } if value.is_finite() => Ok(Number(value)),
        Token::Number { .. } => Err(ParseError::OutOfRange),
        _ => Err(ParseError::UnexpectedToken),
    }
}
