//! CSS Identifiers and strings (keywords and free-form text values)
//! Spec: <https://www.w3.org/TR/CSS2/syndata.html#value-def-identifier>

use crate::{ParseError, next_token};
use cssparser::{Parser, Token};

/// A CSS identifier value, lowercased for canonicalization.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Ident(pub String);

impl Ident {
    /// Borrow the canonical (lowercase) spelling.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Parse a CSS identifier token.
///
/// # Errors
/// Returns `ParseError::UnexpectedToken` when the next token is not an identifier.
#[inline]
pub fn parse_ident(input: &mut Parser) -> Result<Ident, ParseError> {
    match next_token(input)? {
        Token::Ident(text) => Ok(Ident(text.as_ref().to_ascii_lowercase())),
        _ => Err(ParseError::UnexpectedToken),
    }
}

/// Parse an identifier that must be one of `keywords` (compared ASCII case-insensitively).
///
/// # Errors
/// Returns `ParseError::UnknownKeyword` when the identifier is not listed, or the error of
/// [`parse_ident`] when the token is not an identifier at all.
pub fn parse_keyword(input: &mut Parser, keywords: &[String]) -> Result<Ident, ParseError> {
    let ident = parse_ident(input)?;
    if keywords
        .iter()
        .any(|keyword| keyword.eq_ignore_ascii_case(ident.as_str()))
    {
        Ok(ident)
    } else {
        Err(ParseError::UnknownKeyword)
    }
}

/// Parse a quoted CSS string, returning its unescaped contents.
///
/// # Errors
/// Returns `ParseError::UnexpectedToken` when the next token is not a quoted string.
pub fn parse_string(input: &mut Parser) -> Result<String, ParseError> {
    match next_token(input)? {
        Token::QuotedString(text) => Ok(text.as_ref().to_owned()),
        _ => Err(ParseError::UnexpectedToken),
    }
}
