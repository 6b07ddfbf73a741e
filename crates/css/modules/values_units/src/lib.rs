//! Typed property values and the value grammars that produce them.
//!
//! Every grammar reads a single value segment with `cssparser` and yields a [`Value`]. The
//! property specification attaches grammars to property definitions through the
//! [`ValueParser`] trait; [`Grammar`] is the serializable descriptor used by manifests.

#![forbid(unsafe_code)]

// Per-chapter modules mirroring the CSS Values & Units table of contents.
pub mod chapter_3_identifiers;
pub mod chapter_4_numbers;
pub mod chapter_5_percentages;
pub mod chapter_6_dimensions;
pub mod chapter_9_colors;
pub mod grammar;
mod value;

pub use chapter_3_identifiers::{Ident, parse_ident, parse_keyword, parse_string};
pub use chapter_4_numbers::{Number, parse_number};
pub use chapter_5_percentages::{Percentage, parse_percentage};
pub use chapter_6_dimensions::{Length, LengthUnit, parse_length};
pub use chapter_9_colors::{Color, parse_color};
pub use grammar::{
    ColorParser, Grammar, KeywordParser, LengthParser, NumberParser, PercentParser, StringParser,
    ValueParser,
};
pub use value::Value;

use cssparser::{Parser, ParserInput, Token};

/// Parse error for the value grammars in this crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The next token did not match the expected grammar.
    #[error("unexpected token")]
    UnexpectedToken,
    /// The input ended before a value was read.
    #[error("unexpected end of input")]
    UnexpectedEnd,
    /// A value was read but more tokens followed it.
    #[error("trailing input after value")]
    TrailingInput,
    /// An identifier was read that the grammar does not list.
    #[error("unknown keyword")]
    UnknownKeyword,
    /// A numeric component fell outside its allowed range.
    #[error("value out of range")]
    OutOfRange,
}

/// Run `parse` over the whole of `text`, requiring that nothing but whitespace follows the value.
///
/// # Errors
/// Returns the grammar's own error, or `ParseError::TrailingInput` when tokens remain.
pub fn parse_complete<T, F>(text: &str, parse: F) -> Result<T, ParseError>
where
    F: for<'input, 'tokens> FnOnce(&mut Parser<'input, 'tokens>) -> Result<T, ParseError>,
{
    let mut input = ParserInput::new(text);
    let mut parser = Parser::new(&mut input);
    let value = parse(&mut parser)?;
    parser
        .expect_exhausted()
        .map_err(|_| ParseError::TrailingInput)?;
    Ok(value)
}

/// Read the next non-whitespace token as an owned value.
pub(crate) fn next_token<'input>(
    input: &mut Parser<'input, '_>,
) -> Result<Token<'input>, ParseError> {
    input.next().cloned().map_err(|_| ParseError::UnexpectedEnd)
}
