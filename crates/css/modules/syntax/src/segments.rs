//! Splitting a declaration value into shorthand segments.

use cssparser::{ParseError, Parser, ParserInput, SourcePosition, Token};
use serde::Deserialize;

/// How a comma between two value components is treated when segmenting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommaPolicy {
    /// A comma glues its neighbours into one segment (`Arial, serif` stays whole).
    #[default]
    Join,
    /// A comma ends the current segment and is dropped.
    Split,
}

/// Failure to segment a value string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SegmentError {
    /// A closing bracket without an opener, or a block left open at the end of input.
    #[error("unbalanced brackets in value")]
    Unbalanced,
    /// An unterminated string or malformed `url(`.
    #[error("malformed token in value")]
    BadToken,
}

/// Span of the segment being accumulated.
#[derive(Clone, Copy)]
struct Span {
    start: SourcePosition,
    end: SourcePosition,
}

/// Closing character expected after a block opened by `token`, if it opens one.
const fn block_closer(token: &Token) -> Option<char> {
    match *token {
        Token::Function(_) | Token::ParenthesisBlock => Some(')'),
        Token::SquareBracketBlock => Some(']'),
        Token::CurlyBracketBlock => Some('}'),
        _ => None,
    }
}

/// Split `text` into whitespace-separated value segments.
///
/// Function calls, bracketed blocks and quoted strings are kept whole, so `rgb(1, 2, 3)`
/// is one segment. `;` always ends a segment. Commas follow `policy`. Segments are slices of
/// the input text; quotes are preserved for the value grammars to interpret.
///
/// # Errors
/// Returns `SegmentError::Unbalanced` for stray closers or unclosed blocks and
/// `SegmentError::BadToken` for unterminated strings or bad urls.
pub fn split_value_segments(text: &str, policy: CommaPolicy) -> Result<Vec<String>, SegmentError> {
    let mut input = ParserInput::new(text);
    let mut parser = Parser::new(&mut input);
    let mut segments = Vec::new();
    let mut current: Option<Span> = None;
    // Whitespace seen since the last component.
    let mut gap = false;
    // The last component was a joining comma.
    let mut joining = false;

    loop {
        let before = parser.position();
        let Ok(token) = parser.next_including_whitespace_and_comments().cloned() else {
            break;
        };
        match token {
            Token::WhiteSpace(_) | Token::Comment(_) => gap = true,
            Token::Semicolon | Token::Comma => {
                joining = matches!(token, Token::Comma) && policy == CommaPolicy::Join;
                if joining {
                    extend(&mut current, before, parser.position());
                } else {
                    flush(&parser, &mut current, &mut segments);
                }
                gap = false;
            }
            Token::CloseParenthesis | Token::CloseSquareBracket | Token::CloseCurlyBracket => {
                return Err(SegmentError::Unbalanced);
            }
            Token::BadString(_) | Token::BadUrl(_) => return Err(SegmentError::BadToken),
            component => {
                if let Some(closer) = block_closer(&component) {
                    let skipped: Result<(), ParseError<'_, ()>> =
                        parser.parse_nested_block(|nested| {
                            while nested.next_including_whitespace_and_comments().is_ok() {}
                            Ok(())
                        });
                    if skipped.is_err() || !parser.slice_from(before).ends_with(closer) {
                        return Err(SegmentError::Unbalanced);
                    }
                }
                if gap && !joining {
                    flush(&parser, &mut current, &mut segments);
                }
                extend(&mut current, before, parser.position());
                gap = false;
                joining = false;
            }
        }
    }
    flush(&parser, &mut current, &mut segments);
    Ok(segments)
}

/// Grow the current span to `end`, or start one at `start`.
fn extend(current: &mut Option<Span>, start: SourcePosition, end: SourcePosition) {
    let first = current.map_or(start, |span| span.start);
    *current = Some(Span { start: first, end });
}

/// Push the accumulated span, if any, as a segment.
fn flush(parser: &Parser, current: &mut Option<Span>, segments: &mut Vec<String>) {
    if let Some(span) = current.take() {
        let text = parser.slice(span.start..span.end).trim();
        if !text.is_empty() {
            segments.push(text.to_owned());
        }
    }
}
