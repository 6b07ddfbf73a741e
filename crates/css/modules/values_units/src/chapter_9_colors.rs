//! CSS Values & Units Level 3: §9 Colors (subset)
//! Spec: <https://www.w3.org/TR/css-color-3/>

use crate::{ParseError, next_token};
use cssparser::{ParseError as CssParseError, Parser, Token};

/// Bit count used to duplicate a single hex nibble into a full byte.
const NIBBLE_SHIFT: u32 = 4;

/// A minimal RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

impl Color {
    /// An opaque color from its three channels.
    #[inline]
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha: u8::MAX,
        }
    }
}

/// Convert an ASCII hex digit to its numeric value.
pub const fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

/// Parse a 3/4/6/8-digit hex color body (without the leading `#`).
fn parse_hex_color(text: &str) -> Option<Color> {
    let nibbles = text
        .bytes()
        .map(hex_value)
        .collect::<Option<Vec<u8>>>()?;
    let channels: Vec<u8> = match nibbles.len() {
        // Duplicate nibble (e.g., a -> aa)
        3 | 4 => nibbles
            .iter()
            .map(|nibble| nibble.wrapping_shl(NIBBLE_SHIFT) | nibble)
            .collect(),
        6 | 8 => nibbles
            .chunks_exact(2)
            .map(|pair| match *pair {
                [high, low] => high.wrapping_shl(NIBBLE_SHIFT) | low,
                _ => 0,
            })
            .collect(),
        _ => return None,
    };
    match *channels.as_slice() {
        [red, green, blue] => Some(Color::rgb(red, green, blue)),
        [red, green, blue, alpha] => Some(Color {
            red,
            green,
            blue,
            alpha,
        }),
        _ => None,
    }
}

/// Map a CSS named color keyword to an RGBA value.
///
/// Names made only of hex digits are refused so that bare hex bodies such as `fab` are not
/// read as colors.
fn named_color(name: &str) -> Option<Color> {
    if name.bytes().all(|byte| byte.is_ascii_hexdigit()) {
        return None;
    }
    let parsed: csscolorparser::Color = name.parse().ok()?;
    let [red, green, blue, alpha] = parsed.to_rgba8();
    Some(Color {
        red,
        green,
        blue,
        alpha,
    })
}

/// Convert a numeric or percentage channel into `0..=255`.
fn channel_value(token: &Token) -> Result<u8, ParseError> {
    let scaled = match *token {
        Token::Number { value, .. } => value,
        Token::Percentage { unit_value, .. } => unit_value * f32::from(u8::MAX),
        _ => return Err(ParseError::UnexpectedToken),
    };
    if !(0.0..=f32::from(u8::MAX)).contains(&scaled) {
        return Err(ParseError::OutOfRange);
    }
    // In range and rounded, so the cast cannot truncate.
    Ok(scaled.round() as u8)
}

/// Parse the argument list of `rgb()`/`rgba()`.
///
/// Components are integers or percentages separated by commas or whitespace; an optional
/// fourth component is the alpha channel in the same `0..=255` scale.
fn parse_rgb_arguments(name: &str, input: &mut Parser) -> Result<Color, ParseError> {
    let lowercase = name.to_ascii_lowercase();
    if lowercase != "rgb" && lowercase != "rgba" {
        return Err(ParseError::UnexpectedToken);
    }
    let mut comps: Vec<u8> = Vec::with_capacity(4);
    let mut failure = None;
    // The nested block must be read to its end, so the first error is held until then.
    while let Ok(token) = input.next() {
        if failure.is_some() || matches!(token, Token::Comma) {
            continue;
        }
        if comps.len() == 4 {
            failure = Some(ParseError::TrailingInput);
            continue;
        }
        failure = channel_value(token).map(|value| comps.push(value)).err();
    }
    if let Some(error) = failure {
        return Err(error);
    }
    match *comps.as_slice() {
        [red, green, blue] => Ok(Color::rgb(red, green, blue)),
        [red, green, blue, alpha] => Ok(Color {
            red,
            green,
            blue,
            alpha,
        }),
        _ => Err(ParseError::UnexpectedEnd),
    }
}

/// Parse a CSS <color> (subset).
///
/// Supports hex notation, the CSS named colors and `rgb()`/`rgba()`.
///
/// # Errors
/// Returns `ParseError::UnexpectedToken` for unsupported or malformed input,
/// `ParseError::OutOfRange` for channels outside `0..=255` and `ParseError::TrailingInput`
/// for a fifth `rgb()` component.
pub fn parse_color(input: &mut Parser) -> Result<Color, ParseError> {
    match next_token(input)? {
        Token::Hash(value) | Token::IDHash(value) => {
            parse_hex_color(value.as_ref()).ok_or(ParseError::UnexpectedToken)
        }
        Token::Ident(name) => named_color(name.as_ref()).ok_or(ParseError::UnknownKeyword),
        Token::Function(name) => {
            let result: Result<Result<Color, ParseError>, CssParseError<'_, ()>> = input
                .parse_nested_block(|nested| Ok(parse_rgb_arguments(name.as_ref(), nested)));
            result.unwrap_or(Err(ParseError::UnexpectedToken))
        }
        _ => Err(ParseError::UnexpectedToken),
    }
}
