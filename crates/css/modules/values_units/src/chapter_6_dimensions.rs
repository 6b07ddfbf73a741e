//! CSS Values & Units Level 3: §6 Dimensions (Lengths subset)
//! Spec: <https://www.w3.org/TR/css-values-3/#lengths>

use crate::{ParseError, next_token};
use cssparser::{Parser, Token};

/// Supported subset of CSS <length> units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LengthUnit {
    Pixels,
    Ems,
    RootEms,
    ViewportWidth,
    ViewportHeight,
    Points,
    Picas,
    Inches,
    Centimeters,
    Millimeters,
}

impl LengthUnit {
    /// Map a dimension suffix (case-insensitive) to its unit.
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        let unit = match suffix.to_ascii_lowercase().as_str() {
            "px" => Self::Pixels,
            "em" => Self::Ems,
            "rem" => Self::RootEms,
            "vw" => Self::ViewportWidth,
            "vh" => Self::ViewportHeight,
            "pt" => Self::Points,
            "pc" => Self::Picas,
            "in" => Self::Inches,
            "cm" => Self::Centimeters,
            "mm" => Self::Millimeters,
            _ => return None,
        };
        Some(unit)
    }
}

/// A CSS <length> value with unit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Length {
    pub value: f32,
    pub unit: LengthUnit,
}

impl Length {
    /// A length in CSS pixels.
    #[inline]
    pub const fn px(value: f32) -> Self {
        Self {
            value,
            unit: LengthUnit::Pixels,
        }
    }
}

/// Parse a CSS <length> (§6.2). Unitless zero is accepted as `0px`.
///
/// # Errors
/// Returns `ParseError::UnexpectedToken` when the next token is not a supported `<length>`.
pub fn parse_length(input: &mut Parser) -> Result<Length, ParseError> {
    match next_token(input)? {
        Token::Dimension { value, unit, .. } => {
            let unit_kind =
                LengthUnit::from_suffix(unit.as_ref()).ok_or(ParseError::UnexpectedToken)?;
            Ok(Length {
                value,
                unit: unit_kind,
            })
        }
        Token::Number { value: 0.0, .. } => Ok(Length::px(0.0)),
        _ => Err(ParseError::UnexpectedToken),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_complete;

    #[test]
    fn units_are_case_insensitive() {
        assert_eq!(parse_complete("12PX", parse_length), Ok(Length::px(12.0)));
        assert_eq!(
            parse_complete("1.5em", parse_length),
            Ok(Length {
                value: 1.5,
                unit: LengthUnit::Ems
            })
        );
    }

    #[test]
    fn unitless_zero_only() {
        assert_eq!(parse_complete("0", parse_length), Ok(Length::px(0.0)));
        assert_eq!(
            parse_complete("3", parse_length),
            Err(ParseError::UnexpectedToken)
        );
        assert_eq!(
            parse_complete("3furlongs", parse_length),
            Err(ParseError::UnexpectedToken)
        );
    }
}
