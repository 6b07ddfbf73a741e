use core::fmt;

use crate::{Color, Ident, Length, LengthUnit, Percentage};

/// A typed property value produced by a value grammar.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// A unitless `<number>`.
    Number(f32),
    /// A `<length>` with its unit.
    Length(Length),
    /// A `<percentage>` stored as a fraction.
    Percentage(Percentage),
    /// A resolved `<color>`.
    Color(Color),
    /// One of the keywords a property accepts.
    Keyword(Ident),
    /// Free-form text such as a font family list.
    String(String),
}

impl Value {
    /// Shorthand for a pixel length value.
    #[inline]
    pub const fn px(value: f32) -> Self {
        Self::Length(Length::px(value))
    }

    /// Shorthand for a keyword value; the name is lowercased.
    #[inline]
    pub fn keyword(name: &str) -> Self {
        Self::Keyword(Ident(name.to_ascii_lowercase()))
    }
}

const fn unit_suffix(unit: LengthUnit) -> &'static str {
    match unit {
        LengthUnit::Pixels => "px",
        LengthUnit::Ems => "em",
        LengthUnit::RootEms => "rem",
        LengthUnit::ViewportWidth => "vw",
        LengthUnit::ViewportHeight => "vh",
        LengthUnit::Points => "pt",
        LengthUnit::Picas => "pc",
        LengthUnit::Inches => "in",
        LengthUnit::Centimeters => "cm",
        LengthUnit::Millimeters => "mm",
    }
}

impl fmt::Display for Value {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(number) => write!(formatter, "{number}"),
            Self::Length(length) => {
                write!(formatter, "{}{}", length.value, unit_suffix(length.unit))
            }
            Self::Percentage(Percentage(fraction)) => write!(formatter, "{}%", fraction * 100.0),
            Self::Color(color) => write!(
                formatter,
                "rgba({}, {}, {}, {})",
                color.red, color.green, color.blue, color.alpha
            ),
            Self::Keyword(ident) => formatter.write_str(ident.as_str()),
            Self::String(text) => write!(formatter, "{text:?}"),
        }
    }
}
