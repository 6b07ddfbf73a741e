//! Value grammars attached to property definitions.
//!
//! A property definition holds an ordered list of [`ValueParser`]s and accepts a value when
//! any of them does. The built-in grammars cover the usual property value types; callers may
//! implement the trait for anything else.

use core::fmt::Debug;
use std::sync::Arc;

use cssparser::Parser;
use serde::Deserialize;

use crate::{
    ParseError, Value, parse_color, parse_complete, parse_keyword, parse_length, parse_number,
    parse_percentage, parse_string,
};

/// Parses one value segment into a typed [`Value`].
pub trait ValueParser: Debug + Send + Sync {
    /// Grammar name used in diagnostics.
    fn name(&self) -> &str;

    /// Parse `text`, which must be consumed entirely.
    ///
    /// # Errors
    /// Returns a [`ParseError`] when `text` does not match this grammar.
    fn parse_value(&self, text: &str) -> Result<Value, ParseError>;
}

/// `<number>`
#[derive(Clone, Copy, Debug, Default)]
pub struct NumberParser;

impl ValueParser for NumberParser {
    fn name(&self) -> &str {
        "number"
    }

    fn parse_value(&self, text: &str) -> Result<Value, ParseError> {
        parse_complete(text, parse_number).map(|number| Value::Number(number.0))
    }
}

/// `<percentage>`
#[derive(Clone, Copy, Debug, Default)]
pub struct PercentParser;

impl ValueParser for PercentParser {
    fn name(&self) -> &str {
        "percent"
    }

    fn parse_value(&self, text: &str) -> Result<Value, ParseError> {
        parse_complete(text, parse_percentage).map(Value::Percentage)
    }
}

/// `<length>`, optionally widened to percentages and unitless numbers.
#[derive(Clone, Copy, Debug, Default)]
pub struct LengthParser {
    /// Accept `<percentage>` as well.
    pub percent: bool,
    /// Accept unitless `<number>` as well.
    pub number: bool,
}

impl LengthParser {
    /// `<length>` only.
    pub const LENGTH: Self = Self {
        percent: false,
        number: false,
    };
    /// `<length> | <percentage>`
    pub const LENGTH_PERCENT: Self = Self {
        percent: true,
        number: false,
    };
    /// `<number> | <length> | <percentage>`
    pub const NUMBER_LENGTH_PERCENT: Self = Self {
        percent: true,
        number: true,
    };

    fn parse_one(self, input: &mut Parser) -> Result<Value, ParseError> {
        if let Ok(length) = input.try_parse(parse_length) {
            return Ok(Value::Length(length));
        }
        if self.percent
            && let Ok(percentage) = input.try_parse(parse_percentage)
        {
            return Ok(Value::Percentage(percentage));
        }
        if self.number {
            return parse_number(input).map(|number| Value::Number(number.0));
        }
        Err(ParseError::UnexpectedToken)
    }
}

impl ValueParser for LengthParser {
    fn name(&self) -> &str {
        match (self.percent, self.number) {
            (false, false) => "length",
            (true, false) => "length_percent",
            (false, true) => "number_length",
            (true, true) => "number_length_percent",
        }
    }

    fn parse_value(&self, text: &str) -> Result<Value, ParseError> {
        let grammar = *self;
        parse_complete(text, |input| grammar.parse_one(input))
    }
}

/// One identifier out of a fixed keyword list.
#[derive(Clone, Debug, Default)]
pub struct KeywordParser {
    keywords: Vec<String>,
}

impl KeywordParser {
    /// Accept exactly the given keywords (ASCII case-insensitive).
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|keyword| keyword.as_ref().trim().to_ascii_lowercase())
                .filter(|keyword| !keyword.is_empty())
                .collect(),
        }
    }

    /// Build from a comma-separated keyword list such as `"auto, none"`.
    pub fn from_list(list: &str) -> Self {
        Self::new(list.split(','))
    }

    /// The accepted keywords, lowercased.
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }
}

impl ValueParser for KeywordParser {
    fn name(&self) -> &str {
        "keyword"
    }

    fn parse_value(&self, text: &str) -> Result<Value, ParseError> {
        parse_complete(text, |input| parse_keyword(input, &self.keywords)).map(Value::Keyword)
    }
}

/// Free-form text. A single quoted string is unquoted; anything else is kept verbatim.
#[derive(Clone, Copy, Debug, Default)]
pub struct StringParser;

impl ValueParser for StringParser {
    fn name(&self) -> &str {
        "string"
    }

    fn parse_value(&self, text: &str) -> Result<Value, ParseError> {
        let trimmed = text.trim();
        Ok(Value::String(
            parse_complete(trimmed, parse_string).unwrap_or_else(|_| trimmed.to_owned()),
        ))
    }
}

/// `<color>`
#[derive(Clone, Copy, Debug, Default)]
pub struct ColorParser;

impl ValueParser for ColorParser {
    fn name(&self) -> &str {
        "color"
    }

    fn parse_value(&self, text: &str) -> Result<Value, ParseError> {
        parse_complete(text, parse_color).map(Value::Color)
    }
}

/// Serializable description of a built-in grammar, used by specification manifests.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Grammar {
    Number,
    Percent,
    Length,
    LengthPercent,
    NumberLengthPercent,
    Keyword { keywords: Vec<String> },
    String,
    Color,
}

impl Grammar {
    /// Instantiate the parser this descriptor names.
    pub fn parser(&self) -> Arc<dyn ValueParser> {
        match self {
            Self::Number => Arc::new(NumberParser),
            Self::Percent => Arc::new(PercentParser),
            Self::Length => Arc::new(LengthParser::LENGTH),
            Self::LengthPercent => Arc::new(LengthParser::LENGTH_PERCENT),
            Self::NumberLengthPercent => Arc::new(LengthParser::NUMBER_LENGTH_PERCENT),
            Self::Keyword { keywords } => Arc::new(KeywordParser::new(keywords)),
            Self::String => Arc::new(StringParser),
            Self::Color => Arc::new(ColorParser),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, Length, LengthUnit, Percentage};

    #[test]
    fn length_family_widens_in_order() {
        let length = LengthParser::LENGTH;
        let percent = LengthParser::LENGTH_PERCENT;
        let all = LengthParser::NUMBER_LENGTH_PERCENT;

        assert_eq!(length.parse_value("4px"), Ok(Value::px(4.0)));
        assert_eq!(
            length.parse_value("50%"),
            Err(ParseError::UnexpectedToken)
        );
        assert_eq!(
            percent.parse_value("50%"),
            Ok(Value::Percentage(Percentage(0.5)))
        );
        assert_eq!(percent.parse_value("1.5"), Err(ParseError::UnexpectedToken));
        assert_eq!(all.parse_value("1.5"), Ok(Value::Number(1.5)));
        assert_eq!(all.parse_value("0"), Ok(Value::px(0.0)));
        assert_eq!(
            all.parse_value("2em"),
            Ok(Value::Length(Length {
                value: 2.0,
                unit: LengthUnit::Ems
            }))
        );
        assert_eq!(all.name(), "number_length_percent");
    }

    #[test]
    fn keyword_lists_trim_and_lowercase() {
        let parser = KeywordParser::from_list(" Auto , none,");
        assert_eq!(parser.keywords(), ["auto", "none"]);
        assert_eq!(parser.parse_value("NONE"), Ok(Value::keyword("none")));
        assert_eq!(
            parser.parse_value("auto none"),
            Err(ParseError::TrailingInput)
        );
    }

    #[test]
    fn strings_accept_anything() {
        assert_eq!(
            StringParser.parse_value(" Arial, sans-serif "),
            Ok(Value::String("Arial, sans-serif".to_owned()))
        );
        assert_eq!(
            StringParser.parse_value("'Open Sans'"),
            Ok(Value::String("Open Sans".to_owned()))
        );
        assert_eq!(
            StringParser.parse_value(""),
            Ok(Value::String(String::new()))
        );
    }

    #[test]
    fn grammar_descriptors_deserialize() -> Result<(), serde_json::Error> {
        let grammars: Vec<Grammar> = serde_json::from_str(
            r#"[
                {"kind": "color"},
                {"kind": "keyword", "keywords": ["auto"]},
                {"kind": "length_percent"}
            ]"#,
        )?;
        assert_eq!(
            grammars[0].parser().parse_value("red"),
            Ok(Value::Color(Color::rgb(255, 0, 0)))
        );
        assert_eq!(grammars[1].parser().parse_value("auto"), Ok(Value::keyword("auto")));
        assert_eq!(grammars[2].parser().name(), "length_percent");
        Ok(())
    }
}
