//! The built-in property set: box model, borders, overflow and fonts.
//!
//! Built-in properties and shorthands occupy fixed ids so callers can refer to them without a
//! name lookup. Anything registered afterwards is allocated past them.

use std::sync::Arc;

use css_syntax::CommaPolicy;
use css_values_units::{
    ColorParser, KeywordParser, LengthParser, NumberParser, StringParser, ValueParser,
};

use crate::definition::ShorthandType;
use crate::error::RegistrationError;
use crate::id::PropertyId;
use crate::specification::{PropertySpecification, SpecificationOptions};

/// Fixed ids of the built-in properties.
pub mod properties {
    use crate::id::PropertyId;

    pub const MARGIN_TOP: PropertyId = PropertyId::new(1);
    pub const MARGIN_RIGHT: PropertyId = PropertyId::new(2);
    pub const MARGIN_BOTTOM: PropertyId = PropertyId::new(3);
    pub const MARGIN_LEFT: PropertyId = PropertyId::new(4);
    pub const PADDING_TOP: PropertyId = PropertyId::new(5);
    pub const PADDING_RIGHT: PropertyId = PropertyId::new(6);
    pub const PADDING_BOTTOM: PropertyId = PropertyId::new(7);
    pub const PADDING_LEFT: PropertyId = PropertyId::new(8);
    pub const BORDER_TOP_WIDTH: PropertyId = PropertyId::new(9);
    pub const BORDER_RIGHT_WIDTH: PropertyId = PropertyId::new(10);
    pub const BORDER_BOTTOM_WIDTH: PropertyId = PropertyId::new(11);
    pub const BORDER_LEFT_WIDTH: PropertyId = PropertyId::new(12);
    pub const BORDER_TOP_COLOR: PropertyId = PropertyId::new(13);
    pub const BORDER_RIGHT_COLOR: PropertyId = PropertyId::new(14);
    pub const BORDER_BOTTOM_COLOR: PropertyId = PropertyId::new(15);
    pub const BORDER_LEFT_COLOR: PropertyId = PropertyId::new(16);
    pub const WIDTH: PropertyId = PropertyId::new(17);
    pub const HEIGHT: PropertyId = PropertyId::new(18);
    pub const OVERFLOW_X: PropertyId = PropertyId::new(19);
    pub const OVERFLOW_Y: PropertyId = PropertyId::new(20);
    pub const DISPLAY: PropertyId = PropertyId::new(21);
    pub const COLOR: PropertyId = PropertyId::new(22);
    pub const OPACITY: PropertyId = PropertyId::new(23);
    pub const FONT_FAMILY: PropertyId = PropertyId::new(24);
    pub const FONT_STYLE: PropertyId = PropertyId::new(25);
    pub const FONT_WEIGHT: PropertyId = PropertyId::new(26);
    pub const FONT_SIZE: PropertyId = PropertyId::new(27);
    pub const LINE_HEIGHT: PropertyId = PropertyId::new(28);
    pub const Z_INDEX: PropertyId = PropertyId::new(29);

    /// Slots used by the built-in properties, counting the invalid sentinel.
    pub const NUM_DEFINED: usize = 30;
}

/// Fixed ids of the built-in shorthands.
pub mod shorthands {
    use crate::id::ShorthandId;

    pub const MARGIN: ShorthandId = ShorthandId::new(1);
    pub const PADDING: ShorthandId = ShorthandId::new(2);
    pub const BORDER_WIDTH: ShorthandId = ShorthandId::new(3);
    pub const BORDER_COLOR: ShorthandId = ShorthandId::new(4);
    pub const BORDER_TOP: ShorthandId = ShorthandId::new(5);
    pub const BORDER_RIGHT: ShorthandId = ShorthandId::new(6);
    pub const BORDER_BOTTOM: ShorthandId = ShorthandId::new(7);
    pub const BORDER_LEFT: ShorthandId = ShorthandId::new(8);
    pub const BORDER: ShorthandId = ShorthandId::new(9);
    pub const OVERFLOW: ShorthandId = ShorthandId::new(10);
    pub const FONT: ShorthandId = ShorthandId::new(11);

    /// Slots used by the built-in shorthands, counting the invalid sentinel.
    pub const NUM_DEFINED: usize = 12;
}

const SIDES: [&str; 4] = ["top", "right", "bottom", "left"];

/// Register a property under its fixed id with the given grammars, in order.
fn define(
    spec: &mut PropertySpecification,
    id: PropertyId,
    name: &str,
    default_value: &str,
    (inherited, forces_layout): (bool, bool),
    parsers: &[Arc<dyn ValueParser>],
) -> Result<(), RegistrationError> {
    let definition = spec.register_property(name, default_value, inherited, forces_layout, id)?;
    for parser in parsers {
        definition.add_parser(Arc::clone(parser));
    }
    Ok(())
}

/// Register the built-in properties and shorthands under their fixed ids.
///
/// `spec` must reserve at least [`properties::NUM_DEFINED`] property slots and
/// [`shorthands::NUM_DEFINED`] shorthand slots, and none of them may be bound yet.
///
/// # Errors
/// Returns the first registration failure, which means the reserved slots were missing or
/// already taken.
pub fn register_default_properties(
    spec: &mut PropertySpecification,
) -> Result<(), RegistrationError> {
    const LAYOUT: (bool, bool) = (false, true);
    const PAINT: (bool, bool) = (false, false);
    const INHERITED_LAYOUT: (bool, bool) = (true, true);
    const INHERITED_PAINT: (bool, bool) = (true, false);

    let length: Arc<dyn ValueParser> = Arc::new(LengthParser::LENGTH);
    let length_percent: Arc<dyn ValueParser> = Arc::new(LengthParser::LENGTH_PERCENT);
    let number_length_percent: Arc<dyn ValueParser> = Arc::new(LengthParser::NUMBER_LENGTH_PERCENT);
    let number: Arc<dyn ValueParser> = Arc::new(NumberParser);
    let color: Arc<dyn ValueParser> = Arc::new(ColorParser);
    let auto: Arc<dyn ValueParser> = Arc::new(KeywordParser::from_list("auto"));
    let overflow: Arc<dyn ValueParser> =
        Arc::new(KeywordParser::from_list("visible, hidden, auto, scroll"));

    let margin_ids = [
        properties::MARGIN_TOP,
        properties::MARGIN_RIGHT,
        properties::MARGIN_BOTTOM,
        properties::MARGIN_LEFT,
    ];
    let padding_ids = [
        properties::PADDING_TOP,
        properties::PADDING_RIGHT,
        properties::PADDING_BOTTOM,
        properties::PADDING_LEFT,
    ];
    let width_ids = [
        properties::BORDER_TOP_WIDTH,
        properties::BORDER_RIGHT_WIDTH,
        properties::BORDER_BOTTOM_WIDTH,
        properties::BORDER_LEFT_WIDTH,
    ];
    let color_ids = [
        properties::BORDER_TOP_COLOR,
        properties::BORDER_RIGHT_COLOR,
        properties::BORDER_BOTTOM_COLOR,
        properties::BORDER_LEFT_COLOR,
    ];
    for (index, side) in SIDES.iter().enumerate() {
        define(
            spec,
            margin_ids[index],
            &format!("margin-{side}"),
            "0px",
            LAYOUT,
            &[Arc::clone(&length_percent), Arc::clone(&auto)],
        )?;
        define(
            spec,
            padding_ids[index],
            &format!("padding-{side}"),
            "0px",
            LAYOUT,
            &[Arc::clone(&length_percent)],
        )?;
        define(
            spec,
            width_ids[index],
            &format!("border-{side}-width"),
            "0px",
            LAYOUT,
            &[Arc::clone(&length)],
        )?;
        define(
            spec,
            color_ids[index],
            &format!("border-{side}-color"),
            "black",
            PAINT,
            &[Arc::clone(&color)],
        )?;
    }

    for (id, name) in [(properties::WIDTH, "width"), (properties::HEIGHT, "height")] {
        let parsers = [Arc::clone(&length_percent), Arc::clone(&auto)];
        define(spec, id, name, "auto", LAYOUT, &parsers)?;
    }
    for (id, name) in [
        (properties::OVERFLOW_X, "overflow-x"),
        (properties::OVERFLOW_Y, "overflow-y"),
    ] {
        define(spec, id, name, "visible", LAYOUT, &[Arc::clone(&overflow)])?;
    }
    define(
        spec,
        properties::DISPLAY,
        "display",
        "inline",
        LAYOUT,
        &[Arc::new(KeywordParser::from_list("none, block, inline, inline-block"))],
    )?;
    define(spec, properties::COLOR, "color", "white", INHERITED_PAINT, &[color])?;
    define(spec, properties::OPACITY, "opacity", "1", INHERITED_PAINT, &[Arc::clone(&number)])?;
    define(
        spec,
        properties::FONT_FAMILY,
        "font-family",
        "",
        INHERITED_LAYOUT,
        &[Arc::new(StringParser)],
    )?;
    define(
        spec,
        properties::FONT_STYLE,
        "font-style",
        "normal",
        INHERITED_LAYOUT,
        &[Arc::new(KeywordParser::from_list("normal, italic"))],
    )?;
    define(
        spec,
        properties::FONT_WEIGHT,
        "font-weight",
        "normal",
        INHERITED_LAYOUT,
        &[Arc::new(KeywordParser::from_list("normal, bold"))],
    )?;
    define(
        spec,
        properties::FONT_SIZE,
        "font-size",
        "12px",
        INHERITED_LAYOUT,
        &[Arc::clone(&number_length_percent)],
    )?;
    define(
        spec,
        properties::LINE_HEIGHT,
        "line-height",
        "1.2",
        INHERITED_LAYOUT,
        &[number_length_percent],
    )?;
    define(spec, properties::Z_INDEX, "z-index", "auto", PAINT, &[number, auto])?;

    for (id, name) in [
        (shorthands::MARGIN, "margin"),
        (shorthands::PADDING, "padding"),
    ] {
        let members = SIDES.map(|side| format!("{name}-{side}")).join(", ");
        spec.register_shorthand(name, &members, ShorthandType::Box, id)?;
    }
    for (id, name, suffix) in [
        (shorthands::BORDER_WIDTH, "border-width", "width"),
        (shorthands::BORDER_COLOR, "border-color", "color"),
    ] {
        let members = SIDES.map(|side| format!("border-{side}-{suffix}")).join(", ");
        spec.register_shorthand(name, &members, ShorthandType::Box, id)?;
    }
    let side_ids = [
        shorthands::BORDER_TOP,
        shorthands::BORDER_RIGHT,
        shorthands::BORDER_BOTTOM,
        shorthands::BORDER_LEFT,
    ];
    for (id, side) in side_ids.into_iter().zip(SIDES) {
        spec.register_shorthand(
            &format!("border-{side}"),
            &format!("border-{side}-width, border-{side}-color"),
            ShorthandType::FallThrough,
            id,
        )?;
    }
    spec.register_shorthand(
        "border",
        "border-top, border-right, border-bottom, border-left",
        ShorthandType::Recursive,
        shorthands::BORDER,
    )?;
    spec.register_shorthand(
        "overflow",
        "overflow-x, overflow-y",
        ShorthandType::Replicate,
        shorthands::OVERFLOW,
    )?;
    spec.register_shorthand(
        "font",
        "font-style, font-weight, font-size, font-family",
        ShorthandType::FallThrough,
        shorthands::FONT,
    )?;
    Ok(())
}

impl PropertySpecification {
    /// A specification holding exactly the built-in property set.
    ///
    /// # Errors
    /// Propagates a registration failure of [`register_default_properties`].
    pub fn with_default_properties(comma: CommaPolicy) -> Result<Self, RegistrationError> {
        let mut spec = Self::new(SpecificationOptions {
            reserve_properties: properties::NUM_DEFINED,
            reserve_shorthands: shorthands::NUM_DEFINED,
            comma,
        });
        register_default_properties(&mut spec)?;
        spec.assert_all_inserted(properties::NUM_DEFINED, shorthands::NUM_DEFINED);
        Ok(spec)
    }
}
