//! Expansion of shorthand values into leaf property values.
//!
//! Leaf values are staged in order and handed to the caller only once the whole expansion
//! succeeded. A failed member truncates the stage back to where its shorthand started, so an
//! atomic strategy that gives up leaves no trace, while a fall-through shorthand simply moves
//! on to its next member.

use css_syntax::split_value_segments;
use css_values_units::Value;
use log::{debug, trace};

use crate::definition::{ShorthandDefinition, ShorthandItem, ShorthandType};
use crate::id::{PropertyId, ShorthandId};
use crate::specification::PropertySpecification;

/// Leaf values staged while expanding one shorthand declaration.
pub(crate) struct Expansion<'spec> {
    spec: &'spec PropertySpecification,
    staged: Vec<(PropertyId, Value)>,
}

impl<'spec> Expansion<'spec> {
    pub(crate) const fn new(spec: &'spec PropertySpecification) -> Self {
        Self {
            spec,
            staged: Vec::new(),
        }
    }

    /// The staged values in resolution order; later entries win for repeated properties.
    pub(crate) fn into_values(self) -> Vec<(PropertyId, Value)> {
        self.staged
    }

    /// Expand the shorthand `id` over `text`, staging its leaf values.
    ///
    /// On failure the stage is restored to its state before the call.
    pub(crate) fn expand(&mut self, id: ShorthandId, text: &str) -> bool {
        let spec = self.spec;
        let Some(definition) = spec.shorthand(id) else {
            return false;
        };
        let mark = self.staged.len();
        let expanded = match definition.kind() {
            ShorthandType::Recursive => self.recursive(definition, text),
            ShorthandType::FallThrough => self
                .segments(definition, text)
                .is_some_and(|segments| self.fall_through(definition, &segments)),
            ShorthandType::Replicate => self
                .segments(definition, text)
                .is_some_and(|segments| self.replicate(definition, &segments)),
            ShorthandType::Box => self
                .segments(definition, text)
                .is_some_and(|segments| self.box_sides(definition, &segments)),
        };
        if !expanded {
            self.staged.truncate(mark);
        }
        expanded
    }

    fn segments(&self, definition: &ShorthandDefinition, text: &str) -> Option<Vec<String>> {
        match split_value_segments(text, self.spec.options().comma) {
            Ok(segments) if !segments.is_empty() => Some(segments),
            Ok(_) => {
                debug!("{}: empty value", definition.name());
                None
            }
            Err(err) => {
                debug!("{}: {err} in {text:?}", definition.name());
                None
            }
        }
    }

    /// Resolve one member against `text`, staging its value or values.
    fn resolve_item(&mut self, item: ShorthandItem, text: &str) -> bool {
        match item {
            ShorthandItem::Property(id) => {
                let Some(definition) = self.spec.property(id) else {
                    return false;
                };
                let Ok(value) = definition.parse_value(text) else {
                    return false;
                };
                trace!("{} = {value}", definition.name());
                self.staged.push((id, value));
                true
            }
            ShorthandItem::Shorthand(nested) => self.expand(nested, text),
        }
    }

    /// Each member tries the next unconsumed segment; a segment is consumed only when accepted.
    fn fall_through(&mut self, definition: &ShorthandDefinition, segments: &[String]) -> bool {
        let mut cursor = 0;
        for &item in definition.items() {
            let Some(segment) = segments.get(cursor) else {
                break;
            };
            if self.resolve_item(item, segment) {
                cursor += 1;
            }
        }
        if let Some(unused) = segments.get(cursor..).filter(|rest| !rest.is_empty()) {
            debug!("{}: no member accepted {unused:?}", definition.name());
        }
        true
    }

    /// One segment per member; members past the last segment repeat the last staged value.
    fn replicate(&mut self, definition: &ShorthandDefinition, segments: &[String]) -> bool {
        let start = self.staged.len();
        let Some(last_segment) = segments.last() else {
            return false;
        };
        for (index, &item) in definition.items().iter().enumerate() {
            if let Some(segment) = segments.get(index) {
                if !self.resolve_item(item, segment) {
                    return false;
                }
                continue;
            }
            let replicated = self
                .staged
                .get(start..)
                .and_then(<[_]>::last)
                .map(|(_, value)| value.clone());
            match (item, replicated) {
                (ShorthandItem::Property(id), Some(value)) => self.staged.push((id, value)),
                _ => {
                    if !self.resolve_item(item, last_segment) {
                        return false;
                    }
                }
            }
        }
        if segments.len() > definition.items().len() {
            debug!(
                "{}: ignoring {} extra segments",
                definition.name(),
                segments.len() - definition.items().len()
            );
        }
        true
    }

    /// CSS box assignment of one to four segments onto top, right, bottom and left.
    fn box_sides(&mut self, definition: &ShorthandDefinition, segments: &[String]) -> bool {
        let &[top, right, bottom, left] = definition.items() else {
            return false;
        };
        let sides = match segments {
            [all] => [all, all, all, all],
            [vertical, horizontal] => [vertical, horizontal, vertical, horizontal],
            [top_value, horizontal, bottom_value] => {
                [top_value, horizontal, bottom_value, horizontal]
            }
            [top_value, right_value, bottom_value, left_value] => {
                [top_value, right_value, bottom_value, left_value]
            }
            _ => {
                debug!(
                    "{}: expected 1 to 4 values, got {}",
                    definition.name(),
                    segments.len()
                );
                return false;
            }
        };
        [top, right, bottom, left]
            .into_iter()
            .zip(sides)
            .all(|(item, segment)| self.resolve_item(item, segment))
    }

    /// Every member parses the whole value.
    fn recursive(&mut self, definition: &ShorthandDefinition, text: &str) -> bool {
        definition
            .items()
            .iter()
            .all(|&item| self.resolve_item(item, text))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::error::RegistrationError;
    use crate::id::Identifier as _;
    use css_values_units::{ColorParser, KeywordParser, LengthParser};

    fn side_spec() -> Result<PropertySpecification, RegistrationError> {
        let mut spec = PropertySpecification::default();
        for side in ["top", "right", "bottom", "left"] {
            let pad = format!("pad-{side}");
            spec.register_property(&pad, "0px", false, true, PropertyId::INVALID)?
                .add_parser(Arc::new(LengthParser::LENGTH));
            let tint = format!("tint-{side}");
            spec.register_property(&tint, "black", false, false, PropertyId::INVALID)?
                .add_parser(Arc::new(ColorParser));
        }
        spec.register_shorthand(
            "pad",
            "pad-top, pad-right, pad-bottom, pad-left",
            ShorthandType::Box,
            ShorthandId::INVALID,
        )?;
        spec.register_shorthand(
            "tint",
            "tint-top, tint-right, tint-bottom, tint-left",
            ShorthandType::Box,
            ShorthandId::INVALID,
        )?;
        for (name, members, kind) in [
            ("edge", "pad, tint", ShorthandType::FallThrough),
            ("all-edges", "pad, tint", ShorthandType::Recursive),
            ("pad-pair", "pad-top, pad", ShorthandType::Replicate),
        ] {
            spec.register_shorthand(name, members, kind, ShorthandId::INVALID)?;
        }
        Ok(spec)
    }

    fn expand(
        spec: &PropertySpecification,
        name: &str,
        text: &str,
    ) -> Option<Vec<(String, Value)>> {
        let mut expansion = Expansion::new(spec);
        expansion.expand(spec.shorthand_id(name), text).then(|| {
            expansion
                .into_values()
                .into_iter()
                .map(|(id, value)| (spec.property_name(id).to_owned(), value))
                .collect()
        })
    }

    #[test]
    fn box_sides_follow_the_css_rule() -> Result<(), RegistrationError> {
        let spec = side_spec()?;
        let values = expand(&spec, "pad", "1px 2px 3px").unwrap_or_default();
        assert_eq!(
            values,
            [
                ("pad-top".to_owned(), Value::px(1.0)),
                ("pad-right".to_owned(), Value::px(2.0)),
                ("pad-bottom".to_owned(), Value::px(3.0)),
                ("pad-left".to_owned(), Value::px(2.0)),
            ]
        );
        assert_eq!(expand(&spec, "pad", "1px 2px 3px 4px 5px"), None);
        assert_eq!(expand(&spec, "pad", "1px red"), None);
        assert_eq!(expand(&spec, "pad", "   "), None);
        assert_eq!(expand(&spec, "pad", "1px (2px"), None);
        Ok(())
    }

    #[test]
    fn nested_fall_through_members_take_one_segment_each() -> Result<(), RegistrationError> {
        let spec = side_spec()?;
        let values = expand(&spec, "edge", "red").unwrap_or_default();
        assert_eq!(values.len(), 4);
        assert!(values.iter().all(|(name, _)| name.starts_with("tint-")));

        let both = expand(&spec, "edge", "4px rgb(0, 0, 255)").unwrap_or_default();
        assert_eq!(both.len(), 8);
        assert_eq!(both[0], ("pad-top".to_owned(), Value::px(4.0)));
        assert_eq!(expand(&spec, "edge", "nonsense").map(|values| values.len()), Some(0));
        Ok(())
    }

    #[test]
    fn recursive_members_see_the_whole_value() -> Result<(), RegistrationError> {
        let spec = side_spec()?;
        assert_eq!(expand(&spec, "all-edges", "1px 2px"), None);

        let mut only_pad = side_spec()?;
        let recursive = ShorthandType::Recursive;
        only_pad.register_shorthand("pads", "pad, pad-top", recursive, ShorthandId::INVALID)?;
        assert_eq!(expand(&only_pad, "pads", "1px 2px"), None);
        let values = expand(&only_pad, "pads", "1px").unwrap_or_default();
        assert_eq!(values.len(), 5);
        assert_eq!(values[4], ("pad-top".to_owned(), Value::px(1.0)));
        Ok(())
    }

    #[test]
    fn replicate_reparses_for_nested_members() -> Result<(), RegistrationError> {
        let spec = side_spec()?;
        let values = expand(&spec, "pad-pair", "7px").unwrap_or_default();
        assert_eq!(values.len(), 5);
        assert!(values.iter().all(|(_, value)| *value == Value::px(7.0)));
        assert_eq!(expand(&spec, "pad-pair", "7px red"), None);
        Ok(())
    }

    #[test]
    fn replicate_ignores_extra_segments() -> Result<(), RegistrationError> {
        let mut spec = PropertySpecification::default();
        for axis in ["x", "y"] {
            let name = format!("overflow-{axis}");
            spec.register_property(&name, "visible", false, true, PropertyId::INVALID)?
                .add_parser(Arc::new(KeywordParser::from_list("visible, hidden, scroll")));
        }
        spec.register_shorthand(
            "overflow",
            "overflow-x, overflow-y",
            ShorthandType::Replicate,
            ShorthandId::INVALID,
        )?;
        let values = expand(&spec, "overflow", "hidden scroll visible").unwrap_or_default();
        assert_eq!(
            values,
            [
                ("overflow-x".to_owned(), Value::keyword("hidden")),
                ("overflow-y".to_owned(), Value::keyword("scroll")),
            ]
        );
        Ok(())
    }
}
