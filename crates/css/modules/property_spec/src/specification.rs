//! The property specification: registries, definitions and declaration parsing.

use std::borrow::Cow;
use std::collections::HashSet;
use std::sync::Arc;

use css_syntax::{CommaPolicy, parse_declaration_block};
use log::{debug, trace, warn};
use serde::Deserialize;

use crate::definition::{PropertyDefinition, ShorthandDefinition, ShorthandItem, ShorthandType};
use crate::dictionary::{PropertyDictionary, SourceLocation};
use crate::error::RegistrationError;
use crate::id::{INVALID_NAME, IdNameMap, Identifier as _, PropertyId, ShorthandId};
use crate::shorthand::Expansion;

/// Construction options for a [`PropertySpecification`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpecificationOptions {
    /// Property id slots reserved for explicit registration, counting the invalid sentinel.
    pub reserve_properties: usize,
    /// Shorthand id slots reserved for explicit registration, counting the invalid sentinel.
    pub reserve_shorthands: usize,
    /// Whether commas separate shorthand segments.
    pub comma: CommaPolicy,
}

/// Lowercase and trim a property or shorthand name, borrowing when it is already normal.
fn normalize(name: &str) -> Cow<'_, str> {
    let trimmed = name.trim();
    if trimmed.bytes().any(|byte| byte.is_ascii_uppercase()) {
        Cow::Owned(trimmed.to_ascii_lowercase())
    } else {
        Cow::Borrowed(trimmed)
    }
}

/// Normalize a name for registration, refusing empty names and the sentinel's name.
fn registrable(name: &str) -> Result<Cow<'_, str>, RegistrationError> {
    let key = normalize(name);
    if key.is_empty() {
        return Err(RegistrationError::EmptyName);
    }
    if key == INVALID_NAME {
        return Err(RegistrationError::NameAlreadyBound(key.into_owned()));
    }
    Ok(key)
}

/// Registry of properties and shorthands, and the parser that resolves declarations against it.
///
/// A specification is built once: register every property and shorthand, then [`freeze`]
/// it and share the result. Parsing only needs `&self`, so a frozen specification can serve
/// any number of threads.
///
/// [`freeze`]: Self::freeze
#[derive(Clone, Debug)]
pub struct PropertySpecification {
    options: SpecificationOptions,
    property_map: IdNameMap<PropertyId>,
    shorthand_map: IdNameMap<ShorthandId>,
    properties: Vec<Option<PropertyDefinition>>,
    shorthands: Vec<Option<ShorthandDefinition>>,
    property_names: Vec<String>,
    inherited_property_names: Vec<String>,
}

impl Default for PropertySpecification {
    fn default() -> Self {
        Self::new(SpecificationOptions::default())
    }
}

impl PropertySpecification {
    pub fn new(options: SpecificationOptions) -> Self {
        Self {
            options,
            property_map: IdNameMap::with_reserved(options.reserve_properties),
            shorthand_map: IdNameMap::with_reserved(options.reserve_shorthands),
            properties: Vec::with_capacity(options.reserve_properties),
            shorthands: Vec::with_capacity(options.reserve_shorthands),
            property_names: Vec::new(),
            inherited_property_names: Vec::new(),
        }
    }

    #[inline]
    pub const fn options(&self) -> &SpecificationOptions {
        &self.options
    }

    /// Register a property and return its definition so grammars can be attached.
    ///
    /// With `id` set to the invalid sentinel the next free id is allocated; re-registering a
    /// known name this way replaces its definition and keeps its id. An explicit `id` must be
    /// one of the reserved slots and still unbound.
    ///
    /// # Errors
    /// Returns a [`RegistrationError`] when the name is empty, the id or name is already
    /// bound, the id lies outside the reserved slots, or no id is left. The specification is
    /// unchanged then.
    pub fn register_property(
        &mut self,
        name: &str,
        default_value: &str,
        inherited: bool,
        forces_layout: bool,
        id: PropertyId,
    ) -> Result<&mut PropertyDefinition, RegistrationError> {
        let key = registrable(name)?;
        let previous = self.property_map.get_id(&key);
        let bound = if id.is_valid() {
            self.property_map.add_pair(id, &key)?;
            id
        } else if previous.is_valid() {
            warn!("property {key:?} registered twice; replacing its definition");
            previous
        } else {
            let allocated = self.property_map.get_or_create_id(&key);
            if !allocated.is_valid() {
                return Err(RegistrationError::IdSpaceExhausted(key.into_owned()));
            }
            allocated
        };

        let was_inherited = self
            .property(bound)
            .is_some_and(PropertyDefinition::is_inherited);
        if !previous.is_valid() {
            self.property_names.push(key.clone().into_owned());
        }
        if inherited && !was_inherited {
            self.inherited_property_names.push(key.clone().into_owned());
        } else if !inherited && was_inherited {
            self.inherited_property_names.retain(|existing| *existing != *key);
        }

        let index = bound.index();
        if self.properties.len() <= index {
            self.properties.resize_with(index + 1, || None);
        }
        let definition =
            PropertyDefinition::new(bound, &key, default_value, inherited, forces_layout);
        Ok(self.properties[index].insert(definition))
    }

    /// Register a shorthand over a comma-separated list of member names.
    ///
    /// Each member resolves to a property first and to a shorthand otherwise, so shorthands
    /// can nest. Id allocation follows [`Self::register_property`].
    ///
    /// # Errors
    /// Fails without touching the specification when the name is empty, a member is unknown,
    /// the member list is empty, a box shorthand does not have exactly four members, the
    /// shorthand would contain itself, or the id cannot be bound.
    pub fn register_shorthand(
        &mut self,
        name: &str,
        members: &str,
        kind: ShorthandType,
        id: ShorthandId,
    ) -> Result<ShorthandId, RegistrationError> {
        let key = registrable(name)?;
        let items = self
            .resolve_members(&key, members, kind)
            .inspect_err(|err| warn!("rejected shorthand {key:?}: {err}"))?;

        let previous = self.shorthand_map.get_id(&key);
        let bound = if id.is_valid() {
            self.shorthand_map.add_pair(id, &key)?;
            id
        } else if previous.is_valid() {
            if self.reaches(&items, previous) {
                return Err(RegistrationError::ShorthandCycle(key.into_owned()));
            }
            warn!("shorthand {key:?} registered twice; replacing its definition");
            previous
        } else {
            let allocated = self.shorthand_map.get_or_create_id(&key);
            if !allocated.is_valid() {
                return Err(RegistrationError::IdSpaceExhausted(key.into_owned()));
            }
            allocated
        };

        let index = bound.index();
        if self.shorthands.len() <= index {
            self.shorthands.resize_with(index + 1, || None);
        }
        self.shorthands[index] = Some(ShorthandDefinition::new(bound, &key, items, kind));
        Ok(bound)
    }

    fn resolve_members(
        &self,
        shorthand: &str,
        members: &str,
        kind: ShorthandType,
    ) -> Result<Vec<ShorthandItem>, RegistrationError> {
        let items = members
            .split(',')
            .map(normalize)
            .filter(|member| !member.is_empty())
            .map(|member| {
                let property = self.property_map.get_id(&member);
                if property.is_valid() {
                    return Ok(ShorthandItem::Property(property));
                }
                let nested = self.shorthand_map.get_id(&member);
                if nested.is_valid() {
                    return Ok(ShorthandItem::Shorthand(nested));
                }
                Err(RegistrationError::UnknownShorthandMember {
                    shorthand: shorthand.to_owned(),
                    member: member.into_owned(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if items.is_empty() {
            return Err(RegistrationError::EmptyShorthand(shorthand.to_owned()));
        }
        if kind == ShorthandType::Box && items.len() != 4 {
            return Err(RegistrationError::BoxArity {
                name: shorthand.to_owned(),
                count: items.len(),
            });
        }
        Ok(items)
    }

    /// Whether `target` is among `items` or the shorthands nested under them.
    fn reaches(&self, items: &[ShorthandItem], target: ShorthandId) -> bool {
        let mut pending: Vec<ShorthandId> = items
            .iter()
            .filter_map(|item| match *item {
                ShorthandItem::Shorthand(nested) => Some(nested),
                ShorthandItem::Property(_) => None,
            })
            .collect();
        let mut seen = HashSet::new();
        while let Some(current) = pending.pop() {
            if current == target {
                return true;
            }
            if !seen.insert(current) {
                continue;
            }
            if let Some(definition) = self.shorthand(current) {
                pending.extend(definition.items().iter().filter_map(|item| match *item {
                    ShorthandItem::Shorthand(nested) => Some(nested),
                    ShorthandItem::Property(_) => None,
                }));
            }
        }
        false
    }

    #[inline]
    pub fn property(&self, id: PropertyId) -> Option<&PropertyDefinition> {
        self.properties.get(id.index()).and_then(Option::as_ref)
    }

    pub fn property_by_name(&self, name: &str) -> Option<&PropertyDefinition> {
        self.property(self.property_id(name))
    }

    #[inline]
    pub fn shorthand(&self, id: ShorthandId) -> Option<&ShorthandDefinition> {
        self.shorthands.get(id.index()).and_then(Option::as_ref)
    }

    pub fn shorthand_by_name(&self, name: &str) -> Option<&ShorthandDefinition> {
        self.shorthand(self.shorthand_id(name))
    }

    /// Id of the property called `name`, or the invalid sentinel.
    pub fn property_id(&self, name: &str) -> PropertyId {
        self.property_map.get_id(&normalize(name))
    }

    /// Id of the shorthand called `name`, or the invalid sentinel.
    pub fn shorthand_id(&self, name: &str) -> ShorthandId {
        self.shorthand_map.get_id(&normalize(name))
    }

    pub fn property_name(&self, id: PropertyId) -> &str {
        self.property_map.name(id)
    }

    pub fn shorthand_name(&self, id: ShorthandId) -> &str {
        self.shorthand_map.name(id)
    }

    /// Names of all registered properties, in registration order.
    #[inline]
    pub fn registered_properties(&self) -> &[String] {
        &self.property_names
    }

    /// Names of the inherited properties, in registration order.
    #[inline]
    pub fn registered_inherited_properties(&self) -> &[String] {
        &self.inherited_property_names
    }

    /// Iterate over the registered property definitions in id order.
    pub fn properties(&self) -> impl Iterator<Item = &PropertyDefinition> {
        self.properties.iter().flatten()
    }

    /// Iterate over the registered shorthand definitions in id order.
    pub fn shorthands(&self) -> impl Iterator<Item = &ShorthandDefinition> {
        self.shorthands.iter().flatten()
    }

    /// Debug-only check that exactly the first `properties` and `shorthands` id slots are bound.
    pub fn assert_all_inserted(&self, properties: usize, shorthands: usize) {
        self.property_map.assert_all_inserted(properties);
        self.shorthand_map.assert_all_inserted(shorthands);
    }

    /// Check that every reserved id slot was bound, and report defaults that do not parse.
    ///
    /// # Errors
    /// Returns `RegistrationError::ReservedIdUnbound` for the first reserved slot left empty.
    pub fn validate(&self) -> Result<(), RegistrationError> {
        if let Some(index) = self.property_map.first_unbound() {
            return Err(RegistrationError::ReservedIdUnbound {
                registry: "property",
                index,
            });
        }
        if let Some(index) = self.shorthand_map.first_unbound() {
            return Err(RegistrationError::ReservedIdUnbound {
                registry: "shorthand",
                index,
            });
        }
        let unparsed = self
            .properties()
            .filter(|definition| definition.warn_if_default_unparsed())
            .count();
        debug!(
            "validated {} properties and {} shorthands ({unparsed} without a usable default)",
            self.property_names.len(),
            self.shorthands().count()
        );
        Ok(())
    }

    /// Validate and end registration, returning a shareable read-only specification.
    ///
    /// # Errors
    /// Propagates the failure of [`Self::validate`].
    pub fn freeze(self) -> Result<Arc<Self>, RegistrationError> {
        self.validate()?;
        Ok(Arc::new(self))
    }

    /// Parse a declaration for the property or shorthand called `name` into `dict`.
    ///
    /// Properties take precedence over shorthands of the same name. Returns `false` and leaves
    /// `dict` untouched when the name is unknown or the value is rejected.
    pub fn parse_property_declaration(
        &self,
        dict: &mut PropertyDictionary,
        name: &str,
        value: &str,
        source: &SourceLocation,
    ) -> bool {
        let property = self.property_id(name);
        if property.is_valid() {
            return self.parse_property_declaration_by_id(dict, property, value, source);
        }
        let shorthand = self.shorthand_id(name);
        if shorthand.is_valid() {
            return self.parse_shorthand_declaration(dict, shorthand, value, source);
        }
        debug!("{}:{}: unknown property {name:?}", source.file, source.line);
        false
    }

    /// Parse a value for the property `id` and store it in `dict` on success.
    pub fn parse_property_declaration_by_id(
        &self,
        dict: &mut PropertyDictionary,
        id: PropertyId,
        value: &str,
        source: &SourceLocation,
    ) -> bool {
        let Some(definition) = self.property(id) else {
            debug!("{}:{}: no property with id {id:?}", source.file, source.line);
            return false;
        };
        let Ok(parsed) = definition.parse_value(value.trim()).inspect_err(|err| {
            debug!(
                "{}:{}: invalid value {value:?} for {}: {err}",
                source.file,
                source.line,
                definition.name()
            );
        }) else {
            return false;
        };
        trace!("{} = {parsed}", definition.name());
        dict.set_property(id, parsed, source.clone());
        true
    }

    /// Expand a value for the shorthand `id` into its leaf properties.
    ///
    /// Nothing is written to `dict` unless the expansion as a whole succeeds; a successful
    /// expansion overwrites earlier entries for the same properties.
    pub fn parse_shorthand_declaration(
        &self,
        dict: &mut PropertyDictionary,
        id: ShorthandId,
        value: &str,
        source: &SourceLocation,
    ) -> bool {
        let mut expansion = Expansion::new(self);
        if !expansion.expand(id, value) {
            debug!(
                "{}:{}: invalid value {value:?} for shorthand {}",
                source.file,
                source.line,
                self.shorthand_name(id)
            );
            return false;
        }
        for (property, parsed) in expansion.into_values() {
            dict.set_property(property, parsed, source.clone());
        }
        true
    }

    /// Fill every registered property missing from `dict` with its cached default.
    ///
    /// Existing entries are never overwritten. Properties whose default did not parse are
    /// left unset.
    pub fn set_property_defaults(&self, dict: &mut PropertyDictionary) {
        for definition in self.properties() {
            if dict.contains(definition.id()) {
                continue;
            }
            let Some(value) = definition.default_value() else {
                trace!("no default for {}", definition.name());
                continue;
            };
            dict.set_property(definition.id(), value.clone(), SourceLocation::default());
        }
    }

    /// Parse the body of a declaration block (`name: value; ...`) into `dict`.
    ///
    /// Each declaration is tagged with `file` and its line within `block`. Returns the number
    /// of well-formed declarations that were rejected; malformed items are skipped by the
    /// block parser and not counted.
    pub fn parse_declaration_block(
        &self,
        dict: &mut PropertyDictionary,
        block: &str,
        file: &str,
    ) -> usize {
        let mut rejected = 0;
        for declaration in parse_declaration_block(block) {
            let source = SourceLocation::new(file, declaration.line);
            let name = declaration.name.as_str();
            if !self.parse_property_declaration(dict, name, &declaration.value, &source) {
                rejected += 1;
            }
        }
        rejected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::Identifier as _;
    use css_values_units::{ColorParser, KeywordParser, LengthParser, Value};

    fn spec_with_sides() -> Result<PropertySpecification, RegistrationError> {
        let mut spec = PropertySpecification::default();
        for side in ["top", "right", "bottom", "left"] {
            let name = format!("margin-{side}");
            spec.register_property(&name, "0px", false, true, PropertyId::INVALID)?
                .add_parser(Arc::new(LengthParser::LENGTH));
        }
        spec.register_shorthand(
            "margin",
            "margin-top, margin-right, margin-bottom, margin-left",
            ShorthandType::Box,
            ShorthandId::INVALID,
        )?;
        Ok(spec)
    }

    #[test]
    fn names_are_normalized() -> Result<(), RegistrationError> {
        let spec = spec_with_sides()?;
        let id = spec.property_id("Margin-Top");
        assert!(id.is_valid());
        assert_eq!(spec.property_id(" margin-top "), id);
        assert_eq!(spec.property_name(id), "margin-top");
        assert_eq!(
            spec.shorthand_by_name("MARGIN").map(ShorthandDefinition::kind),
            Some(ShorthandType::Box)
        );
        Ok(())
    }

    #[test]
    fn name_lists_follow_registration() -> Result<(), RegistrationError> {
        let mut spec = PropertySpecification::default();
        spec.register_property("color", "black", true, false, PropertyId::INVALID)?;
        spec.register_property("width", "auto", false, true, PropertyId::INVALID)?;
        spec.register_property("font-size", "12px", true, true, PropertyId::INVALID)?;
        assert_eq!(spec.registered_properties(), ["color", "width", "font-size"]);
        assert_eq!(spec.registered_inherited_properties(), ["color", "font-size"]);
        Ok(())
    }

    #[test]
    fn reregistering_replaces_the_definition() -> Result<(), RegistrationError> {
        let mut spec = PropertySpecification::default();
        let first = spec
            .register_property("color", "black", true, false, PropertyId::INVALID)?
            .id();
        let second = spec
            .register_property("color", "white", false, false, PropertyId::INVALID)?
            .add_parser(Arc::new(ColorParser))
            .id();
        assert_eq!(first, second);
        assert_eq!(spec.registered_properties(), ["color"]);
        assert!(spec.registered_inherited_properties().is_empty());
        assert_eq!(spec.property(first).map(PropertyDefinition::default_text), Some("white"));
        Ok(())
    }

    #[test]
    fn unknown_members_leave_the_registry_unchanged() -> Result<(), RegistrationError> {
        let mut spec = spec_with_sides()?;
        let before = spec.shorthands().count();
        let result = spec.register_shorthand(
            "padding",
            "padding-top, margin-right",
            ShorthandType::Replicate,
            ShorthandId::INVALID,
        );
        assert_eq!(
            result,
            Err(RegistrationError::UnknownShorthandMember {
                shorthand: "padding".to_owned(),
                member: "padding-top".to_owned(),
            })
        );
        assert_eq!(spec.shorthands().count(), before);
        assert_eq!(spec.shorthand_id("padding"), ShorthandId::INVALID);
        Ok(())
    }

    #[test]
    fn shape_errors_are_reported() -> Result<(), RegistrationError> {
        let mut spec = spec_with_sides()?;
        assert_eq!(
            spec.register_shorthand("empty", " , ", ShorthandType::Replicate, ShorthandId::INVALID),
            Err(RegistrationError::EmptyShorthand("empty".to_owned()))
        );
        assert_eq!(
            spec.register_shorthand(
                "margin-x",
                "margin-left, margin-right",
                ShorthandType::Box,
                ShorthandId::INVALID
            ),
            Err(RegistrationError::BoxArity {
                name: "margin-x".to_owned(),
                count: 2
            })
        );
        Ok(())
    }

    #[test]
    fn blank_and_sentinel_names_are_refused() -> Result<(), RegistrationError> {
        let mut spec = spec_with_sides()?;
        let properties = spec.registered_properties().len();
        let shorthands = spec.shorthands().count();
        assert!(matches!(
            spec.register_property("", "0", false, false, PropertyId::INVALID),
            Err(RegistrationError::EmptyName)
        ));
        assert!(matches!(
            spec.register_property("   ", "0", false, false, PropertyId::INVALID),
            Err(RegistrationError::EmptyName)
        ));
        assert!(matches!(
            spec.register_property("Invalid", "0", false, false, PropertyId::INVALID),
            Err(RegistrationError::NameAlreadyBound(name)) if name == "invalid"
        ));
        assert_eq!(
            spec.register_shorthand(" ", "margin-top", ShorthandType::Box, ShorthandId::INVALID),
            Err(RegistrationError::EmptyName)
        );
        assert_eq!(
            spec.register_shorthand(
                "invalid",
                "margin-top",
                ShorthandType::Replicate,
                ShorthandId::INVALID
            ),
            Err(RegistrationError::NameAlreadyBound("invalid".to_owned()))
        );
        assert_eq!(spec.registered_properties().len(), properties);
        assert_eq!(spec.shorthands().count(), shorthands);
        spec.validate()?;
        Ok(())
    }

    #[test]
    fn shorthands_cannot_contain_themselves() -> Result<(), RegistrationError> {
        let mut spec = spec_with_sides()?;
        let recursive = ShorthandType::Recursive;
        spec.register_shorthand("outer", "margin", recursive, ShorthandId::INVALID)?;
        assert_eq!(
            spec.register_shorthand("margin", "outer", recursive, ShorthandId::INVALID),
            Err(RegistrationError::ShorthandCycle("margin".to_owned()))
        );
        assert_eq!(
            spec.shorthand_by_name("margin").map(ShorthandDefinition::kind),
            Some(ShorthandType::Box)
        );
        Ok(())
    }

    #[test]
    fn declarations_resolve_properties_before_shorthands() -> Result<(), RegistrationError> {
        let spec = spec_with_sides()?;
        let mut dict = PropertyDictionary::new();
        let source = SourceLocation::new("test.rcss", 7);

        assert!(spec.parse_property_declaration(&mut dict, "margin-left", " 3px ", &source));
        let left = spec.property_id("margin-left");
        assert_eq!(dict.value(left), Some(&Value::px(3.0)));
        assert_eq!(dict.property(left).map(|property| &property.source), Some(&source));

        assert!(!spec.parse_property_declaration(&mut dict, "margin-left", "red", &source));
        assert!(!spec.parse_property_declaration(&mut dict, "colour", "red", &source));
        assert_eq!(dict.len(), 1);

        assert!(spec.parse_property_declaration(&mut dict, "margin", "1px", &source));
        assert_eq!(dict.len(), 4);
        assert_eq!(dict.value(left), Some(&Value::px(1.0)));
        Ok(())
    }

    #[test]
    fn explicit_ids_and_validation() -> Result<(), RegistrationError> {
        let mut spec = PropertySpecification::new(SpecificationOptions {
            reserve_properties: 3,
            reserve_shorthands: 1,
            comma: CommaPolicy::Join,
        });
        spec.register_property("display", "inline", false, true, PropertyId::new(2))?
            .add_parser(Arc::new(KeywordParser::from_list("inline, block")));
        assert_eq!(
            spec.validate(),
            Err(RegistrationError::ReservedIdUnbound {
                registry: "property",
                index: 1
            })
        );
        spec.register_property("opacity", "1", true, false, PropertyId::new(1))?;
        let dynamic = spec
            .register_property("cursor", "auto", true, false, PropertyId::INVALID)?
            .id();
        assert_eq!(dynamic, PropertyId::new(3));
        spec.assert_all_inserted(4, 1);

        let frozen = spec.freeze()?;
        assert_eq!(frozen.registered_properties(), ["display", "opacity", "cursor"]);
        Ok(())
    }

    #[test]
    fn defaults_fill_only_missing_entries() -> Result<(), RegistrationError> {
        let spec = spec_with_sides()?;
        let top = spec.property_id("margin-top");
        let mut dict = PropertyDictionary::new();
        dict.set_property(top, Value::px(9.0), SourceLocation::new("a", 1));
        spec.set_property_defaults(&mut dict);
        assert_eq!(dict.len(), 4);
        assert_eq!(dict.value(top), Some(&Value::px(9.0)));
        assert_eq!(dict.value(spec.property_id("margin-left")), Some(&Value::px(0.0)));
        Ok(())
    }

    #[test]
    fn declaration_blocks_report_rejections() -> Result<(), RegistrationError> {
        let spec = spec_with_sides()?;
        let mut dict = PropertyDictionary::new();
        let rejected = spec.parse_declaration_block(
            &mut dict,
            "margin: 1px 2px;\nmargin-top: nope;\nfloat: left;\nmargin-left: 5px",
            "block.rcss",
        );
        assert_eq!(rejected, 2);
        let left = spec.property_id("margin-left");
        assert_eq!(dict.value(left), Some(&Value::px(5.0)));
        assert_eq!(dict.property(left).map(|property| property.source.line), Some(4));
        assert_eq!(dict.value(spec.property_id("margin-top")), Some(&Value::px(1.0)));
        Ok(())
    }
}
