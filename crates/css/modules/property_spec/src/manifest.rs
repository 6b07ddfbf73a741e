//! Building a specification from a JSON manifest.
//!
//! ```json
//! {
//!   "options": { "comma": "join", "reserve_properties": 2 },
//!   "include_defaults": false,
//!   "properties": [
//!     { "name": "gap", "id": 1, "default": "0px", "parsers": [{ "kind": "length" }] }
//!   ],
//!   "shorthands": [
//!     { "name": "gaps", "members": "gap, gap", "type": "replicate" }
//!   ]
//! }
//! ```
//!
//! An entry with an `id` binds that reserved slot; entries without one are allocated after
//! the reserved range.

use std::io::Read;

use anyhow::{Context as _, Result, ensure};
use css_values_units::Grammar;
use log::debug;
use serde::Deserialize;

use crate::builtin::{properties, register_default_properties, shorthands};
use crate::definition::ShorthandType;
use crate::id::{Identifier as _, PropertyId, ShorthandId};
use crate::specification::{PropertySpecification, SpecificationOptions};

/// Top-level manifest document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpecificationManifest {
    pub options: SpecificationOptions,
    /// Register the built-in property set before the manifest's own entries.
    pub include_defaults: bool,
    pub properties: Vec<PropertyManifest>,
    pub shorthands: Vec<ShorthandManifest>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PropertyManifest {
    pub name: String,
    /// Reserved id slot to bind; allocated when absent.
    #[serde(default)]
    pub id: Option<u32>,
    pub default: String,
    #[serde(default)]
    pub inherited: bool,
    #[serde(default)]
    pub forces_layout: bool,
    /// Grammars tried in order.
    #[serde(default)]
    pub parsers: Vec<Grammar>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShorthandManifest {
    pub name: String,
    /// Reserved id slot to bind; allocated when absent.
    #[serde(default)]
    pub id: Option<u32>,
    /// Comma-separated member names.
    pub members: String,
    #[serde(rename = "type")]
    pub kind: ShorthandType,
}

/// Refuse an explicit manifest id that the registry could not bind.
fn check_reserved(name: &str, index: usize, reserved: usize, free: bool) -> Result<()> {
    ensure!(
        index < reserved,
        "{name:?} takes id {index}, outside the {reserved} reserved slots"
    );
    ensure!(free, "{name:?} takes id {index}, but the id or the name is already bound");
    Ok(())
}

impl PropertySpecification {
    /// Build and validate a specification from a parsed manifest.
    ///
    /// # Errors
    /// Fails on the first registration error or when validation fails.
    pub fn from_manifest(manifest: &SpecificationManifest) -> Result<Self> {
        let mut options = manifest.options;
        if manifest.include_defaults {
            options.reserve_properties = options.reserve_properties.max(properties::NUM_DEFINED);
            options.reserve_shorthands = options.reserve_shorthands.max(shorthands::NUM_DEFINED);
        }
        let mut spec = Self::new(options);
        if manifest.include_defaults {
            register_default_properties(&mut spec).context("registering built-in properties")?;
        }

        for property in &manifest.properties {
            let id = PropertyId::new(property.id.unwrap_or_default());
            if id.is_valid() {
                let free = spec.property(id).is_none()
                    && !spec.property_id(&property.name).is_valid();
                check_reserved(&property.name, id.index(), options.reserve_properties, free)?;
            }
            let definition = spec
                .register_property(
                    &property.name,
                    &property.default,
                    property.inherited,
                    property.forces_layout,
                    id,
                )
                .with_context(|| format!("registering property {:?}", property.name))?;
            for grammar in &property.parsers {
                definition.add_grammar(grammar);
            }
        }
        for shorthand in &manifest.shorthands {
            let id = ShorthandId::new(shorthand.id.unwrap_or_default());
            if id.is_valid() {
                let free = spec.shorthand(id).is_none()
                    && !spec.shorthand_id(&shorthand.name).is_valid();
                check_reserved(&shorthand.name, id.index(), options.reserve_shorthands, free)?;
            }
            spec.register_shorthand(&shorthand.name, &shorthand.members, shorthand.kind, id)
                .with_context(|| format!("registering shorthand {:?}", shorthand.name))?;
        }

        spec.validate().context("validating specification")?;
        debug!(
            "loaded {} properties and {} shorthands from manifest",
            manifest.properties.len(),
            manifest.shorthands.len()
        );
        Ok(spec)
    }

    /// Build a specification from manifest JSON text.
    ///
    /// # Errors
    /// Fails when the JSON does not describe a manifest or the manifest does not register.
    pub fn from_manifest_str(text: &str) -> Result<Self> {
        let manifest: SpecificationManifest =
            serde_json::from_str(text).context("parsing specification manifest")?;
        Self::from_manifest(&manifest)
    }

    /// Build a specification from manifest JSON read from `reader`.
    ///
    /// # Errors
    /// Fails on I/O errors and on everything [`Self::from_manifest_str`] rejects.
    pub fn from_manifest_reader<R: Read>(reader: R) -> Result<Self> {
        let manifest: SpecificationManifest =
            serde_json::from_reader(reader).context("reading specification manifest")?;
        Self::from_manifest(&manifest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::{PropertyDictionary, SourceLocation};
    use css_syntax::CommaPolicy;
    use css_values_units::Value;

    const MANIFEST: &str = r#"{
        "options": { "comma": "split" },
        "properties": [
            { "name": "gap-row", "default": "0px", "forces_layout": true,
              "parsers": [{ "kind": "length" }] },
            { "name": "gap-column", "default": "0px", "forces_layout": true,
              "parsers": [{ "kind": "length" }] },
            { "name": "cursor", "default": "auto", "inherited": true,
              "parsers": [{ "kind": "keyword", "keywords": ["auto", "pointer"] }] }
        ],
        "shorthands": [
            { "name": "gap", "members": "gap-row, gap-column", "type": "replicate" }
        ]
    }"#;

    #[test]
    fn manifests_register_properties_and_shorthands() -> Result<()> {
        let spec = PropertySpecification::from_manifest_str(MANIFEST)?;
        assert_eq!(spec.options().comma, CommaPolicy::Split);
        assert_eq!(spec.registered_properties(), ["gap-row", "gap-column", "cursor"]);
        assert_eq!(spec.registered_inherited_properties(), ["cursor"]);

        let mut dict = PropertyDictionary::new();
        let source = SourceLocation::default();
        assert!(spec.parse_property_declaration(&mut dict, "gap", "1px,2px", &source));
        assert_eq!(dict.value(spec.property_id("gap-column")), Some(&Value::px(2.0)));
        Ok(())
    }

    #[test]
    fn manifests_can_extend_the_built_ins() -> Result<()> {
        let spec = PropertySpecification::from_manifest_reader(
            br#"{
                "include_defaults": true,
                "properties": [{ "name": "cursor", "default": "auto" }]
            }"#
            .as_slice(),
        )?;
        assert_eq!(spec.property_id("margin-top"), properties::MARGIN_TOP);
        assert_eq!(spec.property_id("cursor"), PropertyId::new(30));
        Ok(())
    }

    #[test]
    fn explicit_ids_fill_the_reserved_slots() -> Result<()> {
        let spec = PropertySpecification::from_manifest_str(
            r#"{
                "options": { "reserve_properties": 3, "reserve_shorthands": 2 },
                "properties": [
                    { "name": "cursor", "default": "auto" },
                    { "name": "gap-column", "id": 2, "default": "0px" },
                    { "name": "gap-row", "id": 1, "default": "0px" }
                ],
                "shorthands": [
                    { "name": "gap", "id": 1, "members": "gap-row, gap-column",
                      "type": "replicate" }
                ]
            }"#,
        )?;
        assert_eq!(spec.property_id("gap-row"), PropertyId::new(1));
        assert_eq!(spec.property_id("gap-column"), PropertyId::new(2));
        assert_eq!(spec.property_id("cursor"), PropertyId::new(3));
        assert_eq!(spec.shorthand_id("gap"), ShorthandId::new(1));
        Ok(())
    }

    #[test]
    fn explicit_ids_are_checked_before_binding() {
        let message = |text: &str| {
            PropertySpecification::from_manifest_str(text)
                .err()
                .map(|err| format!("{err:#}"))
                .unwrap_or_default()
        };
        let unbound = message(
            r#"{ "options": { "reserve_properties": 3 },
                 "properties": [{ "name": "gap-row", "id": 1, "default": "0px" }] }"#,
        );
        assert!(unbound.contains("reserved property id 2"), "{unbound}");

        let outside = message(
            r#"{ "options": { "reserve_properties": 2 },
                 "properties": [{ "name": "gap-row", "id": 2, "default": "0px" }] }"#,
        );
        assert!(outside.contains("outside the 2 reserved slots"), "{outside}");

        let taken = message(
            r#"{ "options": { "reserve_properties": 2 },
                 "properties": [
                     { "name": "gap-row", "id": 1, "default": "0px" },
                     { "name": "gap-column", "id": 1, "default": "0px" }
                 ] }"#,
        );
        assert!(taken.contains("already bound"), "{taken}");
    }

    #[test]
    fn registration_errors_carry_context() {
        let result = PropertySpecification::from_manifest_str(
            r#"{ "shorthands": [{ "name": "gap", "members": "gap-row", "type": "box" }] }"#,
        );
        let message = result.err().map(|err| format!("{err:#}")).unwrap_or_default();
        assert!(message.starts_with("registering shorthand \"gap\""), "{message}");
        assert!(message.contains("gap-row"), "{message}");

        let unknown = PropertySpecification::from_manifest_str(r#"{ "colour": true }"#);
        assert!(matches!(unknown, Err(_)));
    }
}
