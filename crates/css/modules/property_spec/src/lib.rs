//! Property specification registry and declaration parser.
//!
//! A [`PropertySpecification`] assigns dense ids to named properties and shorthands, keeps
//! each property's default and value grammars, and resolves declarations into a
//! [`PropertyDictionary`]. Shorthands expand through one of four [`ShorthandType`]
//! strategies; the atomic ones leave the dictionary untouched when any member fails.
//!
//! ```
//! use css_property_spec::{PropertyDictionary, PropertySpecification, SourceLocation, properties};
//! use css_syntax::CommaPolicy;
//! use css_values_units::Value;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let spec = PropertySpecification::with_default_properties(CommaPolicy::Join)?.freeze()?;
//! let mut dict = PropertyDictionary::new();
//! let source = SourceLocation::default();
//! assert!(spec.parse_property_declaration(&mut dict, "margin", "1px 2px", &source));
//! assert_eq!(dict.value(properties::MARGIN_LEFT), Some(&Value::px(2.0)));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

mod builtin;
mod definition;
mod dictionary;
mod error;
mod id;
mod manifest;
mod shorthand;
mod specification;

pub use builtin::{properties, register_default_properties, shorthands};
pub use definition::{PropertyDefinition, ShorthandDefinition, ShorthandItem, ShorthandType};
pub use dictionary::{Property, PropertyDictionary, SourceLocation};
pub use error::RegistrationError;
pub use id::{INVALID_NAME, IdNameMap, Identifier, PropertyId, ShorthandId};
pub use manifest::{PropertyManifest, ShorthandManifest, SpecificationManifest};
pub use specification::{PropertySpecification, SpecificationOptions};
