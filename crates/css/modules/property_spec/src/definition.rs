//! Property and shorthand definitions owned by a specification.

use std::sync::Arc;

use css_values_units::{Grammar, ParseError, Value, ValueParser};
use log::warn;
use serde::Deserialize;

use crate::id::{PropertyId, ShorthandId};

/// A registered property: its default, flags and value grammars.
#[derive(Clone, Debug)]
pub struct PropertyDefinition {
    id: PropertyId,
    name: String,
    default_text: String,
    default_value: Option<Value>,
    inherited: bool,
    forces_layout: bool,
    parsers: Vec<Arc<dyn ValueParser>>,
}

impl PropertyDefinition {
    pub(crate) fn new(
        id: PropertyId,
        name: &str,
        default_text: &str,
        inherited: bool,
        forces_layout: bool,
    ) -> Self {
        Self {
            id,
            name: name.to_owned(),
            default_text: default_text.to_owned(),
            default_value: None,
            inherited,
            forces_layout,
            parsers: Vec::new(),
        }
    }

    /// Attach a value grammar, tried after those already attached.
    ///
    /// The default is parsed with the grammars attached so far until one accepts it; the
    /// result is cached and reused by every defaulting pass.
    pub fn add_parser(&mut self, parser: Arc<dyn ValueParser>) -> &mut Self {
        self.parsers.push(parser);
        if self.default_value.is_none() {
            self.default_value = self.parse_value(&self.default_text).ok();
        }
        self
    }

    /// Attach a built-in grammar by descriptor.
    pub fn add_grammar(&mut self, grammar: &Grammar) -> &mut Self {
        self.add_parser(grammar.parser())
    }

    /// Parse `text` with the attached grammars, returning the first accepted value.
    ///
    /// # Errors
    /// Returns the error of the last grammar tried, or `ParseError::UnexpectedToken` when no
    /// grammar is attached.
    pub fn parse_value(&self, text: &str) -> Result<Value, ParseError> {
        let mut last_error = ParseError::UnexpectedToken;
        for parser in &self.parsers {
            match parser.parse_value(text) {
                Ok(value) => return Ok(value),
                Err(err) => last_error = err,
            }
        }
        Err(last_error)
    }

    #[inline]
    pub const fn id(&self) -> PropertyId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The default as written at registration.
    #[inline]
    pub fn default_text(&self) -> &str {
        &self.default_text
    }

    /// The default parsed by the attached grammars, if any of them accepted it.
    #[inline]
    pub const fn default_value(&self) -> Option<&Value> {
        self.default_value.as_ref()
    }

    /// Whether the cascade copies the computed value from the parent element.
    #[inline]
    pub const fn is_inherited(&self) -> bool {
        self.inherited
    }

    /// Whether a change to this property invalidates layout.
    #[inline]
    pub const fn forces_layout(&self) -> bool {
        self.forces_layout
    }

    /// Names of the attached grammars, in the order they are tried.
    pub fn parser_names(&self) -> impl Iterator<Item = &str> {
        self.parsers.iter().map(|parser| parser.name())
    }

    /// Report a default that none of the attached grammars accepts.
    pub(crate) fn warn_if_default_unparsed(&self) -> bool {
        if self.default_value.is_some() {
            return false;
        }
        warn!(
            "default {:?} of property {:?} does not parse under [{}]",
            self.default_text,
            self.name,
            self.parser_names().collect::<Vec<_>>().join(", ")
        );
        true
    }
}

/// How a shorthand assigns value segments to its members.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShorthandType {
    /// Each member takes the next segment it accepts; unmatched members stay unset.
    FallThrough,
    /// One segment per member; missing trailing members repeat the last value.
    Replicate,
    /// One to four segments mapped onto top, right, bottom and left.
    Box,
    /// Every member parses the whole value.
    Recursive,
}

/// One member of a shorthand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShorthandItem {
    Property(PropertyId),
    Shorthand(ShorthandId),
}

/// A registered shorthand and its ordered members.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShorthandDefinition {
    id: ShorthandId,
    name: String,
    items: Vec<ShorthandItem>,
    kind: ShorthandType,
}

impl ShorthandDefinition {
    pub(crate) fn new(
        id: ShorthandId,
        name: &str,
        items: Vec<ShorthandItem>,
        kind: ShorthandType,
    ) -> Self {
        Self {
            id,
            name: name.to_owned(),
            items,
            kind,
        }
    }

    #[inline]
    pub const fn id(&self) -> ShorthandId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn items(&self) -> &[ShorthandItem] {
        &self.items
    }

    #[inline]
    pub const fn kind(&self) -> ShorthandType {
        self.kind
    }
}
