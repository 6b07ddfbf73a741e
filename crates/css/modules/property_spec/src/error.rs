use thiserror::Error;

/// A registration call that violated the specification's consistency rules.
///
/// These describe configuration mistakes made while building a specification; they never
/// arise while parsing declarations.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// An explicit identifier lies outside the reserved slots.
    #[error("id {index} is outside the {capacity} reserved slots")]
    IdOutOfRange { index: usize, capacity: usize },
    /// An explicit identifier is already bound.
    #[error("id {index} is already bound to {name:?}")]
    IdAlreadyBound { index: usize, name: String },
    /// A name is empty after trimming.
    #[error("names must not be empty")]
    EmptyName,
    /// A name is already bound to another identifier.
    #[error("name {0:?} is already bound")]
    NameAlreadyBound(String),
    /// A shorthand member names neither a property nor a shorthand.
    #[error("shorthand {shorthand:?} references unknown member {member:?}")]
    UnknownShorthandMember { shorthand: String, member: String },
    /// A shorthand lists no members.
    #[error("shorthand {0:?} has no members")]
    EmptyShorthand(String),
    /// A box shorthand must list exactly four members.
    #[error("box shorthand {name:?} lists {count} members, expected 4")]
    BoxArity { name: String, count: usize },
    /// A shorthand would contain itself, directly or through nested shorthands.
    #[error("shorthand {0:?} would contain itself")]
    ShorthandCycle(String),
    /// A reserved identifier slot was never bound.
    #[error("reserved {registry} id {index} was never registered")]
    ReservedIdUnbound { registry: &'static str, index: usize },
    /// No identifier is left to allocate.
    #[error("identifier space exhausted while registering {0:?}")]
    IdSpaceExhausted(String),
}
