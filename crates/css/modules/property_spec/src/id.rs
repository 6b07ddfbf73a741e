//! Dense identifiers and the bidirectional identifier/name registry.

use core::fmt::Debug;
use core::hash::Hash;
use core::num::NonZeroU32;
use std::collections::HashMap;

use log::trace;

use crate::error::RegistrationError;

/// Name bound to the sentinel identifier.
pub const INVALID_NAME: &str = "invalid";

/// A dense identifier usable as an index into definition tables.
///
/// Index 0 is always the invalid sentinel.
pub trait Identifier: Copy + Eq + Hash + Debug {
    /// The sentinel identifier, bound to [`INVALID_NAME`].
    const INVALID: Self;

    /// Identifier for a table index; indices that do not fit map to [`Self::INVALID`].
    fn from_index(index: usize) -> Self;

    /// Table index of this identifier.
    fn index(self) -> usize;

    /// Whether this is anything other than the sentinel.
    #[inline]
    fn is_valid(self) -> bool {
        self != Self::INVALID
    }
}

macro_rules! define_identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(Option<NonZeroU32>);

        impl $name {
            /// Identifier with the given raw index; 0 is the invalid sentinel.
            #[inline]
            pub const fn new(index: u32) -> Self {
                Self(NonZeroU32::new(index))
            }
        }

        impl Identifier for $name {
            const INVALID: Self = Self(None);

            #[inline]
            fn from_index(index: usize) -> Self {
                u32::try_from(index).map_or(Self::INVALID, Self::new)
            }

            #[inline]
            fn index(self) -> usize {
                self.0.map_or(0, |raw| raw.get() as usize)
            }
        }
    };
}

define_identifier!(
    /// Identifier of a registered property.
    PropertyId
);

define_identifier!(
    /// Identifier of a registered shorthand.
    ShorthandId
);

/// Bidirectional mapping between dense identifiers and names.
///
/// Slot `i` of the name table holds the name bound to the identifier with index `i`; unbound
/// reserved slots hold an empty string.
#[derive(Clone, Debug)]
pub struct IdNameMap<ID: Identifier> {
    names: Vec<String>,
    ids: HashMap<String, ID>,
}

impl<ID: Identifier> Default for IdNameMap<ID> {
    #[inline]
    fn default() -> Self {
        Self::with_reserved(1)
    }
}

impl<ID: Identifier> IdNameMap<ID> {
    /// Create a map with `reserved` slots for explicitly assigned identifiers.
    ///
    /// Slot 0 is always bound to [`INVALID_NAME`]; identifiers allocated by name start after
    /// the reserved range.
    pub fn with_reserved(reserved: usize) -> Self {
        let mut names = vec![String::new(); reserved.max(1)];
        INVALID_NAME.clone_into(&mut names[0]);
        let mut ids = HashMap::with_capacity(reserved);
        ids.insert(INVALID_NAME.to_owned(), ID::INVALID);
        Self { names, ids }
    }

    /// Bind an explicit, pre-reserved identifier to `name`.
    ///
    /// The name must be non-empty and unbound, and the identifier must be one of the empty
    /// reserved slots. Violations abort in debug builds and leave the map untouched otherwise.
    ///
    /// # Errors
    /// Returns the violated precondition as a [`RegistrationError`].
    pub fn add_pair(&mut self, id: ID, name: &str) -> Result<(), RegistrationError> {
        let index = id.index();
        let result = match self.names.get(index) {
            _ if name.is_empty() => Err(RegistrationError::EmptyName),
            None => Err(RegistrationError::IdOutOfRange {
                index,
                capacity: self.names.len(),
            }),
            Some(bound) if !bound.is_empty() => Err(RegistrationError::IdAlreadyBound {
                index,
                name: bound.clone(),
            }),
            Some(_) if self.ids.contains_key(name) => {
                Err(RegistrationError::NameAlreadyBound(name.to_owned()))
            }
            Some(_) => Ok(()),
        };
        debug_assert!(matches!(result, Ok(())), "add_pair({index}, {name:?}): {result:?}");
        result?;
        name.clone_into(&mut self.names[index]);
        self.ids.insert(name.to_owned(), id);
        trace!("bound id {index} to {name:?}");
        Ok(())
    }

    /// Return the identifier bound to `name`, allocating the next one if it is unseen.
    ///
    /// Returns [`Identifier::INVALID`] for [`INVALID_NAME`], for an empty name and when the
    /// identifier space is exhausted; none of these allocate.
    pub fn get_or_create_id(&mut self, name: &str) -> ID {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        let id = ID::from_index(self.names.len());
        if name.is_empty() || !id.is_valid() {
            return ID::INVALID;
        }
        self.names.push(name.to_owned());
        self.ids.insert(name.to_owned(), id);
        trace!("allocated id {} for {name:?}", id.index());
        id
    }

    /// Identifier bound to `name`, or [`Identifier::INVALID`].
    #[inline]
    pub fn get_id(&self, name: &str) -> ID {
        self.ids.get(name).copied().unwrap_or(ID::INVALID)
    }

    /// Name bound to `id`; out-of-range identifiers yield [`INVALID_NAME`].
    #[inline]
    pub fn name(&self, id: ID) -> &str {
        self.names.get(id.index()).map_or(INVALID_NAME, String::as_str)
    }

    /// Number of slots, including the sentinel and unbound reserved slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Always false: the sentinel slot is present from construction.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Number of bound names, including the sentinel.
    #[inline]
    pub fn bound_count(&self) -> usize {
        self.ids.len()
    }

    /// Index of the first reserved slot that has no name bound.
    pub fn first_unbound(&self) -> Option<usize> {
        self.names.iter().position(String::is_empty)
    }

    /// Whether exactly the first `last` slots are bound, with no gaps and no double booking.
    pub fn all_inserted(&self, last: usize) -> bool {
        let filled = self.names.iter().filter(|name| !name.is_empty()).count();
        let leading = self.names.iter().take(last).all(|name| !name.is_empty());
        filled == last && leading && self.ids.len() == last
    }

    /// Debug-only check of [`Self::all_inserted`] at the end of static registration.
    #[inline]
    pub fn assert_all_inserted(&self, last: usize) {
        debug_assert!(
            self.all_inserted(last),
            "registry has gaps or extra names: {} slots, {} bound, expected {last}",
            self.names.len(),
            self.ids.len()
        );
    }
}
