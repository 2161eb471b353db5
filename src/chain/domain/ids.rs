//! Arena indices for chain nodes.

use std::fmt;

use serde::Serialize;

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(transparent)]
        pub struct $name(usize);

        impl $name {
            pub(crate) const fn new(index: usize) -> Self {
                Self(index)
            }

            /// Returns the arena slot.
            #[must_use]
            pub const fn index(self) -> usize {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, "#{}"), self.0)
            }
        }
    };
}

arena_id!(
    /// Index of a version node.
    VersionId,
    "version"
);
arena_id!(
    /// Index of a message node.
    MessageId,
    "message"
);
arena_id!(
    /// Index of a field node.
    FieldId,
    "field"
);
arena_id!(
    /// Index of a oneof node.
    OneofId,
    "oneof"
);
arena_id!(
    /// Index of an enum node.
    EnumId,
    "enum"
);
arena_id!(
    /// Index of an enum value node.
    EnumValueId,
    "enum value"
);
arena_id!(
    /// Index of a method node.
    MethodId,
    "method"
);
