//! Typed entity ids.
//!
//! Every id is an `(index, generation)` pair handed out by an [`Arena`].
//! Freeing a slot bumps its generation, so an id kept past the free of its
//! entity simply stops resolving.
//!
//! [`Arena`]: crate::Arena

use crate::arena::ArenaId;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name {
            index: u32,
            generation: u32,
        }

        impl $name {
            #[inline]
            pub const fn index(self) -> u32 {
                self.index
            }

            #[inline]
            pub const fn generation(self) -> u32 {
                self.generation
            }
        }

        impl ArenaId for $name {
            #[inline]
            fn from_parts(index: u32, generation: u32) -> Self {
                Self { index, generation }
            }

            #[inline]
            fn index(self) -> u32 {
                self.index
            }

            #[inline]
            fn generation(self) -> u32 {
                self.generation
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($prefix, "#{}.{}"), self.index, self.generation)
            }
        }
    };
}

define_id!(
    /// A cell (a named container of geometry, instances and extraction results).
    CellId, "cell"
);
define_id!(
    /// A geometric object on one layer of one cell.
    ObjId, "obj"
);
define_id!(
    /// A property hanging off an object's property chain.
    PropId, "prop"
);
define_id!(
    /// An extraction-result container (group descriptor) belonging to a cell.
    GroupId, "group"
);
define_id!(NodeId, "node");
define_id!(TermId, "term");
define_id!(DeviceId, "dev");
define_id!(ContactId, "contact");
define_id!(SubcktId, "subckt");
