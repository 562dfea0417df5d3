//! Host design database for the lx handle table.
//!
//! This crate contains the entities script handles may point at:
//! - `Database` - Cells, geometric objects, properties and extraction groups
//! - `Arena` - Generational slab backing every entity kind
//! - `CellId`, `ObjId`, ... - Typed ids that never resolve once freed
//! - `DbObserver` - Notifications issued before any entity is freed

pub mod arena;
pub mod db;
pub mod entity;
pub mod geom;
pub mod hash;
pub mod ids;
pub mod observer;

pub use arena::{Arena, ArenaId};
pub use db::{Database, DbError};
pub use entity::{Cell, Contact, Device, Group, Instance, Node, Object, Property, Shape, Subckt, Terminal};
pub use geom::{Orient, Point, Rect, Transform};
pub use hash::{FastHashMap, FastHashSet, fast_hasher};
pub use ids::{CellId, ContactId, DeviceId, GroupId, NodeId, ObjId, PropId, SubcktId, TermId};
pub use observer::{DbObserver, NullObserver};
