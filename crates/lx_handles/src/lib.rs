//! Script handle table.
//!
//! This crate maps opaque integer handles seen by scripts onto host state:
//! - `Registry` - Owns every live handle record and its payload
//! - `Payload` - Borrowed entity lists, owned copies, generators, resources, jobs
//! - `Generator` - Lazy region search chained across layers
//! - `UniquenessTester` - Set membership over handle contents
//! - `Session` - Database plus registry, wired so edits invalidate handles

#![allow(clippy::should_implement_trait)]

pub mod config;
pub mod entry;
pub mod errors;
pub mod generator;
pub mod id;
mod invalidate;
pub mod job;
pub mod kind;
pub mod payload;
pub mod registry;
pub mod resource;
pub mod seq;
pub mod session;
pub mod unique;

pub use config::RegistryConfig;
pub use entry::{Entry, EntryKey, Keyed};
pub use errors::HandleError;
pub use generator::{Cursor, CursorStep, Generator, RegionCursor};
pub use id::HandleId;
pub use job::{HostJob, JobKind};
pub use kind::{HandleKind, HandleState, Mode};
pub use payload::Payload;
pub use registry::{HandleRecord, Registry, Stats, Step};
pub use resource::Resource;
pub use seq::{CircuitSeq, ObjSeq, PropSeq, Seq};
pub use session::Session;
pub use unique::UniquenessTester;
