//! Script-facing session context.
//!
//! A `Session` owns the database and the handle registry together, so every
//! edit made through it reaches the registry's invalidation entry points.
//! Script-level calls report failures as rendered diagnostics.

use std::fmt::Display;
use std::net::ToSocketAddrs;
use std::path::Path;
use std::process::Command;

use lx_core::{CellId, Database, DbObserver, DeviceId, GroupId, ObjId, Rect, Transform};
use lx_diag::{Diagnostic, DiagnosticKind, render_diagnostic};

use crate::config::RegistryConfig;
use crate::entry::Entry;
use crate::errors::HandleError;
use crate::generator::Generator;
use crate::id::HandleId;
use crate::job::HostJob;
use crate::kind::Mode;
use crate::payload::Payload;
use crate::registry::{Registry, Step};
use crate::resource::Resource;
use crate::seq::{CircuitSeq, ObjSeq, PropSeq, Seq};
use crate::unique::UniquenessTester;

pub struct Session {
    db: Database,
    handles: Registry,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            db: Database::new(),
            handles: Registry::with_config(config),
        }
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn handles(&self) -> &Registry {
        &self.handles
    }

    pub fn handles_mut(&mut self) -> &mut Registry {
        &mut self.handles
    }

    /// Run a database edit with the registry as its observer.
    pub fn edit<R>(&mut self, f: impl FnOnce(&mut Database, &mut dyn DbObserver) -> R) -> R {
        let out = f(&mut self.db, &mut self.handles);
        debug_assert!(
            self.handles.audit(&self.db).is_empty(),
            "edit left handles pointing at freed entities"
        );
        out
    }

    fn error(err: impl Into<HandleError>) -> String {
        render_diagnostic(&err.into().to_diagnostic())
    }

    fn unknown(what: impl Display) -> String {
        render_diagnostic(&Diagnostic::error_kind(DiagnosticKind::UnknownEntity(
            what.to_string(),
        )))
    }

    fn cell_named(&self, name: &str) -> Result<CellId, String> {
        self.db
            .cell_by_name(name)
            .ok_or_else(|| Self::unknown(format!("cell '{}'", name)))
    }

    fn group_cell(&self, group: GroupId) -> Result<CellId, String> {
        self.db
            .group(group)
            .map(|g| g.cell)
            .ok_or_else(|| Self::unknown(group))
    }

    // ------------------------------------------------------------------
    // Producers
    // ------------------------------------------------------------------

    pub fn list_text<I, S>(&mut self, items: I) -> HandleId
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let seq = items.into_iter().map(Into::into).collect::<Seq<String>>();
        self.handles.create(Payload::Text(seq))
    }

    /// Borrowed handle over the objects of `cell`, optionally one layer only.
    pub fn select_objects(&mut self, cell: &str, layer: Option<&str>) -> Result<HandleId, String> {
        let cell = self.cell_named(cell)?;
        let db = &self.db;
        let objs = db
            .objects_of(cell)
            .iter()
            .copied()
            .filter(|id| match layer {
                Some(layer) => db.object(*id).is_some_and(|o| o.layer == layer),
                None => true,
            })
            .collect::<Vec<_>>();
        Ok(self.handles.create(Payload::Objects(ObjSeq::new(cell, objs))))
    }

    /// Owned handle over flattened copies of everything under `cell`.
    pub fn flatten_cell(&mut self, cell: &str) -> Result<HandleId, String> {
        let cell = self.cell_named(cell)?;
        let shapes = self
            .db
            .flatten(cell, &Transform::IDENTITY)
            .map_err(Self::error)?;
        Ok(self.handles.create(Payload::Shapes(Seq::new(shapes))))
    }

    pub fn list_properties(&mut self, obj: ObjId) -> Result<HandleId, String> {
        let cell = self.db.object(obj).ok_or_else(|| Self::unknown(obj))?.cell;
        let props = self.db.props_of(obj).to_vec();
        Ok(self
            .handles
            .create(Payload::Props(PropSeq::new(obj, cell, props))))
    }

    pub fn list_nodes(&mut self, group: GroupId) -> Result<HandleId, String> {
        let cell = self.group_cell(group)?;
        let items = self.db.group(group).map(|g| g.nodes.clone()).unwrap_or_default();
        Ok(self
            .handles
            .create(Payload::Nodes(CircuitSeq::new(group, cell, items))))
    }

    pub fn list_devices(&mut self, group: GroupId) -> Result<HandleId, String> {
        let cell = self.group_cell(group)?;
        let items = self.db.group(group).map(|g| g.devices.clone()).unwrap_or_default();
        Ok(self
            .handles
            .create(Payload::Devices(CircuitSeq::new(group, cell, items))))
    }

    pub fn list_contacts(&mut self, group: GroupId) -> Result<HandleId, String> {
        let cell = self.group_cell(group)?;
        let items = self.db.group(group).map(|g| g.contacts.clone()).unwrap_or_default();
        Ok(self
            .handles
            .create(Payload::Contacts(CircuitSeq::new(group, cell, items))))
    }

    pub fn list_subckts(&mut self, group: GroupId) -> Result<HandleId, String> {
        let cell = self.group_cell(group)?;
        let items = self.db.group(group).map(|g| g.subckts.clone()).unwrap_or_default();
        Ok(self
            .handles
            .create(Payload::Subckts(CircuitSeq::new(group, cell, items))))
    }

    pub fn list_terminals(&mut self, device: DeviceId) -> Result<HandleId, String> {
        let group = self.db.device(device).ok_or_else(|| Self::unknown(device))?.group;
        let cell = self.group_cell(group)?;
        let items = self.db.terminals_of(device).to_vec();
        Ok(self
            .handles
            .create(Payload::Terminals(CircuitSeq::new(group, cell, items))))
    }

    /// Lazy search of `region` in `cell`, one layer after another.
    pub fn search_layers(
        &mut self,
        cell: &str,
        region: Rect,
        layers: &[&str],
        depth: Option<usize>,
    ) -> Result<HandleId, String> {
        let cell = self.cell_named(cell)?;
        let generator = Generator::over_layers(cell, region, layers).ok_or_else(|| {
            render_diagnostic(&Diagnostic::error("search needs at least one layer"))
        })?;
        let generator = match depth {
            Some(d) => generator.with_depth(d),
            None => generator,
        };
        Ok(self.handles.create(Payload::Generator(Box::new(generator))))
    }

    pub fn open_file(&mut self, path: &Path, writable: bool) -> Result<HandleId, String> {
        let resource = Resource::open_file(path, writable).map_err(|source| {
            Self::error(HandleError::Open {
                what: path.display().to_string(),
                source,
            })
        })?;
        Ok(self.handles.create(Payload::Resource(resource)))
    }

    pub fn spawn_pipe(&mut self, command: &mut Command) -> Result<HandleId, String> {
        let resource = Resource::spawn_pipe(command).map_err(|source| {
            Self::error(HandleError::Open {
                what: format!("pipe to {:?}", command.get_program()),
                source,
            })
        })?;
        Ok(self.handles.create(Payload::Resource(resource)))
    }

    pub fn connect_socket<A: ToSocketAddrs + Display>(&mut self, addr: A) -> Result<HandleId, String> {
        let what = format!("socket {}", addr);
        let resource = Resource::connect(addr)
            .map_err(|source| Self::error(HandleError::Open { what, source }))?;
        Ok(self.handles.create(Payload::Resource(resource)))
    }

    pub fn start_job(&mut self, job: Box<dyn HostJob>) -> HandleId {
        self.handles.create(Payload::Job(job))
    }

    // ------------------------------------------------------------------
    // Consumers
    // ------------------------------------------------------------------

    /// Next entry of `id`; `None` once it is exhausted or if it never existed.
    pub fn next(&mut self, id: HandleId) -> Result<Option<Entry>, String> {
        self.handles
            .step(id, &self.db)
            .map(Step::into_entry)
            .map_err(Self::error)
    }

    pub fn close(&mut self, id: HandleId) -> Result<(), String> {
        self.handles.close(id).map_err(Self::error)
    }

    pub fn unique_set(&self, id: HandleId) -> UniquenessTester {
        UniquenessTester::build(&self.handles, id)
    }

    pub fn is_member(&self, tester: &UniquenessTester, id: HandleId) -> bool {
        tester.test(&self.handles, id)
    }

    /// One-line summary such as `object handle 3 (borrowed, 2 left)`.
    pub fn describe(&self, id: HandleId) -> Option<String> {
        let rec = self.handles.resolve(id)?;
        let mode = match rec.mode() {
            Mode::Borrowed => "borrowed",
            Mode::Owned => "owned",
        };
        Some(match rec.remaining() {
            Some(n) => format!("{} handle {} ({}, {} left)", rec.kind(), id, mode, n),
            None => format!("{} handle {} ({})", rec.kind(), id, mode),
        })
    }

    /// Close every handle, as at the end of a script session.
    pub fn end(&mut self) -> usize {
        self.handles.teardown()
    }
}
