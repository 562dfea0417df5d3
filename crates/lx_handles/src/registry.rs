//! Handle registry.
//!
//! Maps live handle ids to their records. Records leave the table in exactly
//! one of four ways: exhaustion during `step`, explicit `close`, forced
//! closure by an invalidation notification, or `teardown`. Each path runs
//! the payload's disposal once.

use indexmap::IndexMap;
use lx_core::{Database, fast_hasher};
use lx_diag::{Diagnostic, DiagnosticKind, render_diagnostic};
use tracing::{debug, info, trace, warn};

use crate::config::RegistryConfig;
use crate::entry::{Entry, EntryKey};
use crate::errors::HandleError;
use crate::generator::CursorStep;
use crate::id::HandleId;
use crate::job::HostJob;
use crate::kind::{HandleKind, HandleState, Mode};
use crate::payload::Payload;
use crate::resource::Resource;
use crate::seq::ObjSeq;

type RecordMap = IndexMap<HandleId, HandleRecord, ahash::RandomState>;

#[derive(Debug)]
pub struct HandleRecord {
    id: HandleId,
    kind: HandleKind,
    mode: Mode,
    state: HandleState,
    payload: Payload,
}

impl HandleRecord {
    pub fn id(&self) -> HandleId {
        self.id
    }

    pub fn kind(&self) -> HandleKind {
        self.kind
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn state(&self) -> HandleState {
        self.state
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub(crate) fn payload_mut(&mut self) -> &mut Payload {
        &mut self.payload
    }

    pub fn remaining(&self) -> Option<usize> {
        self.payload.remaining()
    }
}

/// Result of stepping a handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Item(Entry),
    /// Nothing left: the handle is gone (or never existed).
    Exhausted,
}

impl Step {
    pub fn into_entry(self) -> Option<Entry> {
        match self {
            Step::Item(e) => Some(e),
            Step::Exhausted => None,
        }
    }
}

/// Live-table summary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stats {
    pub live: usize,
    pub created: u64,
    pub closed: u64,
    per_kind: [usize; HandleKind::ALL.len()],
}

impl Stats {
    pub fn count(&self, kind: HandleKind) -> usize {
        self.per_kind[kind as usize]
    }
}

enum Advance {
    Yield(Entry),
    Spawn(lx_core::CellId, lx_core::ObjId),
    Drained,
    Corrupt(String),
}

pub struct Registry {
    records: RecordMap,
    next_id: u64,
    config: RegistryConfig,
    created: u64,
    closed: u64,
    over_threshold: bool,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            records: IndexMap::with_hasher(fast_hasher()),
            next_id: config.first_id.clamp(1, HandleId::MAX.0),
            config,
            created: 0,
            closed: 0,
            over_threshold: false,
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Next counter value not naming a live record. The counter runs over
    /// `1..=HandleId::MAX` and wraps back to 1; live ids are skipped.
    fn allocate_id(&mut self) -> HandleId {
        loop {
            let id = HandleId(self.next_id);
            self.next_id = if self.next_id >= HandleId::MAX.0 {
                1
            } else {
                self.next_id + 1
            };
            if !self.records.contains_key(&id) {
                return id;
            }
        }
    }

    /// Register `payload` and return its new id. Never fails.
    pub fn create(&mut self, payload: Payload) -> HandleId {
        let id = self.allocate_id();
        let kind = payload.kind();
        let mode = payload.mode();
        debug!(
            handle = id.0,
            kind = kind.name(),
            ?mode,
            remaining = ?payload.remaining(),
            "handle created"
        );
        self.records.insert(
            id,
            HandleRecord {
                id,
                kind,
                mode,
                state: HandleState::Active,
                payload,
            },
        );
        self.created += 1;

        let live = self.records.len();
        if live > self.config.live_warn_threshold && !self.over_threshold {
            self.over_threshold = true;
            warn!(
                live,
                threshold = self.config.live_warn_threshold,
                "live handle count above threshold"
            );
        }
        id
    }

    /// Look up a live record. Unknown, stale and closed ids are `None`.
    #[inline]
    pub fn resolve(&self, id: HandleId) -> Option<&HandleRecord> {
        self.records.get(&id)
    }

    #[inline]
    pub fn contains(&self, id: HandleId) -> bool {
        self.records.contains_key(&id)
    }

    /// `Closed` for ids not in the table.
    pub fn state(&self, id: HandleId) -> HandleState {
        self.resolve(id)
            .map(HandleRecord::state)
            .unwrap_or(HandleState::Closed)
    }

    pub fn expect_kind(&self, id: HandleId, kind: HandleKind) -> Result<&HandleRecord, HandleError> {
        let rec = self.resolve(id).ok_or(HandleError::NotFound(id))?;
        if rec.kind != kind {
            return Err(HandleError::WrongKind {
                id,
                expected: kind,
                actual: rec.kind,
            });
        }
        Ok(rec)
    }

    /// Dispose and remove `id`. Closing an absent id is a no-op. A disposal
    /// error is returned, but the record is gone either way.
    pub fn close(&mut self, id: HandleId) -> Result<(), HandleError> {
        match self.remove(id) {
            Some(rec) => self.dispose(rec, "closed"),
            None => {
                trace!(handle = id.0, "close on absent handle");
                Ok(())
            }
        }
    }

    /// Produce the next entry of `id`.
    ///
    /// A handle whose payload drains is disposed and removed within the same
    /// call, so it stops resolving as soon as its last entry is handed out.
    /// Unknown ids read as exhausted.
    pub fn step(&mut self, id: HandleId, db: &Database) -> Result<Step, HandleError> {
        let Some(rec) = self.records.get_mut(&id) else {
            trace!(handle = id.0, "step on absent handle");
            return Ok(Step::Exhausted);
        };
        if !rec.kind.is_iterable() {
            return Err(HandleError::NotIterable(rec.kind));
        }
        let advance = match &mut rec.payload {
            Payload::Generator(g) => match g.advance(db) {
                CursorStep::Match(obj) => Advance::Spawn(g.cell(), obj),
                CursorStep::Exhausted => Advance::Drained,
                CursorStep::Corrupt(msg) => Advance::Corrupt(msg),
            },
            seq => match seq.pop_entry() {
                Some(entry) => Advance::Yield(entry),
                None => Advance::Drained,
            },
        };
        let drained = rec.payload.is_drained();

        match advance {
            Advance::Yield(entry) => {
                if drained {
                    self.reap(id);
                }
                Ok(Step::Item(entry))
            }
            Advance::Spawn(cell, obj) => {
                let child = self.create(Payload::Objects(ObjSeq::new(cell, [obj])));
                Ok(Step::Item(Entry::Handle(child)))
            }
            Advance::Drained => {
                self.reap(id);
                Ok(Step::Exhausted)
            }
            Advance::Corrupt(reason) => {
                let diag = Diagnostic::warning_kind(DiagnosticKind::GeneratorCorrupt(reason));
                warn!(handle = id.0, "search abandoned: {}", render_diagnostic(&diag));
                self.reap(id);
                Ok(Step::Exhausted)
            }
        }
    }

    /// Identity of the entry `step` would yield next.
    pub fn peek(&self, id: HandleId) -> Option<EntryKey> {
        self.resolve(id)?.payload.head()
    }

    pub fn remaining(&self, id: HandleId) -> Option<usize> {
        self.resolve(id)?.remaining()
    }

    pub fn resource_mut(&mut self, id: HandleId) -> Result<&mut Resource, HandleError> {
        let rec = self.records.get_mut(&id).ok_or(HandleError::NotFound(id))?;
        let actual = rec.kind;
        match rec.payload_mut() {
            Payload::Resource(r) => Ok(r),
            _ => Err(HandleError::WrongKind {
                id,
                expected: HandleKind::Resource,
                actual,
            }),
        }
    }

    pub fn job_mut<T: HostJob>(&mut self, id: HandleId) -> Result<&mut T, HandleError> {
        let rec = self.records.get_mut(&id).ok_or(HandleError::NotFound(id))?;
        let actual = rec.kind;
        match rec.payload_mut() {
            Payload::Job(job) => {
                let name = job.kind().name();
                job.as_any_mut()
                    .downcast_mut::<T>()
                    .ok_or(HandleError::JobType { id, actual: name })
            }
            _ => Err(HandleError::WrongKind {
                id,
                expected: HandleKind::Job,
                actual,
            }),
        }
    }

    #[inline]
    pub fn live_count(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Live ids in creation order.
    pub fn ids(&self) -> impl Iterator<Item = HandleId> + '_ {
        self.records.keys().copied()
    }

    pub fn stats(&self) -> Stats {
        let mut stats = Stats {
            live: self.records.len(),
            created: self.created,
            closed: self.closed,
            ..Stats::default()
        };
        for rec in self.records.values() {
            stats.per_kind[rec.kind as usize] += 1;
        }
        stats
    }

    /// Handles holding an entry that no longer resolves in `db`. Always
    /// empty while every edit is routed through the registry.
    pub fn audit(&self, db: &Database) -> Vec<HandleId> {
        self.records
            .values()
            .filter(|rec| rec.payload.is_dangling(db))
            .map(|rec| rec.id)
            .collect()
    }

    /// Close every remaining record exactly once. Returns how many were
    /// closed; disposal errors are logged.
    pub fn teardown(&mut self) -> usize {
        let records = std::mem::replace(&mut self.records, IndexMap::with_hasher(fast_hasher()));
        let count = records.len();
        for (_, rec) in records {
            // Errors are logged by `dispose`.
            let _ = self.dispose(rec, "teardown");
        }
        self.over_threshold = false;
        if count > 0 {
            info!(closed = count, "handle table torn down");
        }
        count
    }

    fn remove(&mut self, id: HandleId) -> Option<HandleRecord> {
        let rec = self.records.shift_remove(&id)?;
        if self.over_threshold && self.records.len() <= self.config.live_warn_threshold {
            self.over_threshold = false;
        }
        Some(rec)
    }

    fn dispose(&mut self, rec: HandleRecord, reason: &'static str) -> Result<(), HandleError> {
        let HandleRecord {
            id,
            kind,
            state,
            payload,
            ..
        } = rec;
        self.closed += 1;
        let result = payload.dispose();
        match &result {
            Ok(()) => debug!(handle = id.0, kind = kind.name(), ?state, reason, "handle closed"),
            Err(error) => warn!(
                handle = id.0,
                kind = kind.name(),
                %error,
                reason,
                "handle disposal failed; record removed"
            ),
        }
        result
    }

    /// Dispose a record whose payload drained.
    fn reap(&mut self, id: HandleId) {
        if let Some(mut rec) = self.remove(id) {
            rec.state = HandleState::Exhausted;
            // Only iterable kinds drain, and their disposal cannot fail.
            let _ = self.dispose(rec, "exhausted");
        }
    }

    /// Forcibly close `id` on behalf of an invalidation notification.
    pub(crate) fn force_close(&mut self, id: HandleId, reason: &'static str) {
        if let Some(mut rec) = self.remove(id) {
            if rec.payload.is_drained() {
                rec.state = HandleState::Exhausted;
            }
            let _ = self.dispose(rec, reason);
        }
    }

    pub(crate) fn records_mut(&mut self) -> impl Iterator<Item = &mut HandleRecord> + '_ {
        self.records.values_mut()
    }
}

impl Drop for Registry {
    fn drop(&mut self) {
        self.teardown();
    }
}
