//! Lazy search handles.
//!
//! A generator never materializes its result set. It owns a resumable
//! [`Cursor`] over one cell plus a queue of criteria still to try; each
//! step asks the cursor for one more match and, when the current criterion
//! runs dry, restarts the cursor on the next one.

use lx_core::{CellId, Database, ObjId, Rect};
use smallvec::SmallVec;

/// Outcome of asking a cursor for its next match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CursorStep {
    Match(ObjId),
    /// No further matches for the current criterion.
    Exhausted,
    /// The cursor can no longer make sense of the database.
    Corrupt(String),
}

/// Resumable query over the database.
pub trait Cursor {
    fn next_match(&mut self, db: &Database) -> CursorStep;

    /// Start over on the same region with a different criterion.
    fn restart(&mut self, criterion: &str);

    fn criterion(&self) -> &str;
}

/// Scans one cell's objects in list order for rectangles on a layer that
/// overlap a fixed region.
#[derive(Debug, Clone)]
pub struct RegionCursor {
    cell: CellId,
    region: Rect,
    layer: String,
    position: usize,
}

impl RegionCursor {
    pub fn new(cell: CellId, region: Rect, layer: impl Into<String>) -> Self {
        Self {
            cell,
            region,
            layer: layer.into(),
            position: 0,
        }
    }
}

impl Cursor for RegionCursor {
    fn next_match(&mut self, db: &Database) -> CursorStep {
        if db.cell(self.cell).is_none() {
            return CursorStep::Corrupt(format!("{} no longer exists", self.cell));
        }
        match db.scan_region(self.cell, &self.region, &self.layer, self.position) {
            Some((next, obj)) => {
                self.position = next;
                CursorStep::Match(obj)
            }
            None => {
                self.position = db.objects_of(self.cell).len();
                CursorStep::Exhausted
            }
        }
    }

    fn restart(&mut self, criterion: &str) {
        self.layer.clear();
        self.layer.push_str(criterion);
        self.position = 0;
    }

    fn criterion(&self) -> &str {
        &self.layer
    }
}

pub struct Generator {
    cursor: Box<dyn Cursor>,
    cell: CellId,
    /// Criteria not yet tried, stored last-first so `pop` yields the next one.
    pending: SmallVec<[String; 4]>,
    /// Matches still allowed; `None` is unbounded.
    depth: Option<usize>,
}

impl std::fmt::Debug for Generator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Generator")
            .field("cell", &self.cell)
            .field("criterion", &self.cursor.criterion())
            .field("pending", &self.pending)
            .field("depth", &self.depth)
            .finish()
    }
}

impl Generator {
    /// Wrap a cursor already positioned on its first criterion; `rest` are
    /// tried in order once it runs dry.
    pub fn new(
        cursor: Box<dyn Cursor>,
        cell: CellId,
        rest: impl IntoIterator<Item = String>,
    ) -> Self {
        let mut pending: SmallVec<[String; 4]> = rest.into_iter().collect();
        pending.reverse();
        Self {
            cursor,
            cell,
            pending,
            depth: None,
        }
    }

    /// Search `region` of `cell` on each of `layers` in turn. `None` when
    /// no layer is given.
    pub fn over_layers<S: AsRef<str>>(cell: CellId, region: Rect, layers: &[S]) -> Option<Self> {
        let (first, rest) = layers.split_first()?;
        let cursor = RegionCursor::new(cell, region, first.as_ref());
        Some(Self::new(
            Box::new(cursor),
            cell,
            rest.iter().map(|l| l.as_ref().to_string()),
        ))
    }

    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = Some(depth);
        self
    }

    pub fn cell(&self) -> CellId {
        self.cell
    }

    pub fn criterion(&self) -> &str {
        self.cursor.criterion()
    }

    /// Criteria still queued behind the current one.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Produce the next match, moving through the criterion queue as each
    /// criterion is used up.
    pub fn advance(&mut self, db: &Database) -> CursorStep {
        loop {
            if self.depth == Some(0) {
                return CursorStep::Exhausted;
            }
            match self.cursor.next_match(db) {
                CursorStep::Match(obj) => {
                    if let Some(d) = self.depth.as_mut() {
                        *d -= 1;
                    }
                    return CursorStep::Match(obj);
                }
                CursorStep::Exhausted => match self.pending.pop() {
                    Some(next) => self.cursor.restart(&next),
                    None => return CursorStep::Exhausted,
                },
                CursorStep::Corrupt(msg) => return CursorStep::Corrupt(msg),
            }
        }
    }
}
