//! Sequence payloads.
//!
//! All list-shaped handles share [`Seq`]: a queue consumed head-first. The
//! borrowed kinds wrap it together with the database entity they are
//! anchored at, which is what the invalidation scan matches on.

use std::collections::VecDeque;

use lx_core::{CellId, GroupId, ObjId, PropId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seq<T> {
    items: VecDeque<T>,
}

impl<T> Default for Seq<T> {
    fn default() -> Self {
        Self {
            items: VecDeque::new(),
        }
    }
}

impl<T> FromIterator<T> for Seq<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<T> Seq<T> {
    pub fn new(items: impl IntoIterator<Item = T>) -> Self {
        items.into_iter().collect()
    }

    /// Take the head entry. Ownership of owned entries moves to the caller.
    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    #[inline]
    pub fn peek(&self) -> Option<&T> {
        self.items.front()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.items.iter()
    }
}

impl<T: Copy + PartialEq> Seq<T> {
    /// Replace every `old` with `new`, or splice it out when `new` is `None`.
    /// Returns how many entries were touched.
    pub fn replace_or_splice(&mut self, old: T, new: Option<T>) -> usize {
        match new {
            Some(new) => {
                let mut touched = 0;
                for item in self.items.iter_mut().filter(|item| **item == old) {
                    *item = new;
                    touched += 1;
                }
                touched
            }
            None => {
                let before = self.items.len();
                self.items.retain(|item| *item != old);
                before - self.items.len()
            }
        }
    }
}

/// Borrowed object ids collected from one cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjSeq {
    pub cell: CellId,
    pub seq: Seq<ObjId>,
}

impl ObjSeq {
    pub fn new(cell: CellId, items: impl IntoIterator<Item = ObjId>) -> Self {
        Self {
            cell,
            seq: Seq::new(items),
        }
    }
}

/// Borrowed property ids from one object's chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropSeq {
    pub owner: ObjId,
    /// Cell of `owner`, recorded so a cell clear can find the handle.
    pub cell: CellId,
    pub seq: Seq<PropId>,
}

impl PropSeq {
    pub fn new(owner: ObjId, cell: CellId, items: impl IntoIterator<Item = PropId>) -> Self {
        Self {
            owner,
            cell,
            seq: Seq::new(items),
        }
    }
}

/// Borrowed ids into one extraction result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircuitSeq<T> {
    pub group: GroupId,
    pub cell: CellId,
    pub seq: Seq<T>,
}

impl<T> CircuitSeq<T> {
    pub fn new(group: GroupId, cell: CellId, items: impl IntoIterator<Item = T>) -> Self {
        Self {
            group,
            cell,
            seq: Seq::new(items),
        }
    }
}
