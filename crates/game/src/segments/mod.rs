//! # Segment Classifiers
//!
//! The scoreboard and the action bar are both made of segments whose
//! meaning is only known from a header or shape. Each segment source has an
//! ordered list of kinds; the first kind whose header pattern matches wins.
//!
//! A [`SegmentTracker`] remembers the kind each slot had on the previous
//! tick and turns the new classification into transitions:
//!
//! - same kind as before: `Updated`
//! - new kind: `Removed` for the old kind, then `Appeared` and `Updated`
//!   for the new one
//! - nothing matched any more: `Removed` for the old kind

pub mod actionbar;
pub mod scoreboard;

use regex::{Captures, Regex};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// Segment transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SegmentChange {
    Appeared,
    Updated,
    Removed,
}

/// A closed set of segment kinds
pub trait SegmentKind: Copy + Eq + Hash + Debug + Send + Sync + 'static {
    /// Every kind, in classification order
    const ALL: &'static [Self];

    fn header_pattern(&self) -> &'static Regex;

    /// The raw segment is not rendered while this kind is shown
    fn is_hidden(&self) -> bool;
}

/// First kind whose header pattern matches, with its captures
pub fn classify<'t, K: SegmentKind>(
    kinds: impl IntoIterator<Item = K>,
    text: &'t str,
) -> Option<(K, Captures<'t>)> {
    kinds
        .into_iter()
        .find_map(|kind| kind.header_pattern().captures(text).map(|caps| (kind, caps)))
}

/// Callbacks for one segment kind
///
/// `appeared` runs once per transition, before the first `update`. After
/// `removed`, the listener hears nothing more about that segment until it
/// appears again.
pub trait SegmentListener<S>: Send + Sync {
    fn appeared(&self, _segment: &S) {}

    fn update(&self, segment: &S);

    fn removed(&self, _segment: &S) {}
}

/// Per-slot kind memory
#[derive(Debug)]
pub struct SegmentTracker<S, K> {
    last: HashMap<S, K>,
}

impl<S, K> SegmentTracker<S, K>
where
    S: Copy + Eq + Hash,
    K: SegmentKind,
{
    pub fn new() -> Self {
        Self {
            last: HashMap::new(),
        }
    }

    /// Kind seen in `slot` on the last tick
    pub fn current(&self, slot: S) -> Option<K> {
        self.last.get(&slot).copied()
    }

    /// Record this tick's classification of `slot`
    ///
    /// # Returns
    /// The transitions to deliver, in order
    pub fn observe(&mut self, slot: S, kind: Option<K>) -> Vec<(K, SegmentChange)> {
        let previous = match kind {
            Some(kind) => self.last.insert(slot, kind),
            None => self.last.remove(&slot),
        };

        let mut changes = Vec::with_capacity(3);
        match (previous, kind) {
            (Some(old), Some(new)) if old == new => {
                changes.push((new, SegmentChange::Updated));
            }
            (previous, kind) => {
                if let Some(old) = previous {
                    changes.push((old, SegmentChange::Removed));
                }
                if let Some(new) = kind {
                    changes.push((new, SegmentChange::Appeared));
                    changes.push((new, SegmentChange::Updated));
                }
            }
        }
        changes
    }

    /// Forget every slot not in `seen`
    ///
    /// # Returns
    /// The dropped slots and the kinds they had
    pub fn retain_slots(&mut self, seen: impl Fn(&S) -> bool) -> Vec<(S, K)> {
        let dropped: Vec<(S, K)> = self
            .last
            .iter()
            .filter(|(slot, _)| !seen(slot))
            .map(|(slot, kind)| (*slot, *kind))
            .collect();
        for (slot, _) in &dropped {
            self.last.remove(slot);
        }
        dropped
    }
}

impl<S, K> Default for SegmentTracker<S, K>
where
    S: Copy + Eq + Hash,
    K: SegmentKind,
{
    fn default() -> Self {
        Self::new()
    }
}
