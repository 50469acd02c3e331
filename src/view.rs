use crate::event::WatchEvent;
use crate::record::Record;
use serde::{Deserialize, Serialize};

/// Whether a view mirrors a whole collection or one named item.
///
/// Fixed when the view is created — a subscription targeting a single named
/// record gets [`Mode::Single`], one targeting a kind gets
/// [`Mode::Collection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// Ordered, non-deduplicated mirror of many records.
    Collection,
    /// Mirror of at most one targeted record.
    Single,
}

/// The reconciled local mirror: a fold over the event stream.
///
/// A fresh collection view is empty; a fresh single-record view is absent.
/// Both change only through [`apply`](View::apply), which folds one event
/// at a time in arrival order. A view belongs to exactly one subscription
/// and is discarded with it — nothing carries across reconnects.
///
/// # Examples
///
/// ```
/// use watchfold::{Mode, Record, View, WatchEvent};
///
/// let mut view = View::new(Mode::Collection);
/// view.apply(&WatchEvent::Added(Record::new("a")));
/// view.apply(&WatchEvent::Added(Record::new("b")));
/// view.apply(&WatchEvent::Deleted(Record::new("a")));
///
/// let uids: Vec<&str> = view.records().iter().map(|r| r.uid()).collect();
/// assert_eq!(uids, ["b"]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum View {
    /// Records in insertion order of first appearance.
    Collection(Vec<Record>),
    /// The targeted record, if currently present.
    Single(Option<Record>),
}

impl View {
    /// Create an empty view for the given mode.
    pub fn new(mode: Mode) -> Self {
        match mode {
            Mode::Collection => View::Collection(Vec::new()),
            Mode::Single => View::Single(None),
        }
    }

    /// The mode this view was created with.
    pub fn mode(&self) -> Mode {
        match self {
            View::Collection(_) => Mode::Collection,
            View::Single(_) => Mode::Single,
        }
    }

    /// Fold one event into the view.
    ///
    /// Total over its input — every event/mode combination has a defined
    /// outcome, with "unchanged" a valid one:
    ///
    /// - single `Added`: replace unconditionally, even when a record with a
    ///   different uid is already held.
    /// - single `Modified`: replace only when the held record's uid matches;
    ///   otherwise unchanged.
    /// - single `Deleted`: become absent regardless of uid.
    /// - collection `Added`: append. Uniqueness is not enforced; a duplicate
    ///   uid coexists with the original.
    /// - collection `Modified`: replace the first uid match in place; no
    ///   match, unchanged.
    /// - collection `Deleted`: remove the first uid match; no match,
    ///   unchanged.
    /// - `Other`: unchanged in both modes.
    pub fn apply(&mut self, event: &WatchEvent) {
        match self {
            View::Single(slot) => match event {
                WatchEvent::Added(record) => *slot = Some(record.clone()),
                WatchEvent::Modified(record) => {
                    if slot.as_ref().is_some_and(|held| held.uid() == record.uid()) {
                        *slot = Some(record.clone());
                    }
                }
                WatchEvent::Deleted(_) => *slot = None,
                WatchEvent::Other { .. } => {}
            },
            View::Collection(records) => match event {
                WatchEvent::Added(record) => records.push(record.clone()),
                WatchEvent::Modified(record) => {
                    if let Some(held) = records.iter_mut().find(|r| r.uid() == record.uid()) {
                        *held = record.clone();
                    }
                }
                WatchEvent::Deleted(record) => {
                    if let Some(i) = records.iter().position(|r| r.uid() == record.uid()) {
                        records.remove(i);
                    }
                }
                WatchEvent::Other { .. } => {}
            },
        }
    }

    /// All records currently in the view, in order.
    ///
    /// A single-record view yields a zero- or one-element slice.
    pub fn records(&self) -> &[Record] {
        match self {
            View::Collection(records) => records,
            View::Single(slot) => slot.as_slice(),
        }
    }

    /// The record of a single-record view, or `None` when absent.
    ///
    /// Always `None` for a collection view — use [`records`](View::records)
    /// or [`get`](View::get) there.
    pub fn record(&self) -> Option<&Record> {
        match self {
            View::Single(slot) => slot.as_ref(),
            View::Collection(_) => None,
        }
    }

    /// The first record with the given uid, in either mode.
    pub fn get(&self, uid: &str) -> Option<&Record> {
        self.records().iter().find(|r| r.uid() == uid)
    }

    /// Number of records currently held.
    pub fn len(&self) -> usize {
        self.records().len()
    }

    /// True when no record is held.
    pub fn is_empty(&self) -> bool {
        self.records().is_empty()
    }
}
