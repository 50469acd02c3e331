use crate::record::Record;
use serde::{Deserialize, Serialize};

/// One change notification from the watch stream.
///
/// Events are serialized on the wire as single JSON lines of the form
/// `{"type": "ADDED", "object": {...}}`. The three known types map to
/// [`Added`](WatchEvent::Added), [`Modified`](WatchEvent::Modified) and
/// [`Deleted`](WatchEvent::Deleted); any other type tag decodes to
/// [`Other`](WatchEvent::Other) rather than failing, so an unrecognized
/// event skips reconciliation instead of killing the stream.
///
/// `Added` and `Modified` carry the post-change record; `Deleted` carries
/// the last-known state. Events have no sequence numbers — arrival order on
/// the stream is their only ordering.
///
/// # Examples
///
/// ```
/// use watchfold::WatchEvent;
///
/// let line = r#"{"type":"ADDED","object":{"metadata":{"uid":"1"},"name":"a"}}"#;
/// let event: WatchEvent = serde_json::from_str(line).unwrap();
///
/// match &event {
///     WatchEvent::Added(record) => assert_eq!(record.uid(), "1"),
///     _ => unreachable!(),
/// }
/// assert_eq!(event.record().uid(), "1");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireEvent", into = "WireEvent")]
pub enum WatchEvent {
    /// A record appeared; carries its current state.
    Added(Record),
    /// A record changed; carries its post-change state.
    Modified(Record),
    /// A record disappeared; carries its last-known state.
    Deleted(Record),
    /// An event type this library does not recognize. Reconciliation leaves
    /// the view untouched; the original tag is preserved for callers
    /// consuming raw events.
    Other {
        /// The wire `type` tag, verbatim.
        kind: String,
        /// The wire `object`, verbatim.
        record: Record,
    },
}

impl WatchEvent {
    /// The record carried by this event, whatever its type.
    pub fn record(&self) -> &Record {
        match self {
            WatchEvent::Added(record)
            | WatchEvent::Modified(record)
            | WatchEvent::Deleted(record) => record,
            WatchEvent::Other { record, .. } => record,
        }
    }

    /// The wire `type` tag for this event.
    pub fn kind(&self) -> &str {
        match self {
            WatchEvent::Added(_) => "ADDED",
            WatchEvent::Modified(_) => "MODIFIED",
            WatchEvent::Deleted(_) => "DELETED",
            WatchEvent::Other { kind, .. } => kind,
        }
    }
}

/// Exact wire shape of one event line.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireEvent {
    #[serde(rename = "type")]
    kind: String,
    object: Record,
}

impl From<WireEvent> for WatchEvent {
    fn from(wire: WireEvent) -> Self {
        match wire.kind.as_str() {
            "ADDED" => WatchEvent::Added(wire.object),
            "MODIFIED" => WatchEvent::Modified(wire.object),
            "DELETED" => WatchEvent::Deleted(wire.object),
            _ => WatchEvent::Other {
                kind: wire.kind,
                record: wire.object,
            },
        }
    }
}

impl From<WatchEvent> for WireEvent {
    fn from(event: WatchEvent) -> Self {
        let kind = event.kind().to_string();
        let object = match event {
            WatchEvent::Added(record)
            | WatchEvent::Modified(record)
            | WatchEvent::Deleted(record) => record,
            WatchEvent::Other { record, .. } => record,
        };
        WireEvent { kind, object }
    }
}
