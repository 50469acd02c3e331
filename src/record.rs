use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A mirrored remote record.
///
/// Records arrive on the wire as arbitrary JSON objects. The only field this
/// library interprets is `metadata.uid` — everything else is opaque nested
/// data carried through unmodified in a key-ordered map. Two records with
/// equal `uid` are the same logical entity regardless of any other field
/// differences.
///
/// # Examples
///
/// ```
/// use watchfold::Record;
/// use serde_json::json;
///
/// let record: Record = serde_json::from_value(json!({
///     "metadata": {"uid": "pod-1", "namespace": "default"},
///     "status": {"phase": "Running"},
/// })).unwrap();
///
/// assert_eq!(record.uid(), "pod-1");
/// assert_eq!(record.field("status").unwrap()["phase"], "Running");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Identifying metadata. `metadata.uid` is the only field with meaning
    /// to the reconciler.
    pub metadata: Metadata,

    /// All top-level fields other than `metadata`, passed through verbatim.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// The `metadata` object of a [`Record`].
///
/// `uid` is required — a wire record without it fails to decode and its line
/// is skipped. Any sibling metadata keys are retained but uninterpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Globally unique, stable identifier for the record's lifetime.
    pub uid: String,

    /// Remaining metadata keys, passed through verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record {
    /// Create a record with the given `uid` and no other fields.
    ///
    /// # Examples
    ///
    /// ```
    /// use watchfold::Record;
    ///
    /// let record = Record::new("abc-123");
    /// assert_eq!(record.uid(), "abc-123");
    /// assert!(record.fields.is_empty());
    /// ```
    pub fn new(uid: impl Into<String>) -> Self {
        Record {
            metadata: Metadata {
                uid: uid.into(),
                extra: Map::new(),
            },
            fields: Map::new(),
        }
    }

    /// Set a top-level field, replacing any previous value for the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use watchfold::Record;
    /// use serde_json::json;
    ///
    /// let record = Record::new("abc-123")
    ///     .with_field("name", json!("frontend"))
    ///     .with_field("replicas", json!(3));
    /// assert_eq!(record.field("replicas"), Some(&json!(3)));
    /// ```
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.fields.insert(key.into(), value);
        self
    }

    /// The record's unique identifier.
    pub fn uid(&self) -> &str {
        &self.metadata.uid
    }

    /// Look up a top-level field by name. `metadata` is not reachable this
    /// way — use [`Record::metadata`] directly.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}
