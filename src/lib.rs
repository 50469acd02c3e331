//! Live local mirrors of remote record collections — your view is a fold
//! over a change-event stream.
//!
//! A remote source pushes newline-delimited JSON change events (`ADDED`,
//! `MODIFIED`, `DELETED`) over a long-lived connection. [`LineDecoder`] and
//! [`Events`] turn the raw byte chunks into discrete [`WatchEvent`]s no
//! matter where chunk boundaries fall; [`View`] folds those events into the
//! current collection or single-record state, keyed by each record's
//! `metadata.uid`; [`Subscription`] ties the two together in one
//! cancellable loop publishing through a shared [`ViewHandle`].
//!
//! Opening the connection, authentication, and reconnect policy stay with
//! the caller — the core consumes any [`std::io::Read`] and never retries.
//!
//! ```
//! use watchfold::{Subscription, Target};
//! use std::io::Cursor;
//!
//! let body = concat!(
//!     r#"{"type":"ADDED","object":{"metadata":{"uid":"1"},"name":"a"}}"#, "\n",
//!     r#"{"type":"MODIFIED","object":{"metadata":{"uid":"1"},"name":"a2"}}"#, "\n",
//! );
//!
//! let subscription = Subscription::new(Target::new("Pod").with_namespace("default"));
//! let view = subscription.view();
//! subscription.run(Cursor::new(body))?;
//!
//! let records = view.records();
//! assert_eq!(records.len(), 1);
//! assert_eq!(records[0].field("name").unwrap(), "a2");
//! # Ok::<(), watchfold::WatchError>(())
//! ```

mod decode;
mod error;
mod event;
mod handle;
mod record;
mod subscription;
mod view;

pub use decode::{Events, LineDecoder};
pub use error::WatchError;
pub use event::WatchEvent;
pub use handle::{ViewHandle, WaitResult};
pub use record::{Metadata, Record};
pub use subscription::{CancelToken, Outcome, Subscription, Target};
pub use view::{Mode, View};
