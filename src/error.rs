use std::io;
use thiserror::Error;

/// Terminal failures of one subscription.
///
/// Decode failures never appear here — an undecodable line is skipped and
/// logged, and reconciliation itself cannot fail. What remains is the
/// transport: a failed stream read ends that subscription (and only that
/// subscription); reconnect policy belongs to the caller.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WatchError {
    /// The byte source failed mid-stream.
    #[error("watch transport failure: {0}")]
    Transport(#[from] io::Error),
}
