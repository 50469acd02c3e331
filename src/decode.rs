use crate::error::WatchError;
use crate::event::WatchEvent;
use std::io::{self, Read};

const READ_BUF_SIZE: usize = 8 * 1024;

/// Incremental line-delimited event decoder.
///
/// Feed raw byte chunks of any size with [`feed`](LineDecoder::feed), then
/// drain decoded events with [`next_event`](LineDecoder::next_event). Bytes
/// after the last line terminator — including a partial multi-byte UTF-8
/// sequence cut by a chunk boundary — stay buffered until a later chunk
/// completes the line, so chunk boundaries can never split, duplicate, or
/// corrupt an event.
///
/// Blank lines produce nothing. A line that is not valid UTF-8 or not a
/// valid event object is skipped with a warning; decoding failures never
/// terminate the stream.
///
/// # Examples
///
/// ```
/// use watchfold::LineDecoder;
///
/// let mut decoder = LineDecoder::new();
///
/// // A chunk boundary in the middle of a line:
/// decoder.feed(br#"{"type":"ADDED","object":{"meta"#);
/// assert!(decoder.next_event().is_none());
///
/// decoder.feed(b"data\":{\"uid\":\"1\"}}}\n");
/// let event = decoder.next_event().unwrap();
/// assert_eq!(event.record().uid(), "1");
/// ```
#[derive(Debug, Default)]
pub struct LineDecoder {
    buf: Vec<u8>,
}

impl LineDecoder {
    /// Create a decoder with an empty buffer.
    pub fn new() -> Self {
        LineDecoder::default()
    }

    /// Append one incoming chunk to the buffer.
    pub fn feed(&mut self, chunk: &[u8]) {
        self.buf.extend_from_slice(chunk);
    }

    /// Decode and remove the next event from the buffer.
    ///
    /// Returns `None` once no complete (terminated) line remains. Blank and
    /// undecodable lines are consumed silently, so a `None` only means
    /// "need more bytes", never "bad input".
    pub fn next_event(&mut self) -> Option<WatchEvent> {
        loop {
            let nl = self.buf.iter().position(|&b| b == b'\n')?;
            let line: Vec<u8> = self.buf.drain(..=nl).collect();
            // Drop the terminator; a preceding '\r' is trimmed below.
            if let Some(event) = decode_line(&line[..nl]) {
                return Some(event);
            }
        }
    }

    /// Signal end of stream.
    ///
    /// A terminated stream may leave an unterminated final fragment in the
    /// buffer; it is discarded, never parsed.
    pub fn finish(&mut self) {
        if !self.buf.is_empty() {
            log::debug!(
                "stream ended with {} bytes of unterminated trailing data; discarding",
                self.buf.len()
            );
            self.buf.clear();
        }
    }

    /// Number of bytes currently held over, awaiting a line terminator.
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }
}

/// Parse one complete line. Returns `None` for blank or undecodable lines.
fn decode_line(raw: &[u8]) -> Option<WatchEvent> {
    let text = match std::str::from_utf8(raw) {
        Ok(text) => text,
        Err(err) => {
            log::warn!("skipping event line with invalid utf-8: {err}");
            return None;
        }
    };
    let line = text.trim();
    if line.is_empty() {
        return None;
    }
    match serde_json::from_str(line) {
        Ok(event) => Some(event),
        Err(err) => {
            log::warn!("skipping undecodable event line: {err}");
            None
        }
    }
}

/// Lazy event sequence over a chunked byte source.
///
/// Wraps any [`Read`] — chunk sizes and timing are whatever the source's
/// `read` calls return. The iterator is single-pass and non-restartable:
/// end of input (`read` returning 0) ends the sequence, and a transport
/// error is yielded once as `Err` and also ends it. Per-line decoding
/// failures are handled inside [`LineDecoder`] and never surface here.
///
/// # Examples
///
/// ```
/// use watchfold::Events;
/// use std::io::Cursor;
///
/// let body = concat!(
///     r#"{"type":"ADDED","object":{"metadata":{"uid":"1"},"name":"a"}}"#, "\n",
///     "not json\n",
///     r#"{"type":"DELETED","object":{"metadata":{"uid":"1"}}}"#, "\n",
/// );
///
/// let kinds: Vec<String> = Events::new(Cursor::new(body))
///     .map(|event| event.unwrap().kind().to_string())
///     .collect();
/// assert_eq!(kinds, ["ADDED", "DELETED"]);
/// ```
pub struct Events<R> {
    source: R,
    decoder: LineDecoder,
    chunk: Vec<u8>,
    done: bool,
}

impl<R: Read> Events<R> {
    /// Start decoding events from the given byte source.
    pub fn new(source: R) -> Self {
        Events {
            source,
            decoder: LineDecoder::new(),
            chunk: vec![0; READ_BUF_SIZE],
            done: false,
        }
    }
}

impl<R: Read> Iterator for Events<R> {
    type Item = Result<WatchEvent, WatchError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(event) = self.decoder.next_event() {
                return Some(Ok(event));
            }
            if self.done {
                return None;
            }
            match self.source.read(&mut self.chunk) {
                Ok(0) => {
                    self.done = true;
                    self.decoder.finish();
                    return None;
                }
                Ok(n) => self.decoder.feed(&self.chunk[..n]),
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => {
                    self.done = true;
                    return Some(Err(WatchError::Transport(err)));
                }
            }
        }
    }
}
