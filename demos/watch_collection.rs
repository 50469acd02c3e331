//! Collection watch — fold a chunked change-event stream into a live view.
//!
//! Simulates a remote sending newline-delimited events in awkwardly-sized
//! chunks (boundaries fall mid-line), decodes them with `Events`, and folds
//! each one into a collection `View`, printing the mirror after every step.

use std::io::{self, Read};
use watchfold::{Events, Mode, View};

/// Hands out the body in fixed-size chunks, like a network read would.
struct ChunkedBody {
    data: Vec<u8>,
    pos: usize,
    chunk: usize,
}

impl Read for ChunkedBody {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.pos >= self.data.len() {
            return Ok(0);
        }
        let n = self.chunk.min(buf.len()).min(self.data.len() - self.pos);
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let body = concat!(
        r#"{"type":"ADDED","object":{"metadata":{"uid":"p-1"},"name":"web-0"}}"#, "\n",
        r#"{"type":"ADDED","object":{"metadata":{"uid":"p-2"},"name":"web-1"}}"#, "\n",
        "this line is corrupt and will be skipped\n",
        r#"{"type":"MODIFIED","object":{"metadata":{"uid":"p-1"},"name":"web-0","ready":true}}"#, "\n",
        r#"{"type":"DELETED","object":{"metadata":{"uid":"p-2"}}}"#, "\n",
    );

    // 7-byte chunks: every line is cut several times.
    let source = ChunkedBody {
        data: body.as_bytes().to_vec(),
        pos: 0,
        chunk: 7,
    };

    let mut view = View::new(Mode::Collection);
    for event in Events::new(source) {
        let event = event?;
        println!("[stream] {} {}", event.kind(), event.record().uid());
        view.apply(&event);

        let names: Vec<&str> = view
            .records()
            .iter()
            .filter_map(|r| r.field("name")?.as_str())
            .collect();
        println!("[view]   {names:?}");
    }

    println!("\nDone — {} record(s) mirrored at end of stream.", view.len());
    Ok(())
}
