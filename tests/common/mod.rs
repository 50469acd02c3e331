#![allow(dead_code)]

use serde_json::json;
use std::io::{self, Read};
use std::sync::mpsc::Receiver;
use watchfold::Record;

pub fn named_record(uid: &str, name: &str) -> Record {
    Record::new(uid).with_field("name", json!(name))
}

pub fn added_line(uid: &str, name: &str) -> String {
    format!("{{\"type\":\"ADDED\",\"object\":{{\"metadata\":{{\"uid\":\"{uid}\"}},\"name\":\"{name}\"}}}}\n")
}

pub fn modified_line(uid: &str, name: &str) -> String {
    format!("{{\"type\":\"MODIFIED\",\"object\":{{\"metadata\":{{\"uid\":\"{uid}\"}},\"name\":\"{name}\"}}}}\n")
}

pub fn deleted_line(uid: &str) -> String {
    format!("{{\"type\":\"DELETED\",\"object\":{{\"metadata\":{{\"uid\":\"{uid}\"}}}}}}\n")
}

/// Reader that hands out a body in scripted chunk sizes, then reports EOF.
///
/// Once the size script is exhausted, remaining data comes out in one
/// chunk. Sizes are clamped to at least one byte so a script entry can
/// never masquerade as end-of-stream.
pub struct ChunkReader {
    data: Vec<u8>,
    pos: usize,
    sizes: Vec<usize>,
    next: usize,
}

impl ChunkReader {
    pub fn new(data: impl Into<Vec<u8>>, sizes: Vec<usize>) -> Self {
        ChunkReader {
            data: data.into(),
            pos: 0,
            sizes,
            next: 0,
        }
    }

    /// Every chunk the same size.
    pub fn fixed(data: impl Into<Vec<u8>>, size: usize) -> Self {
        let data = data.into();
        let sizes = vec![size; data.len().div_ceil(size.max(1))];
        ChunkReader::new(data, sizes)
    }
}

impl Read for ChunkReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.pos >= self.data.len() {
            return Ok(0);
        }
        let scripted = self.sizes.get(self.next).copied().unwrap_or(usize::MAX);
        self.next += 1;
        let n = scripted
            .max(1)
            .min(buf.len())
            .min(self.data.len() - self.pos);
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

/// Reader that yields its body, then fails with the given error kind.
pub struct FailingReader {
    data: Vec<u8>,
    pos: usize,
    kind: io::ErrorKind,
}

impl FailingReader {
    pub fn new(data: impl Into<Vec<u8>>, kind: io::ErrorKind) -> Self {
        FailingReader {
            data: data.into(),
            pos: 0,
            kind,
        }
    }
}

impl Read for FailingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.pos >= self.data.len() {
            return Err(io::Error::new(self.kind, "stream torn down"));
        }
        let n = buf.len().min(self.data.len() - self.pos);
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

/// Reader fed chunk-by-chunk from a channel; blocks like a quiet network
/// connection. A dropped sender reads as end of stream.
pub struct ChannelReader {
    chunks: Receiver<Vec<u8>>,
    pending: Vec<u8>,
}

impl ChannelReader {
    pub fn new(chunks: Receiver<Vec<u8>>) -> Self {
        ChannelReader {
            chunks,
            pending: Vec::new(),
        }
    }
}

impl Read for ChannelReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.pending.is_empty() {
            match self.chunks.recv() {
                Ok(chunk) => self.pending = chunk,
                Err(_) => return Ok(0),
            }
        }
        let n = buf.len().min(self.pending.len());
        buf[..n].copy_from_slice(&self.pending[..n]);
        self.pending.drain(..n);
        Ok(n)
    }
}
