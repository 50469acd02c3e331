//! Cooperative cancellation — tear down a subscription mid-stream.
//!
//! A writer thread feeds event chunks through a channel-backed reader while
//! the main thread watches the view through its handle, then signals the
//! cancel token. The loop stops at its next check and reports `Canceled`.

use std::io::{self, Read};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;
use watchfold::{Subscription, Target, WaitResult};

/// Blocks on a channel like a quiet connection; sender gone means EOF.
struct ChannelBody {
    chunks: Receiver<Vec<u8>>,
    pending: Vec<u8>,
}

impl Read for ChannelBody {
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

fn event_line(kind: &str, uid: u32) -> Vec<u8> {
    format!("{{\"type\":\"{kind}\",\"object\":{{\"metadata\":{{\"uid\":\"job-{uid}\"}}}}}}\n")
        .into_bytes()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (tx, rx) = mpsc::channel();

    let subscription = Subscription::new(Target::new("Job").with_namespace("batch"));
    let view = subscription.view();
    let token = subscription.cancel_token();

    let worker = thread::spawn(move || {
        subscription.run(ChannelBody {
            chunks: rx,
            pending: Vec::new(),
        })
    });

    // Feed five events, watching the view grow.
    let mut seen = 0;
    for i in 0..5 {
        tx.send(event_line("ADDED", i))?;
        seen = match view.wait_for_change(seen, Duration::from_secs(5)) {
            WaitResult::Changed(version) => version,
            WaitResult::Timeout => return Err("view never updated".into()),
        };
        println!("[main] view now holds {} record(s)", view.records().len());
    }

    println!("[main] canceling");
    token.cancel();
    // One more chunk wakes the blocked read; its events are discarded.
    tx.send(event_line("ADDED", 99))?;

    let outcome = worker.join().expect("subscription thread panicked")?;
    println!("[main] loop ended: {outcome:?}");
    println!("[main] final mirror: {} record(s)", view.records().len());
    Ok(())
}
