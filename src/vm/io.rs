//! I/O strategies.
//!
//! Every computer binds exactly one strategy at construction and keeps
//! it for life:
//!
//! - [`Io::console`]: synchronous line-oriented I/O against an injected
//!   reader/writer port (stdin/stdout by default)
//! - [`Io::channel`]: blocking rendezvous handoff for wiring computers
//!   to each other across threads
//! - [`Io::queue`]: an explicit FIFO buffer the caller drives directly
//!
//! The queue strategy delivers values first-in-first-out, matching the
//! inherent delivery order of the channel strategy.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::io::{BufRead, BufReader, Write};
use std::sync::mpsc::{sync_channel, Receiver, SyncSender};
use thiserror::Error;

/// An I/O strategy bound to one computer.
pub enum Io {
    Console(Console),
    Channel(Channel),
    Queue(Queue),
}

/// Synchronous console port. The streams are injected so instances
/// never contend on process-wide stdin/stdout unless wired that way.
pub struct Console {
    reader: Box<dyn BufRead + Send>,
    writer: Box<dyn Write + Send>,
}

/// Rendezvous endpoints owned by the computer. The far ends live in a
/// [`Handoff`] held by the caller or a peer computer's driver.
pub struct Channel {
    source: Receiver<i64>,
    sink: SyncSender<i64>,
}

/// Caller-side endpoints of a channel-strategy computer.
///
/// `send` blocks until the computer executes INPUT; `recv` blocks until
/// it executes OUTPUT. An unmatched side deadlocks: there is no
/// buffering, timeout, or deadlock detection.
pub struct Handoff {
    sender: SyncSender<i64>,
    receiver: Receiver<i64>,
}

impl Handoff {
    /// Hand one value to the computer's next INPUT.
    pub fn send(&self, value: i64) -> Result<(), IoError> {
        self.sender.send(value).map_err(|_| IoError::Disconnected)
    }

    /// Accept one value from the computer's next OUTPUT.
    pub fn recv(&self) -> Result<i64, IoError> {
        self.receiver.recv().map_err(|_| IoError::Disconnected)
    }
}

/// Explicit FIFO buffers for the queue strategy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Queue {
    input: VecDeque<i64>,
    output: VecDeque<i64>,
}

impl Io {
    /// Console strategy over process stdin/stdout.
    pub fn console() -> Self {
        Io::Console(Console {
            reader: Box::new(BufReader::new(std::io::stdin())),
            writer: Box::new(std::io::stdout()),
        })
    }

    /// Console strategy over caller-supplied streams.
    pub fn console_with(
        reader: impl BufRead + Send + 'static,
        writer: impl Write + Send + 'static,
    ) -> Self {
        Io::Console(Console {
            reader: Box::new(reader),
            writer: Box::new(writer),
        })
    }

    /// Blocking-handoff strategy. Returns the strategy together with
    /// the caller-side endpoints.
    pub fn channel() -> (Self, Handoff) {
        // Zero-capacity channels rendezvous: each side suspends until
        // the other arrives.
        let (in_tx, in_rx) = sync_channel(0);
        let (out_tx, out_rx) = sync_channel(0);
        let io = Io::Channel(Channel {
            source: in_rx,
            sink: out_tx,
        });
        let handoff = Handoff {
            sender: in_tx,
            receiver: out_rx,
        };
        (io, handoff)
    }

    /// FIFO queue strategy with empty buffers.
    pub fn queue() -> Self {
        Io::Queue(Queue::default())
    }

    /// Produce the next input value for an INPUT instruction.
    ///
    /// Console blocks on the reader, channel suspends until a producer
    /// hands off, queue fails with [`IoError::EmptyInput`] when empty.
    pub fn provide(&mut self) -> Result<i64, IoError> {
        match self {
            Io::Console(console) => {
                let mut line = String::new();
                console
                    .reader
                    .read_line(&mut line)
                    .map_err(|e| IoError::Read(e.to_string()))?;
                let token = line.trim();
                token
                    .parse::<i64>()
                    .map_err(|_| IoError::Malformed(token.to_string()))
            }
            Io::Channel(channel) => channel.source.recv().map_err(|_| IoError::Disconnected),
            Io::Queue(queue) => queue.input.pop_front().ok_or(IoError::EmptyInput),
        }
    }

    /// Accept a value emitted by an OUTPUT instruction.
    ///
    /// Console writes a line immediately, channel suspends until a
    /// consumer accepts, queue appends.
    pub fn consume(&mut self, value: i64) -> Result<(), IoError> {
        match self {
            Io::Console(console) => {
                writeln!(console.writer, "{}", value)
                    .and_then(|_| console.writer.flush())
                    .map_err(|e| IoError::Write(e.to_string()))
            }
            Io::Channel(channel) => channel.sink.send(value).map_err(|_| IoError::Disconnected),
            Io::Queue(queue) => {
                queue.output.push_back(value);
                Ok(())
            }
        }
    }

    /// Append a value to the input buffer from outside the computer.
    /// Only the queue strategy has one; channel computers are driven
    /// through their [`Handoff`].
    pub fn push_input(&mut self, value: i64) -> Result<(), IoError> {
        match self {
            Io::Queue(queue) => {
                queue.input.push_back(value);
                Ok(())
            }
            Io::Console(_) | Io::Channel(_) => Err(IoError::Unwired),
        }
    }

    /// Take the oldest buffered output value from outside the computer.
    pub fn pop_output(&mut self) -> Result<i64, IoError> {
        match self {
            Io::Queue(queue) => queue.output.pop_front().ok_or(IoError::EmptyOutput),
            Io::Console(_) | Io::Channel(_) => Err(IoError::Unwired),
        }
    }
}

impl std::fmt::Debug for Io {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Io::Console(_) => f.write_str("Io::Console"),
            Io::Channel(_) => f.write_str("Io::Channel"),
            Io::Queue(queue) => f
                .debug_struct("Io::Queue")
                .field("input", &queue.input.len())
                .field("output", &queue.output.len())
                .finish(),
        }
    }
}

/// Errors that can occur at the I/O boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IoError {
    #[error("input buffer is empty")]
    EmptyInput,

    #[error("output buffer is empty")]
    EmptyOutput,

    #[error("handoff counterpart disconnected")]
    Disconnected,

    #[error("console input is not an integer: {0:?}")]
    Malformed(String),

    #[error("console read failed: {0}")]
    Read(String),

    #[error("console write failed: {0}")]
    Write(String),

    #[error("strategy has no externally drivable buffer")]
    Unwired,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::thread;

    /// Test writer that shares its sink with the test body.
    #[derive(Clone, Default)]
    struct SharedWriter(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_queue_is_fifo() {
        let mut io = Io::queue();
        io.push_input(1).unwrap();
        io.push_input(2).unwrap();
        assert_eq!(io.provide().unwrap(), 1);
        assert_eq!(io.provide().unwrap(), 2);

        io.consume(10).unwrap();
        io.consume(20).unwrap();
        assert_eq!(io.pop_output().unwrap(), 10);
        assert_eq!(io.pop_output().unwrap(), 20);
    }

    #[test]
    fn test_queue_empty_errors() {
        let mut io = Io::queue();
        assert_eq!(io.provide().unwrap_err(), IoError::EmptyInput);
        assert_eq!(io.pop_output().unwrap_err(), IoError::EmptyOutput);
    }

    #[test]
    fn test_channel_rendezvous() {
        let (mut io, handoff) = Io::channel();
        let worker = thread::spawn(move || {
            let got = io.provide().unwrap();
            io.consume(got * 2).unwrap();
        });

        handoff.send(21).unwrap();
        assert_eq!(handoff.recv().unwrap(), 42);
        worker.join().unwrap();
    }

    #[test]
    fn test_channel_disconnect() {
        let (io, handoff) = Io::channel();
        drop(io);
        assert_eq!(handoff.send(1).unwrap_err(), IoError::Disconnected);
        assert_eq!(handoff.recv().unwrap_err(), IoError::Disconnected);
    }

    #[test]
    fn test_channel_has_no_external_buffer() {
        let (mut io, _handoff) = Io::channel();
        assert_eq!(io.push_input(1).unwrap_err(), IoError::Unwired);
        assert_eq!(io.pop_output().unwrap_err(), IoError::Unwired);
    }

    #[test]
    fn test_console_reads_and_writes_lines() {
        let sink = SharedWriter::default();
        let mut io = Io::console_with(std::io::Cursor::new("42\n-7\n"), sink.clone());

        assert_eq!(io.provide().unwrap(), 42);
        assert_eq!(io.provide().unwrap(), -7);

        io.consume(1219070632396864).unwrap();
        let written = sink.0.lock().unwrap().clone();
        assert_eq!(String::from_utf8(written).unwrap(), "1219070632396864\n");
    }

    #[test]
    fn test_console_rejects_garbage() {
        let mut io = Io::console_with(std::io::Cursor::new("forty-two\n"), Vec::new());
        assert_eq!(
            io.provide().unwrap_err(),
            IoError::Malformed("forty-two".to_string())
        );
    }
}
