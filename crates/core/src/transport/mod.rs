//! Byte-stream transport for the RTSP client.
//!
//! The client needs a reliable, ordered, bidirectional stream split into a
//! read half (owned by the connection's reader thread) and a write half
//! (used by callers to send requests).
//!
//! - [`Dialer`]: opens a [`Stream`] to `host:port`. [`TcpDialer`] is the
//!   default; any `Fn(&str) -> io::Result<Stream>` works too.
//! - [`Stream`]: the two halves plus an optional close hook that unblocks
//!   the reader when the client discards the connection.

pub mod tcp;

pub use tcp::TcpDialer;

use std::io::{self, Read, Write};

/// Read half handed to the reader thread.
pub type ReadHalf = Box<dyn Read + Send>;

/// Write half used for outgoing requests and frames.
pub type WriteHalf = Box<dyn Write + Send>;

/// A connected byte stream.
pub struct Stream {
    pub reader: ReadHalf,
    pub writer: WriteHalf,
    closer: Option<Box<dyn FnOnce() + Send>>,
}

impl Stream {
    pub fn new(reader: ReadHalf, writer: WriteHalf) -> Self {
        Stream {
            reader,
            writer,
            closer: None,
        }
    }

    /// Run `closer` when the connection is discarded.
    ///
    /// It must make a blocked read on [`reader`](Self::reader) return.
    pub fn on_close(mut self, closer: impl FnOnce() + Send + 'static) -> Self {
        self.closer = Some(Box::new(closer));
        self
    }

    pub(crate) fn into_parts(self) -> (ReadHalf, WriteHalf, Option<Box<dyn FnOnce() + Send>>) {
        (self.reader, self.writer, self.closer)
    }
}

/// Opens connections for the client.
pub trait Dialer: Send + Sync {
    /// Connect to `host`, given as `host:port`.
    fn dial(&self, host: &str) -> io::Result<Stream>;
}

impl<F> Dialer for F
where
    F: Fn(&str) -> io::Result<Stream> + Send + Sync,
{
    fn dial(&self, host: &str) -> io::Result<Stream> {
        self(host)
    }
}
