//! Background reader for one connection.
//!
//! The reader thread owns the read half and loops forever:
//!
//! ```text
//! peek 1 byte ──'$'──> Frame::read ──> frame handler
//!      │
//!      └──other──> Response::read ──> Inbox slot (capacity 1) ──> waiting caller
//! ```
//!
//! The first read, decode or handler error is latched in the [`Inbox`] and
//! returned to every later [`Inbox::recv`]; the thread then exits. A panic
//! in the frame handler counts as a handler error, and any other way out of
//! the loop still latches an error so waiters never block forever.

use std::io::BufReader;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;

use parking_lot::{Condvar, Mutex};

use crate::error::{Result, RtspError};
use crate::protocol::{Frame, Incoming, Response, read_incoming};
use crate::transport::ReadHalf;

/// Callback invoked on the reader thread for every interleaved frame.
///
/// An error stops the reader exactly like a decode error. The callback
/// must not block for long: responses are not read while it runs.
pub type FrameHandler = Arc<dyn Fn(Frame) -> Result<()> + Send + Sync>;

#[derive(Default)]
struct InboxState {
    slot: Option<Response>,
    terminal: Option<RtspError>,
    closed: bool,
}

/// Single-slot response handoff plus a set-once terminal error.
#[derive(Default)]
pub(crate) struct Inbox {
    state: Mutex<InboxState>,
    changed: Condvar,
}

impl Inbox {
    /// Block until the slot is free, then fill it. Returns `false` once the
    /// inbox is closed.
    fn deliver(&self, response: Response) -> bool {
        let mut state = self.state.lock();
        while state.slot.is_some() && !state.closed {
            self.changed.wait(&mut state);
        }
        if state.closed {
            return false;
        }
        state.slot = Some(response);
        self.changed.notify_all();
        true
    }

    /// Record the terminal error. Later errors are ignored.
    fn terminate(&self, error: RtspError) {
        let mut state = self.state.lock();
        if state.terminal.is_none() {
            state.terminal = Some(error);
        }
        self.changed.notify_all();
    }

    /// Wait for the next response or the terminal error.
    pub(crate) fn recv(&self) -> Result<Response> {
        let mut state = self.state.lock();
        loop {
            if let Some(response) = state.slot.take() {
                self.changed.notify_all();
                return Ok(response);
            }
            if let Some(error) = &state.terminal {
                return Err(error.clone());
            }
            if state.closed {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::NotConnected,
                    "connection closed",
                )
                .into());
            }
            self.changed.wait(&mut state);
        }
    }

    /// Drop any pending response and release a reader blocked in `deliver`.
    pub(crate) fn close(&self) {
        let mut state = self.state.lock();
        state.closed = true;
        state.slot = None;
        self.changed.notify_all();
    }

    pub(crate) fn is_terminated(&self) -> bool {
        self.state.lock().terminal.is_some()
    }
}

/// Spawn the reader thread for a freshly dialed connection.
pub(crate) fn spawn(
    name: &str,
    host: &str,
    reader: ReadHalf,
    inbox: Arc<Inbox>,
    on_frame: FrameHandler,
) -> Result<()> {
    let host = host.to_string();
    thread::Builder::new()
        .name(name.to_string())
        .spawn(move || run(host, BufReader::new(reader), inbox, on_frame))?;
    Ok(())
}

/// Latches a terminal error when the reader stops, however it stops.
struct ExitLatch(Arc<Inbox>);

impl Drop for ExitLatch {
    fn drop(&mut self) {
        self.0.terminate(
            std::io::Error::new(std::io::ErrorKind::ConnectionAborted, "connection reader exited")
                .into(),
        );
    }
}

fn run(host: String, mut reader: BufReader<ReadHalf>, inbox: Arc<Inbox>, on_frame: FrameHandler) {
    let _latch = ExitLatch(inbox.clone());
    let error = loop {
        match read_incoming(&mut reader) {
            Ok(Incoming::Frame(frame)) => {
                tracing::trace!(%host, channel = frame.channel, len = frame.data.len(), "frame");
                match panic::catch_unwind(AssertUnwindSafe(|| on_frame(frame))) {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => break e,
                    Err(_) => break RtspError::FrameHandler("frame handler panicked".into()),
                }
            }
            Ok(Incoming::Response(response)) => {
                tracing::debug!(
                    %host,
                    status = response.status_code,
                    cseq = ?response.cseq(),
                    "response"
                );
                if !inbox.deliver(response) {
                    tracing::debug!(%host, "inbox closed, reader exiting");
                    return;
                }
            }
            Err(e) => break e,
        }
    };
    tracing::warn!(%host, error = %error, "connection reader stopped");
    inbox.terminate(error);
}
