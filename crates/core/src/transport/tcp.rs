use std::io;
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::transport::{Dialer, Stream};

/// Dials RTSP servers over TCP.
///
/// The socket is cloned so the reader thread and writers own separate
/// handles; closing the [`Stream`] shuts the socket down in both directions.
#[derive(Debug, Clone, Default)]
pub struct TcpDialer {
    /// Bound on each connection attempt. `None` uses the OS default.
    pub connect_timeout: Option<Duration>,
}

impl TcpDialer {
    pub fn new(connect_timeout: Option<Duration>) -> Self {
        Self { connect_timeout }
    }

    fn connect(&self, host: &str) -> io::Result<TcpStream> {
        let Some(timeout) = self.connect_timeout else {
            return TcpStream::connect(host);
        };
        let mut last_err = None;
        for addr in host.to_socket_addrs()? {
            match TcpStream::connect_timeout(&addr, timeout) {
                Ok(stream) => return Ok(stream),
                Err(e) => last_err = Some(e),
            }
        }
        Err(last_err.unwrap_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("no address for {host}"))
        }))
    }
}

impl Dialer for TcpDialer {
    fn dial(&self, host: &str) -> io::Result<Stream> {
        let stream = self.connect(host)?;
        stream.set_nodelay(true)?;
        tracing::debug!(host, peer = ?stream.peer_addr().ok(), "connected");

        let reader = stream.try_clone()?;
        let closer = stream.try_clone()?;
        Ok(Stream::new(Box::new(reader), Box::new(stream)).on_close(move || {
            let _ = closer.shutdown(Shutdown::Both);
        }))
    }
}
