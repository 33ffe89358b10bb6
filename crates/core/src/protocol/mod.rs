//! RTSP wire codec (RFC 2326).
//!
//! This module handles the text-based RTSP signaling protocol (requests,
//! responses, header fields, status codes) and the binary interleaved
//! frames that share the same connection.
//!
//! ## RTSP message format (RFC 2326 §4)
//!
//! RTSP messages follow HTTP/1.1 syntax with a different method set:
//!
//! ```text
//! DESCRIBE rtsp://server/stream RTSP/1.0\r\n
//! CSeq: 2\r\n
//! Accept: application/sdp\r\n
//! \r\n
//! ```
//!
//! Key differences from HTTP:
//! - Stateful: sessions persist across requests (RFC 2326 §3).
//! - Different methods: OPTIONS, DESCRIBE, SETUP, PLAY, PAUSE, TEARDOWN, ...
//! - Media may be interleaved on the control connection (RFC 2326 §10.12).
//! - No chunked bodies: `Content-Length` is the only framing.

pub mod header;
pub mod interleaved;
pub mod method;
pub mod request;
pub mod response;
pub mod status;
pub mod transport;

pub use header::Header;
pub use interleaved::{Frame, Incoming, is_frame, read_incoming};
pub use method::Method;
pub use request::Request;
pub use response::Response;
pub use transport::TransportSpec;

use std::io::Read;

use crate::error::{ParseErrorKind, Result, RtspError};

/// Protocol version written on every outgoing message.
pub const RTSP_VERSION: &str = "RTSP/1.0";

/// Accept any `RTSP/1.x`; anything else is a different protocol.
pub(crate) fn check_version(version: &str) -> Result<()> {
    let minor = version
        .strip_prefix("RTSP/1.")
        .filter(|m| !m.is_empty() && m.bytes().all(|b| b.is_ascii_digit()));
    match minor {
        Some(_) => Ok(()),
        None => Err(RtspError::parse(ParseErrorKind::UnsupportedVersion(
            version.to_string(),
        ))),
    }
}

/// Read a body of exactly `len` bytes.
///
/// The buffer grows with the bytes that actually arrive, so a bogus
/// `Content-Length` cannot force a large allocation up front. Fewer bytes
/// than announced is an `UnexpectedEof` I/O error.
pub(crate) fn read_body<R: Read + ?Sized>(r: &mut R, len: usize) -> Result<Vec<u8>> {
    let mut body = Vec::new();
    (&mut *r).take(len as u64).read_to_end(&mut body)?;
    if body.len() < len {
        return Err(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            format!("body ended after {} of {len} bytes", body.len()),
        )
        .into());
    }
    Ok(body)
}

/// A non-empty body must be announced with its exact length.
pub(crate) fn check_body_length(headers: &Header, body: &[u8]) -> Result<()> {
    if body.is_empty() {
        return Ok(());
    }
    match headers.content_length() {
        Ok(Some(len)) if len == body.len() => Ok(()),
        _ => Err(RtspError::Format(format!(
            "body of {} bytes needs a matching Content-Length",
            body.len()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_check() {
        assert!(check_version("RTSP/1.0").is_ok());
        assert!(check_version("RTSP/1.1").is_ok());
        assert!(check_version("RTSP/2.0").is_err());
        assert!(check_version("HTTP/1.0").is_err());
        assert!(check_version("RTSP/1.").is_err());
    }

    #[test]
    fn body_shorter_than_announced() {
        let mut r = std::io::Cursor::new(b"abc".to_vec());
        let err = read_body(&mut r, 1_000_000_000_000).unwrap_err();
        assert_eq!(err.io_kind(), Some(std::io::ErrorKind::UnexpectedEof));

        let mut r = std::io::Cursor::new(b"abcdef".to_vec());
        assert_eq!(read_body(&mut r, 3).unwrap(), b"abc");
    }
}
