use std::fmt;
use std::io::{BufRead, Write};

use crate::error::{ParseErrorKind, Result, RtspError};
use crate::protocol::header::{Header, read_line};
use crate::protocol::{Method, RTSP_VERSION, check_body_length, check_version, read_body};

/// An RTSP request (RFC 2326 §6).
///
/// RTSP requests follow HTTP/1.1 syntax:
///
/// ```text
/// Method SP Request-URI SP RTSP-Version CRLF
/// *(Header: Value CRLF)
/// CRLF
/// [body]
/// ```
///
/// Header lookup is case-insensitive per RFC 2326 §4.2.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// RTSP method (OPTIONS, DESCRIBE, SETUP, PLAY, etc.).
    pub method: Method,
    /// Request-URI (e.g. `rtsp://host:port/stream/track1`).
    pub uri: String,
    /// Protocol version (normally `RTSP/1.0`).
    pub version: String,
    pub headers: Header,
    /// Raw body; must be matched by a `Content-Length` header when non-empty.
    pub body: Vec<u8>,
}

impl Request {
    pub fn new(method: Method, uri: &str) -> Self {
        Request {
            method,
            uri: uri.to_string(),
            version: RTSP_VERSION.to_string(),
            headers: Header::new(),
            body: Vec::new(),
        }
    }

    /// Builder-style header append.
    pub fn add_header(mut self, name: &str, value: &str) -> Self {
        self.headers.add(name, value);
        self
    }

    /// Attach a body and set `Content-Length` to its exact size
    /// (RFC 2326 §12.14).
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        if self.body.is_empty() {
            self.headers.remove("Content-Length");
        } else {
            self.headers
                .set("Content-Length", &self.body.len().to_string());
        }
        self
    }

    /// Returns the CSeq header value, which numbers and orders RTSP
    /// request/response pairs (RFC 2326 §12.17).
    pub fn cseq(&self) -> Option<u32> {
        self.headers.get("CSeq")?.trim().parse().ok()
    }

    /// Write the request in wire format.
    ///
    /// Nothing is added implicitly; a non-empty body without a matching
    /// `Content-Length` is rejected before any byte is written.
    pub fn write_to<W: Write + ?Sized>(&self, w: &mut W) -> Result<()> {
        check_body_length(&self.headers, &self.body)?;
        write!(w, "{} {} {}\r\n", self.method, self.uri, self.version)?;
        self.headers.write_to(w)?;
        w.write_all(b"\r\n")?;
        w.write_all(&self.body)?;
        Ok(())
    }

    /// Serialize to bytes.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.write_to(&mut out)?;
        Ok(out)
    }

    /// Read and parse one request, including its `Content-Length` body.
    pub fn read<R: BufRead + ?Sized>(r: &mut R) -> Result<Self> {
        let line = read_line(r)?;
        let parts: Vec<&str> = line.split(' ').collect();
        if parts.len() != 3 || parts.iter().any(|p| p.is_empty()) {
            return Err(RtspError::parse(ParseErrorKind::InvalidRequestLine(line)));
        }

        let method: Method = parts[0].parse()?;
        let uri = parts[1].to_string();
        let version = parts[2].to_string();
        check_version(&version)?;

        let headers = Header::read(r)?;
        let body = match headers.content_length()? {
            Some(len) => read_body(r, len)?,
            None => Vec::new(),
        };

        Ok(Request {
            method,
            uri,
            version,
            headers,
            body,
        })
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}\r\n", self.method, self.uri, self.version)?;
        for (name, value) in self.headers.iter() {
            write!(f, "{name}: {value}\r\n")?;
        }
        write!(f, "\r\n{}", String::from_utf8_lossy(&self.body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn parse(raw: &str) -> Result<Request> {
        Request::read(&mut Cursor::new(raw.as_bytes().to_vec()))
    }

    #[test]
    fn parse_options_request() {
        let req = parse("OPTIONS rtsp://localhost:8554/test RTSP/1.0\r\nCSeq: 1\r\n\r\n").unwrap();
        assert_eq!(req.method, Method::Options);
        assert_eq!(req.uri, "rtsp://localhost:8554/test");
        assert_eq!(req.version, "RTSP/1.0");
        assert_eq!(req.cseq(), Some(1));
        assert!(req.body.is_empty());
    }

    #[test]
    fn parse_setup_with_transport() {
        let raw = "SETUP rtsp://localhost:8554/test/track1 RTSP/1.0\r\n\
                   CSeq: 3\r\n\
                   Transport: RTP/AVP;unicast;client_port=8000-8001\r\n\r\n";
        let req = parse(raw).unwrap();
        assert_eq!(req.method, Method::Setup);
        assert_eq!(req.cseq(), Some(3));
        assert_eq!(
            req.headers.get("Transport"),
            Some("RTP/AVP;unicast;client_port=8000-8001")
        );
    }

    #[test]
    fn round_trip_with_body_and_repeated_headers() {
        let req = Request::new(Method::SetParameter, "rtsp://cam/stream")
            .add_header("CSeq", "9")
            .add_header("Require", "a")
            .add_header("Require", "b")
            .add_header("Content-Type", "text/parameters")
            .with_body(&b"barparam: barstuff\r\n"[..]);

        let bytes = req.serialize().unwrap();
        let back = Request::read(&mut Cursor::new(bytes)).unwrap();
        assert_eq!(back, req);
        assert_eq!(back.headers.get("Content-Length"), Some("20"));
    }

    #[test]
    fn announced_body_longer_than_stream() {
        let err = parse("ANNOUNCE rtsp://cam/s RTSP/1.0\r\nContent-Length: 1000000000000\r\n\r\nv=0")
            .unwrap_err();
        assert_eq!(err.io_kind(), Some(std::io::ErrorKind::UnexpectedEof));
    }

    #[test]
    fn empty_input_is_io_error() {
        assert!(parse("").unwrap_err().is_io());
    }

    #[test]
    fn parse_invalid_request_line() {
        assert!(parse("JUST_A_METHOD\r\n\r\n").unwrap_err().is_parse());
        assert!(parse("PLAY rtsp://x RTSP/1.0 extra\r\n\r\n").unwrap_err().is_parse());
    }

    #[test]
    fn unknown_method() {
        let err = parse("GET / RTSP/1.0\r\n\r\n").unwrap_err();
        assert!(matches!(
            err,
            RtspError::Parse {
                kind: ParseErrorKind::UnknownMethod(_)
            }
        ));
    }

    #[test]
    fn http_version_is_distinct_error() {
        let err = parse("OPTIONS * HTTP/1.1\r\n\r\n").unwrap_err();
        assert!(matches!(
            err,
            RtspError::Parse {
                kind: ParseErrorKind::UnsupportedVersion(_)
            }
        ));
    }

    #[test]
    fn write_rejects_body_without_content_length() {
        let mut req = Request::new(Method::Announce, "rtsp://cam/stream");
        req.body = b"v=0\r\n".to_vec();
        let mut out = Vec::new();
        assert!(matches!(req.write_to(&mut out), Err(RtspError::Format(_))));
        assert!(out.is_empty());
    }
}
