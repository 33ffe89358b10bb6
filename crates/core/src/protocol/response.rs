use std::fmt;
use std::io::{BufRead, Write};

use crate::error::{ParseErrorKind, Result, RtspError};
use crate::protocol::header::{Header, read_line};
use crate::protocol::{RTSP_VERSION, check_body_length, check_version, read_body, status};

/// An RTSP response (RFC 2326 §7).
///
/// Serializes to the standard text format:
///
/// ```text
/// RTSP/1.0 200 OK\r\n
/// CSeq: 1\r\n
/// Content-Type: application/sdp\r\n
/// Content-Length: 142\r\n
/// \r\n
/// v=0\r\n...
/// ```
///
/// Uses a builder pattern: chain [`add_header`](Self::add_header) and
/// [`with_body`](Self::with_body), then call [`write_to`](Self::write_to).
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct Response {
    pub version: String,
    pub status_code: u16,
    pub status_text: String,
    pub headers: Header,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(status_code: u16, status_text: &str) -> Self {
        Response {
            version: RTSP_VERSION.to_string(),
            status_code,
            status_text: status_text.to_string(),
            headers: Header::new(),
            body: Vec::new(),
        }
    }

    /// Response with the canonical phrase for `status_code`.
    pub fn with_status(status_code: u16) -> Self {
        Self::new(status_code, status::reason_phrase(status_code).unwrap_or("Unknown"))
    }

    /// 200 OK (RFC 2326 §7.1.1).
    pub fn ok() -> Self {
        Self::with_status(status::OK)
    }

    pub fn add_header(mut self, name: &str, value: &str) -> Self {
        self.headers.add(name, value);
        self
    }

    /// Attach a body and set `Content-Length` (RFC 2326 §12.14).
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

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    pub fn cseq(&self) -> Option<u32> {
        self.headers.get("CSeq")?.trim().parse().ok()
    }

    /// Session identifier without its parameters (RFC 2326 §12.37).
    ///
    /// `"47112344;timeout=60"` yields `"47112344"`.
    pub fn session_id(&self) -> Option<&str> {
        self.headers
            .field("Session", 0)
            .filter(|id| !id.is_empty())
    }

    /// Session timeout in seconds, if the server advertised one.
    pub fn session_timeout(&self) -> Option<u64> {
        self.headers.param("Session", "timeout")?.parse().ok()
    }

    /// Write the response in wire format. No header is added implicitly.
    pub fn write_to<W: Write + ?Sized>(&self, w: &mut W) -> Result<()> {
        check_body_length(&self.headers, &self.body)?;
        write!(
            w,
            "{} {} {}\r\n",
            self.version, self.status_code, self.status_text
        )?;
        self.headers.write_to(w)?;
        w.write_all(b"\r\n")?;
        w.write_all(&self.body)?;
        Ok(())
    }

    pub fn serialize(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.write_to(&mut out)?;
        Ok(out)
    }

    /// Read and parse one response.
    ///
    /// The body is exactly `Content-Length` bytes; a stream that ends early
    /// yields an `UnexpectedEof` I/O error rather than a short body.
    pub fn read<R: BufRead + ?Sized>(r: &mut R) -> Result<Self> {
        let line = read_line(r)?;
        let mut parts = line.splitn(3, ' ');
        let (Some(version), Some(code), Some(text)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(RtspError::parse(ParseErrorKind::InvalidStatusLine(line.clone())));
        };
        check_version(version)?;
        let status_code: u16 = match code.parse() {
            Ok(c) if (100..1000).contains(&c) => c,
            _ => return Err(RtspError::parse(ParseErrorKind::InvalidStatusLine(line.clone()))),
        };
        let version = version.to_string();
        let status_text = text.to_string();

        let headers = Header::read(r)?;
        let body = match headers.content_length()? {
            Some(len) => read_body(r, len)?,
            None => Vec::new(),
        };

        Ok(Response {
            version,
            status_code,
            status_text,
            headers,
            body,
        })
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}\r\n",
            self.version, self.status_code, self.status_text
        )?;
        for (name, value) in self.headers.iter() {
            write!(f, "{name}: {value}\r\n")?;
        }
        write!(f, "\r\n{}", String::from_utf8_lossy(&self.body))
    }
}
