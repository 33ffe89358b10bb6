//! Error types for the RTSP client library.

use std::fmt;
use std::sync::Arc;

/// Errors that can occur in the RTSP client library.
///
/// Variants map to specific failure modes across the stack:
///
/// - **Codec**: [`Parse`](Self::Parse) for malformed RTSP messages and
///   unknown digest challenge directives;
///   [`Format`](Self::Format) for bad interleaved frames or outgoing messages
///   that break wire invariants.
/// - **Transport**: [`Io`](Self::Io) for dial, read, write and short-read failures.
/// - **Auth**: [`Auth`](Self::Auth) for unusable challenges and unsupported
///   digest parameters.
/// - **Engine**: [`InvalidUri`](Self::InvalidUri),
///   [`FrameHandler`](Self::FrameHandler).
///
/// The type is `Clone` so the reader thread can record one terminal error
/// and hand the same value to every waiter on that connection.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RtspError {
    /// Underlying I/O or socket error.
    #[error("I/O error: {0}")]
    Io(#[source] Arc<std::io::Error>),

    /// Failed to parse an RTSP message (RFC 2326 §6, §7).
    #[error("RTSP parse error: {kind}")]
    Parse { kind: ParseErrorKind },

    /// An interleaved frame (RFC 2326 §10.12) or an outgoing message
    /// violated the wire format.
    #[error("format error: {0}")]
    Format(String),

    /// Authentication could not be computed from the server challenge.
    #[error("auth error: {kind}")]
    Auth { kind: AuthErrorKind },

    /// The request URI has no usable host to dial.
    #[error("invalid request URI: {0}")]
    InvalidUri(String),

    /// The registered frame callback rejected a frame.
    #[error("frame handler failed: {0}")]
    FrameHandler(String),
}

impl RtspError {
    pub(crate) fn parse(kind: ParseErrorKind) -> Self {
        Self::Parse { kind }
    }

    pub(crate) fn auth(kind: AuthErrorKind) -> Self {
        Self::Auth { kind }
    }

    /// Whether this is a transport-level failure.
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io(_))
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }

    /// Returns the I/O error kind, if this is an I/O failure.
    pub fn io_kind(&self) -> Option<std::io::ErrorKind> {
        match self {
            Self::Io(e) => Some(e.kind()),
            _ => None,
        }
    }
}

impl From<std::io::Error> for RtspError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(Arc::new(e))
    }
}

/// Specific kind of RTSP parse failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Request line did not have the `Method URI Version` shape.
    InvalidRequestLine(String),
    /// Status line did not have the `Version Code Phrase` shape.
    InvalidStatusLine(String),
    /// A header line did not contain a colon separator.
    InvalidHeader(String),
    /// The version token is not `RTSP/1.x`.
    UnsupportedVersion(String),
    /// Method token outside the RTSP verb set.
    UnknownMethod(String),
    /// Content-Length is not a non-negative integer.
    InvalidContentLength(String),
    /// A start or header line was not valid UTF-8.
    InvalidEncoding,
    /// A start or header line ran past the length limit without `\n`.
    LineTooLong { limit: usize },
    /// A digest challenge carried a directive outside RFC 2617 §3.2.1.
    UnknownChallengeDirective(String),
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRequestLine(line) => write!(f, "invalid request line: {line:?}"),
            Self::InvalidStatusLine(line) => write!(f, "invalid status line: {line:?}"),
            Self::InvalidHeader(line) => write!(f, "invalid header: {line:?}"),
            Self::UnsupportedVersion(v) => write!(f, "unsupported version: {v:?}"),
            Self::UnknownMethod(m) => write!(f, "unknown method: {m:?}"),
            Self::InvalidContentLength(v) => write!(f, "invalid Content-Length: {v:?}"),
            Self::InvalidEncoding => write!(f, "line is not valid UTF-8"),
            Self::LineTooLong { limit } => write!(f, "line exceeds {limit} bytes"),
            Self::UnknownChallengeDirective(d) => write!(f, "unknown challenge directive: {d:?}"),
        }
    }
}

/// Specific kind of authentication failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthErrorKind {
    /// The server answered 401 without a `WWW-Authenticate` header.
    MissingChallenge,
    /// The challenge is not a usable digest challenge (wrong scheme, a
    /// directive without `=`, or no nonce).
    BadChallenge(String),
    /// Digest algorithm other than MD5.
    AlgorithmNotImplemented(String),
    /// Quality of protection other than `auth` (e.g. `auth-int`).
    QopNotImplemented(String),
}

impl fmt::Display for AuthErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingChallenge => write!(f, "missing WWW-Authenticate challenge"),
            Self::BadChallenge(c) => write!(f, "bad challenge: {c:?}"),
            Self::AlgorithmNotImplemented(a) => write!(f, "algorithm not implemented: {a}"),
            Self::QopNotImplemented(q) => write!(f, "qop not implemented: {q}"),
        }
    }
}

/// Convenience alias for `Result<T, RtspError>`.
pub type Result<T> = std::result::Result<T, RtspError>;
