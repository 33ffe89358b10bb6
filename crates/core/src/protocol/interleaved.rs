//! Interleaved binary frames (RFC 2326 §10.12).
//!
//! When RTP is carried over the RTSP TCP connection, each packet is wrapped
//! in a 4-byte header and shares the stream with RTSP messages:
//!
//! ```text
//! +------+---------+----------------+----------------------+
//! | '$'  | channel | length (u16 BE)| payload (length B)   |
//! +------+---------+----------------+----------------------+
//! ```
//!
//! A reader tells the two apart by peeking one byte: `'$'` starts a frame,
//! anything else starts a status or request line.

use std::io::{BufRead, Read, Write};

use crate::error::{Result, RtspError};
use crate::protocol::Response;

/// Leading byte of every interleaved frame.
pub const FRAME_MARKER: u8 = b'$';

/// Size of the fixed frame header.
pub const FRAME_HEADER_LEN: usize = 4;

/// One interleaved chunk of binary data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Channel id negotiated via `Transport: ...;interleaved=a-b`.
    pub channel: u8,
    pub data: Vec<u8>,
}

impl Frame {
    pub fn new(channel: u8, data: impl Into<Vec<u8>>) -> Self {
        Frame {
            channel,
            data: data.into(),
        }
    }

    /// Build a frame from a wider channel id, failing outside `0..=255`.
    pub fn try_new(channel: u32, data: impl Into<Vec<u8>>) -> Result<Self> {
        let channel = u8::try_from(channel)
            .map_err(|_| RtspError::Format(format!("invalid channel: {channel}")))?;
        Ok(Self::new(channel, data))
    }

    pub fn write_to<W: Write + ?Sized>(&self, w: &mut W) -> Result<()> {
        let len = u16::try_from(self.data.len()).map_err(|_| {
            RtspError::Format(format!("frame payload too large: {} bytes", self.data.len()))
        })?;
        let mut header = [0u8; FRAME_HEADER_LEN];
        header[0] = FRAME_MARKER;
        header[1] = self.channel;
        header[2..4].copy_from_slice(&len.to_be_bytes());
        w.write_all(&header)?;
        w.write_all(&self.data)?;
        Ok(())
    }

    /// Read one frame. A wrong marker is a format error; a stream that ends
    /// inside the header or payload is an I/O error.
    pub fn read<R: Read + ?Sized>(r: &mut R) -> Result<Self> {
        let mut header = [0u8; FRAME_HEADER_LEN];
        r.read_exact(&mut header)?;
        if header[0] != FRAME_MARKER {
            return Err(RtspError::Format(format!(
                "invalid frame marker: {:#04x}",
                header[0]
            )));
        }
        let len = u16::from_be_bytes([header[2], header[3]]) as usize;
        let mut data = vec![0u8; len];
        r.read_exact(&mut data)?;
        Ok(Frame {
            channel: header[1],
            data,
        })
    }
}

/// Whether the next unit on the stream is an interleaved frame.
///
/// Blocks until at least one byte is buffered but never consumes it.
pub fn is_frame<R: BufRead + ?Sized>(r: &mut R) -> Result<bool> {
    let buf = r.fill_buf()?;
    match buf.first() {
        Some(&b) => Ok(b == FRAME_MARKER),
        None => Err(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "stream closed",
        )
        .into()),
    }
}

/// A unit read from a client-side stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Incoming {
    Frame(Frame),
    Response(Response),
}

/// Classify and fully decode the next unit on a shared stream.
pub fn read_incoming<R: BufRead + ?Sized>(r: &mut R) -> Result<Incoming> {
    if is_frame(r)? {
        Frame::read(r).map(Incoming::Frame)
    } else {
        Response::read(r).map(Incoming::Response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn header_layout() {
        let mut out = Vec::new();
        Frame::new(1, &b"hello world"[..]).write_to(&mut out).unwrap();
        assert_eq!(&out[..4], &[b'$', 1, 0, 11]);
        assert_eq!(&out[4..], b"hello world");
    }

    #[test]
    fn written_frame_is_classified_and_decoded() {
        let frame = Frame::new(1, &b"hello world"[..]);
        let mut out = Vec::new();
        frame.write_to(&mut out).unwrap();

        let mut r = Cursor::new(out);
        assert!(is_frame(&mut r).unwrap());
        assert_eq!(Frame::read(&mut r).unwrap(), frame);
    }

    #[test]
    fn classification_does_not_consume() {
        let mut r = Cursor::new(b"RTSP/1.0 200 OK\r\nCSeq: 1\r\n\r\n".to_vec());
        assert!(!is_frame(&mut r).unwrap());
        assert!(!is_frame(&mut r).unwrap());
        match read_incoming(&mut r).unwrap() {
            Incoming::Response(resp) => assert_eq!(resp.cseq(), Some(1)),
            other => panic!("expected response, got {other:?}"),
        }
    }

    #[test]
    fn frames_and_responses_interleaved() {
        let mut stream = Vec::new();
        Frame::new(0, vec![0x80, 0x60]).write_to(&mut stream).unwrap();
        stream.extend_from_slice(b"RTSP/1.0 200 OK\r\nCSeq: 4\r\n\r\n");
        Frame::new(1, vec![0x81]).write_to(&mut stream).unwrap();

        let mut r = Cursor::new(stream);
        assert!(matches!(read_incoming(&mut r).unwrap(), Incoming::Frame(f) if f.channel == 0));
        assert!(matches!(read_incoming(&mut r).unwrap(), Incoming::Response(_)));
        assert!(matches!(read_incoming(&mut r).unwrap(), Incoming::Frame(f) if f.channel == 1));
        assert!(read_incoming(&mut r).unwrap_err().is_io());
    }

    #[test]
    fn bad_marker_is_format_error() {
        let mut r = Cursor::new(vec![b'#', 0, 0, 0]);
        assert!(matches!(Frame::read(&mut r), Err(RtspError::Format(_))));
    }

    #[test]
    fn truncated_payload_is_io_error() {
        let mut r = Cursor::new(vec![b'$', 0, 0, 8, 1, 2, 3]);
        assert!(Frame::read(&mut r).unwrap_err().is_io());
    }

    #[test]
    fn channel_and_length_limits() {
        assert!(Frame::try_new(255, Vec::<u8>::new()).is_ok());
        assert!(matches!(Frame::try_new(256, Vec::<u8>::new()), Err(RtspError::Format(_))));

        let mut out = Vec::new();
        let big = Frame::new(0, vec![0u8; u16::MAX as usize + 1]);
        assert!(matches!(big.write_to(&mut out), Err(RtspError::Format(_))));
    }
}
