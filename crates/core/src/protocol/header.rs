use std::io::{BufRead, Read, Write};

use crate::error::{ParseErrorKind, Result, RtspError};

/// Ordered RTSP header fields (RFC 2326 §4.2).
///
/// Stored as `(name, value)` pairs in insertion order. Names keep the case
/// they were received or added with; lookups are case-insensitive. A name
/// that appears several times is written back as several lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header {
    fields: Vec<(String, String)>,
}

impl Header {
    pub fn new() -> Self {
        Self::default()
    }

    /// First value for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// All values for `name`, in order.
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.fields
            .iter()
            .filter(move |(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Append a value, keeping any existing ones.
    pub fn add(&mut self, name: &str, value: &str) {
        self.fields.push((name.to_string(), value.to_string()));
    }

    /// Replace every value of `name` with a single one.
    ///
    /// The field keeps the position of its first occurrence; a new field is
    /// appended.
    pub fn set(&mut self, name: &str, value: &str) {
        match self
            .fields
            .iter()
            .position(|(key, _)| key.eq_ignore_ascii_case(name))
        {
            Some(pos) => {
                self.fields[pos].1 = value.to_string();
                let mut index = 0;
                self.fields.retain(|(key, _)| {
                    let keep = index <= pos || !key.eq_ignore_ascii_case(name);
                    index += 1;
                    keep
                });
            }
            None => self.add(name, value),
        }
    }

    /// Remove every value of `name`. Returns how many were removed.
    pub fn remove(&mut self, name: &str) -> usize {
        let before = self.fields.len();
        self.fields.retain(|(key, _)| !key.eq_ignore_ascii_case(name));
        before - self.fields.len()
    }

    /// Look up `key` in a `key1=value1;key2=value2` parameter list.
    ///
    /// ```
    /// use rtsp::protocol::Header;
    ///
    /// let mut h = Header::new();
    /// h.add("Session", "12345678;timeout=60");
    /// assert_eq!(h.param("Session", "timeout"), Some("60"));
    /// assert_eq!(h.param("Session", "missing"), None);
    /// ```
    pub fn param(&self, name: &str, key: &str) -> Option<&str> {
        self.get(name)?.split(';').find_map(|part| {
            let (k, v) = part.split_once('=')?;
            (k.trim() == key).then(|| v.trim())
        })
    }

    /// Positional `;`-delimited field of the first `name` value.
    pub fn field(&self, name: &str, index: usize) -> Option<&str> {
        self.get(name)?.split(';').nth(index).map(str::trim)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Parsed Content-Length, `None` when absent.
    pub fn content_length(&self) -> Result<Option<usize>> {
        match self.get("Content-Length") {
            None => Ok(None),
            Some(v) => v.trim().parse().map(Some).map_err(|_| {
                RtspError::parse(ParseErrorKind::InvalidContentLength(v.to_string()))
            }),
        }
    }

    /// Write each field as `Name: value\r\n`. The terminating blank line is
    /// left to the caller.
    pub fn write_to<W: Write + ?Sized>(&self, w: &mut W) -> Result<()> {
        for (name, value) in &self.fields {
            write!(w, "{name}: {value}\r\n")?;
        }
        Ok(())
    }

    /// Read header lines up to and including the blank line.
    pub fn read<R: BufRead + ?Sized>(r: &mut R) -> Result<Self> {
        let mut header = Header::new();
        loop {
            let line = read_line(r)?;
            if line.is_empty() {
                return Ok(header);
            }
            let (name, value) = line
                .split_once(':')
                .ok_or_else(|| RtspError::parse(ParseErrorKind::InvalidHeader(line.clone())))?;
            // Only the separator space written by `write_to` is dropped.
            let value = value.strip_prefix(' ').unwrap_or(value);
            header.add(name.trim(), value);
        }
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for Header {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        let mut header = Header::new();
        for (name, value) in iter {
            header.add(name, value);
        }
        header
    }
}

/// Longest start or header line accepted, terminator included.
pub const MAX_LINE_LEN: usize = 8 * 1024;

/// Read one line without its `\r\n` / `\n` terminator.
///
/// End of stream before any byte is an `UnexpectedEof` I/O error. A line
/// that reaches [`MAX_LINE_LEN`] without a `\n` is a parse error.
pub(crate) fn read_line<R: BufRead + ?Sized>(r: &mut R) -> Result<String> {
    let mut buf = Vec::new();
    if (&mut *r).take(MAX_LINE_LEN as u64).read_until(b'\n', &mut buf)? == 0 {
        return Err(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "stream closed while reading line",
        )
        .into());
    }
    if buf.len() == MAX_LINE_LEN && buf.last() != Some(&b'\n') {
        return Err(RtspError::parse(ParseErrorKind::LineTooLong {
            limit: MAX_LINE_LEN,
        }));
    }
    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }
    String::from_utf8(buf).map_err(|_| RtspError::parse(ParseErrorKind::InvalidEncoding))
}
