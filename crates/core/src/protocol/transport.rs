use std::fmt;

/// Parsed value of an RTSP `Transport` header (RFC 2326 §12.39).
///
/// ## Wire format example
///
/// ```text
/// Client → Server:
///   Transport: RTP/AVP/TCP;unicast;interleaved=0-1
///
/// Server → Client:
///   Transport: RTP/AVP/TCP;unicast;interleaved=0-1;ssrc=1A2B3C4D
/// ```
///
/// Only the parameters a client acts on are broken out; the rest are kept
/// verbatim in [`extra`](Self::extra) so formatting is lossless.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportSpec {
    /// Transport protocol, e.g. `RTP/AVP` or `RTP/AVP/TCP`.
    pub protocol: String,
    pub unicast: bool,
    /// Interleaved channel pair (RTP, RTCP).
    pub interleaved: Option<(u8, u8)>,
    /// Client's RTP/RTCP receive ports.
    pub client_port: Option<(u16, u16)>,
    /// Server's RTP/RTCP ports.
    pub server_port: Option<(u16, u16)>,
    /// Any other `;`-separated parameters, in order.
    pub extra: Vec<String>,
}

impl TransportSpec {
    /// RTP over the RTSP connection on the given channel pair.
    pub fn interleaved(rtp: u8, rtcp: u8) -> Self {
        TransportSpec {
            protocol: "RTP/AVP/TCP".to_string(),
            unicast: true,
            interleaved: Some((rtp, rtcp)),
            client_port: None,
            server_port: None,
            extra: Vec::new(),
        }
    }

    /// RTP over UDP to the given client port pair.
    pub fn udp(rtp_port: u16, rtcp_port: u16) -> Self {
        TransportSpec {
            protocol: "RTP/AVP".to_string(),
            unicast: true,
            interleaved: None,
            client_port: Some((rtp_port, rtcp_port)),
            server_port: None,
            extra: Vec::new(),
        }
    }

    /// Whether the media will arrive as interleaved frames.
    pub fn is_interleaved(&self) -> bool {
        self.protocol.ends_with("/TCP") || self.interleaved.is_some()
    }

    /// Parse a `Transport` header value.
    ///
    /// ## Examples
    ///
    /// ```
    /// use rtsp::protocol::TransportSpec;
    ///
    /// let t = TransportSpec::parse("RTP/AVP;unicast;client_port=8000-8001").unwrap();
    /// assert_eq!(t.client_port, Some((8000, 8001)));
    ///
    /// assert!(TransportSpec::parse("").is_none());
    /// ```
    pub fn parse(header: &str) -> Option<Self> {
        let mut parts = header.split(';').map(str::trim);
        let protocol = parts.next().filter(|p| !p.is_empty())?.to_string();
        let mut spec = TransportSpec {
            protocol,
            unicast: false,
            interleaved: None,
            client_port: None,
            server_port: None,
            extra: Vec::new(),
        };

        for part in parts.filter(|p| !p.is_empty()) {
            if part == "unicast" {
                spec.unicast = true;
            } else if let Some(v) = part.strip_prefix("interleaved=") {
                spec.interleaved = Some(parse_pair(v)?);
            } else if let Some(v) = part.strip_prefix("client_port=") {
                spec.client_port = Some(parse_pair(v)?);
            } else if let Some(v) = part.strip_prefix("server_port=") {
                spec.server_port = Some(parse_pair(v)?);
            } else {
                spec.extra.push(part.to_string());
            }
        }
        Some(spec)
    }
}

/// `a-b` or a lone `a` (RTCP implied as `a + 1`).
fn parse_pair<T>(value: &str) -> Option<(T, T)>
where
    T: std::str::FromStr + Copy + TryFrom<u32>,
    u32: From<T>,
{
    match value.split_once('-') {
        Some((a, b)) => Some((a.trim().parse().ok()?, b.trim().parse().ok()?)),
        None => {
            let a: T = value.trim().parse().ok()?;
            let b = <T as TryFrom<u32>>::try_from(u32::from(a) + 1).ok()?;
            Some((a, b))
        }
    }
}

impl fmt::Display for TransportSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.protocol)?;
        if self.unicast {
            f.write_str(";unicast")?;
        }
        if let Some((a, b)) = self.interleaved {
            write!(f, ";interleaved={a}-{b}")?;
        }
        if let Some((a, b)) = self.client_port {
            write!(f, ";client_port={a}-{b}")?;
        }
        if let Some((a, b)) = self.server_port {
            write!(f, ";server_port={a}-{b}")?;
        }
        for extra in &self.extra {
            write!(f, ";{extra}")?;
        }
        Ok(())
    }
}
