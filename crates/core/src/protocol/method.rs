use std::fmt;
use std::str::FromStr;

use crate::error::{ParseErrorKind, RtspError};

/// RTSP request methods (RFC 2326 §10).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Describe,
    Announce,
    GetParameter,
    Options,
    Pause,
    Play,
    Record,
    Redirect,
    SetParameter,
    Setup,
    Teardown,
}

impl Method {
    pub const ALL: [Method; 11] = [
        Method::Describe,
        Method::Announce,
        Method::GetParameter,
        Method::Options,
        Method::Pause,
        Method::Play,
        Method::Record,
        Method::Redirect,
        Method::SetParameter,
        Method::Setup,
        Method::Teardown,
    ];

    /// Wire token, e.g. `"GET_PARAMETER"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Describe => "DESCRIBE",
            Method::Announce => "ANNOUNCE",
            Method::GetParameter => "GET_PARAMETER",
            Method::Options => "OPTIONS",
            Method::Pause => "PAUSE",
            Method::Play => "PLAY",
            Method::Record => "RECORD",
            Method::Redirect => "REDIRECT",
            Method::SetParameter => "SET_PARAMETER",
            Method::Setup => "SETUP",
            Method::Teardown => "TEARDOWN",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = RtspError;

    /// Method tokens are case-sensitive (RFC 2326 §6.1).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| RtspError::parse(ParseErrorKind::UnknownMethod(s.to_string())))
    }
}
