//! Digest access authentication (RFC 2617 §3) as used by RTSP servers.
//!
//! Only `algorithm=MD5` and `qop` absent or `auth` are supported:
//!
//! ```text
//! HA1      = MD5(username:realm:password)
//! HA2      = MD5(method:digest-uri)
//! response = MD5(HA1:nonce:nc:cnonce:qop:HA2)   qop=auth
//! response = MD5(HA1:nonce:HA2)                 no qop
//! ```
//!
//! `MD5-sess` and `auth-int` are rejected with an explicit error instead of
//! silently falling back.

use md5::{Digest as _, Md5};

use crate::auth::{AUTHORIZATION, Authenticator, WWW_AUTHENTICATE};
use crate::error::{AuthErrorKind, ParseErrorKind, Result, RtspError};
use crate::protocol::{Request, Response};

/// What to do when the server's challenge cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChallengeFallback {
    /// Fail the request with the parse error.
    #[default]
    Abort,
    /// Retry once without credentials, leaving the server's second answer
    /// to the caller.
    RetryUnauthenticated,
}

/// Digest authentication with per-nonce nonce counting.
#[derive(Debug, Clone)]
pub struct Digest {
    username: String,
    password: String,
    cnonce: Option<String>,
    fallback: ChallengeFallback,
    last_nonce: Option<String>,
    nonce_count: u32,
}

impl Digest {
    pub fn new(username: &str, password: &str) -> Self {
        Digest {
            username: username.to_string(),
            password: password.to_string(),
            cnonce: None,
            fallback: ChallengeFallback::default(),
            last_nonce: None,
            nonce_count: 0,
        }
    }

    /// Use a fixed client nonce instead of a fresh random one per attempt.
    pub fn with_cnonce(mut self, cnonce: &str) -> Self {
        self.cnonce = Some(cnonce.to_string());
        self
    }

    pub fn with_fallback(mut self, fallback: ChallengeFallback) -> Self {
        self.fallback = fallback;
        self
    }

    fn next_nonce_count(&mut self, nonce: &str) -> u32 {
        if self.last_nonce.as_deref() == Some(nonce) {
            self.nonce_count = self.nonce_count.wrapping_add(1);
        } else {
            self.last_nonce = Some(nonce.to_string());
            self.nonce_count = 1;
        }
        self.nonce_count
    }

    fn next_cnonce(&self) -> String {
        match &self.cnonce {
            Some(c) => c.clone(),
            None => format!("{:016x}", rand::random::<u64>()),
        }
    }
}

impl Authenticator for Digest {
    fn authorize(&mut self, request: &mut Request, challenge: Option<&Response>) -> Result<bool> {
        let Some(response) = challenge else {
            return Ok(false);
        };

        let challenge = match Challenge::from_response(response) {
            Ok(c) => c,
            Err(e) if self.fallback == ChallengeFallback::RetryUnauthenticated => {
                tracing::warn!(error = %e, "unusable digest challenge, retrying without credentials");
                return Ok(true);
            }
            Err(e) => return Err(e),
        };

        let qop = challenge.select_qop()?;
        let nonce_count = match qop {
            Some(_) => self.next_nonce_count(&challenge.nonce),
            None => 0,
        };
        let credentials = Credentials {
            username: &self.username,
            password: &self.password,
            method: request.method.as_str(),
            uri: &request.uri,
            realm: &challenge.realm,
            nonce: &challenge.nonce,
            algorithm: challenge.algorithm.as_deref(),
            opaque: challenge.opaque.as_deref(),
            qop,
            cnonce: self.next_cnonce(),
            nonce_count,
        };

        let value = credentials.authorization()?;
        tracing::debug!(
            username = %self.username,
            realm = %challenge.realm,
            domain = ?challenge.domain,
            stale = ?challenge.stale,
            nonce_count,
            "digest credentials computed"
        );
        request.headers.set(AUTHORIZATION, &value);
        Ok(true)
    }
}

/// Directives of a `WWW-Authenticate: Digest ...` header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Challenge {
    pub realm: String,
    pub domain: Option<String>,
    pub nonce: String,
    pub opaque: Option<String>,
    pub stale: Option<String>,
    pub algorithm: Option<String>,
    pub qop: Option<String>,
}

impl Challenge {
    /// Pick the digest challenge among the response's `WWW-Authenticate`
    /// values.
    fn from_response(response: &Response) -> Result<Self> {
        let mut values = response.headers.get_all(WWW_AUTHENTICATE).peekable();
        let first = *values
            .peek()
            .ok_or_else(|| RtspError::auth(AuthErrorKind::MissingChallenge))?;
        let digest = values.find(|v| scheme_is_digest(v)).unwrap_or(first);
        Self::parse(digest)
    }

    pub(crate) fn parse(input: &str) -> Result<Self> {
        let bad = || RtspError::auth(AuthErrorKind::BadChallenge(input.to_string()));

        let s = input.trim();
        if !scheme_is_digest(s) {
            return Err(bad());
        }
        let mut challenge = Challenge::default();
        for directive in split_directives(&s[6..]) {
            let (key, value) = directive.split_once('=').ok_or_else(bad)?;
            let value = unquote(value.trim());
            let key = key.trim();
            match key.to_ascii_lowercase().as_str() {
                "realm" => challenge.realm = value,
                "domain" => challenge.domain = Some(value),
                "nonce" => challenge.nonce = value,
                "opaque" => challenge.opaque = Some(value),
                "stale" => challenge.stale = Some(value),
                "algorithm" => challenge.algorithm = Some(value),
                "qop" => challenge.qop = Some(value),
                _ => {
                    return Err(RtspError::parse(ParseErrorKind::UnknownChallengeDirective(
                        key.to_string(),
                    )));
                }
            }
        }
        if challenge.nonce.is_empty() {
            return Err(bad());
        }
        Ok(challenge)
    }

    /// `Ok(None)` without qop, `Ok(Some("auth"))` when offered.
    fn select_qop(&self) -> Result<Option<&'static str>> {
        match self.qop.as_deref() {
            None => Ok(None),
            Some(offered) if offered.split(',').any(|q| q.trim() == "auth") => Ok(Some("auth")),
            Some(offered) => Err(RtspError::auth(AuthErrorKind::QopNotImplemented(
                offered.to_string(),
            ))),
        }
    }
}

fn scheme_is_digest(value: &str) -> bool {
    let value = value.trim_start();
    value
        .get(..6)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("Digest"))
        && value[6..].starts_with(char::is_whitespace)
}

/// Split on commas that are not inside a quoted string.
fn split_directives(s: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                parts.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);
    parts.into_iter().map(str::trim).filter(|p| !p.is_empty()).collect()
}

fn unquote(value: &str) -> String {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
        .to_string()
}

fn md5_hex(data: &str) -> String {
    hex::encode(Md5::digest(data.as_bytes()))
}

/// Inputs to one digest computation.
#[derive(Debug)]
pub(crate) struct Credentials<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub method: &'a str,
    pub uri: &'a str,
    pub realm: &'a str,
    pub nonce: &'a str,
    pub algorithm: Option<&'a str>,
    pub opaque: Option<&'a str>,
    pub qop: Option<&'a str>,
    pub cnonce: String,
    pub nonce_count: u32,
}

impl Credentials<'_> {
    fn ha1(&self) -> String {
        md5_hex(&format!("{}:{}:{}", self.username, self.realm, self.password))
    }

    fn ha2(&self) -> String {
        md5_hex(&format!("{}:{}", self.method, self.uri))
    }

    pub(crate) fn response(&self) -> Result<String> {
        if let Some(alg) = self.algorithm
            && !alg.eq_ignore_ascii_case("MD5")
        {
            return Err(RtspError::auth(AuthErrorKind::AlgorithmNotImplemented(
                alg.to_string(),
            )));
        }
        match self.qop {
            None => Ok(md5_hex(&format!("{}:{}:{}", self.ha1(), self.nonce, self.ha2()))),
            Some("auth") => Ok(md5_hex(&format!(
                "{}:{}:{:08x}:{}:auth:{}",
                self.ha1(),
                self.nonce,
                self.nonce_count,
                self.cnonce,
                self.ha2()
            ))),
            Some(other) => Err(RtspError::auth(AuthErrorKind::QopNotImplemented(
                other.to_string(),
            ))),
        }
    }

    /// Full `Authorization` header value.
    pub(crate) fn authorization(&self) -> Result<String> {
        let response = self.response()?;
        let mut directives = vec![
            format!("username=\"{}\"", self.username),
            format!("realm=\"{}\"", self.realm),
            format!("nonce=\"{}\"", self.nonce),
            format!("uri=\"{}\"", self.uri),
            format!("response=\"{response}\""),
        ];
        if let Some(alg) = self.algorithm {
            directives.push(format!("algorithm={alg}"));
        }
        if let Some(opaque) = self.opaque {
            directives.push(format!("opaque=\"{opaque}\""));
        }
        if let Some(qop) = self.qop {
            directives.push(format!("qop={qop}"));
            directives.push(format!("nc={:08x}", self.nonce_count));
            directives.push(format!("cnonce=\"{}\"", self.cnonce));
        }
        Ok(format!("Digest {}", directives.join(", ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{Method, status};

    const NONCE: &str = "dcd98b7102dd2f0e8b11d0f600bfb0c093";

    fn mufasa(qop: Option<&'static str>) -> Credentials<'static> {
        Credentials {
            username: "Mufasa",
            password: "Circle Of Life",
            method: "GET",
            uri: "/dir/index.html",
            realm: "testrealm@host.com",
            nonce: NONCE,
            algorithm: None,
            opaque: None,
            qop,
            cnonce: "0a4f113b".to_string(),
            nonce_count: 1,
        }
    }

    fn challenge_response(value: &str) -> Response {
        Response::with_status(status::UNAUTHORIZED).add_header("WWW-Authenticate", value)
    }

    #[test]
    fn rfc2617_vector_with_qop_auth() {
        assert_eq!(
            mufasa(Some("auth")).response().unwrap(),
            "6629fae49393a05397450978507c4ef1"
        );
    }

    #[test]
    fn response_without_qop_is_deterministic() {
        let creds = mufasa(None);
        assert_eq!(creds.ha1(), "939e7578ed9e3c518a452acee763bce9");
        assert_eq!(creds.ha2(), "39aff3a2bab6126f332b942af96d3366");
        assert_eq!(creds.response().unwrap(), "670fd8c2df070c60b045671b8b24ff02");
        assert_eq!(creds.response().unwrap(), mufasa(None).response().unwrap());
    }

    #[test]
    fn directive_order() {
        let mut creds = mufasa(Some("auth"));
        creds.algorithm = Some("MD5");
        creds.opaque = Some("5ccc069c403ebaf9f0171e9517f40e41");
        assert_eq!(
            creds.authorization().unwrap(),
            "Digest username=\"Mufasa\", realm=\"testrealm@host.com\", \
             nonce=\"dcd98b7102dd2f0e8b11d0f600bfb0c093\", uri=\"/dir/index.html\", \
             response=\"6629fae49393a05397450978507c4ef1\", algorithm=MD5, \
             opaque=\"5ccc069c403ebaf9f0171e9517f40e41\", qop=auth, nc=00000001, \
             cnonce=\"0a4f113b\""
        );
    }

    #[test]
    fn parse_rfc2617_challenge() {
        let c = Challenge::parse(
            "Digest realm=\"testrealm@host.com\", qop=\"auth,auth-int\", \
             nonce=\"dcd98b7102dd2f0e8b11d0f600bfb0c093\", \
             opaque=\"5ccc069c403ebaf9f0171e9517f40e41\"",
        )
        .unwrap();
        assert_eq!(c.realm, "testrealm@host.com");
        assert_eq!(c.nonce, NONCE);
        assert_eq!(c.qop.as_deref(), Some("auth,auth-int"));
        assert_eq!(c.select_qop().unwrap(), Some("auth"));
        assert_eq!(c.opaque.as_deref(), Some("5ccc069c403ebaf9f0171e9517f40e41"));
    }

    #[test]
    fn parse_bare_tokens() {
        let c = Challenge::parse("Digest realm=\"cam\", nonce=\"abc\", algorithm=MD5, qop=auth")
            .unwrap();
        assert_eq!(c.algorithm.as_deref(), Some("MD5"));
        assert_eq!(c.qop.as_deref(), Some("auth"));
    }

    #[test]
    fn reject_bad_challenges() {
        for bad in [
            "Basic realm=\"cam\"",
            "Digest realm=\"cam\"",
            "Digest realm=\"cam\", nonce",
            "Digestrealm=\"cam\", nonce=\"abc\"",
        ] {
            let err = Challenge::parse(bad).unwrap_err();
            assert!(
                matches!(
                    err,
                    RtspError::Auth {
                        kind: AuthErrorKind::BadChallenge(_)
                    }
                ),
                "{bad}: {err:?}"
            );
        }
    }

    #[test]
    fn unknown_directive_is_parse_error() {
        let err = Challenge::parse("Digest realm=\"cam\", nonce=\"abc\", charset=UTF-8").unwrap_err();
        match err {
            RtspError::Parse {
                kind: ParseErrorKind::UnknownChallengeDirective(key),
            } => assert_eq!(key, "charset"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unsupported_algorithm_and_qop() {
        let mut creds = mufasa(None);
        creds.algorithm = Some("MD5-sess");
        assert!(matches!(
            creds.response(),
            Err(RtspError::Auth {
                kind: AuthErrorKind::AlgorithmNotImplemented(_)
            })
        ));

        let c = Challenge::parse("Digest realm=\"cam\", nonce=\"abc\", qop=\"auth-int\"").unwrap();
        assert!(matches!(
            c.select_qop(),
            Err(RtspError::Auth {
                kind: AuthErrorKind::QopNotImplemented(_)
            })
        ));
    }

    #[test]
    fn authorize_sets_header_from_challenge() {
        let mut auth = Digest::new("Mufasa", "Circle Of Life");
        let mut req = Request::new(Method::Describe, "rtsp://127.0.0.1/stream");
        assert!(!auth.authorize(&mut req, None).unwrap());
        assert!(!req.headers.contains(AUTHORIZATION));

        let resp = challenge_response(&format!("Digest realm=\"testrealm@host.com\", nonce=\"{NONCE}\""));
        assert!(auth.authorize(&mut req, Some(&resp)).unwrap());
        let value = req.headers.get(AUTHORIZATION).unwrap();
        assert!(value.starts_with("Digest username=\"Mufasa\""));
        assert!(value.contains("uri=\"rtsp://127.0.0.1/stream\""));
        assert!(value.contains("response=\"f3157ab9a805b8dae32bc6b75f0bb9d7\""));
        assert!(!value.contains("qop="));
    }

    #[test]
    fn nonce_count_increments_per_nonce() {
        let mut auth = Digest::new("Mufasa", "Circle Of Life").with_cnonce("0a4f113b");
        let resp = challenge_response(&format!(
            "Digest realm=\"testrealm@host.com\", nonce=\"{NONCE}\", qop=\"auth\""
        ));
        let mut req = Request::new(Method::Describe, "rtsp://127.0.0.1/stream");

        auth.authorize(&mut req, Some(&resp)).unwrap();
        assert!(req.headers.get(AUTHORIZATION).unwrap().contains("nc=00000001"));
        auth.authorize(&mut req, Some(&resp)).unwrap();
        assert!(req.headers.get(AUTHORIZATION).unwrap().contains("nc=00000002"));

        let fresh = challenge_response("Digest realm=\"testrealm@host.com\", nonce=\"other\", qop=auth");
        auth.authorize(&mut req, Some(&fresh)).unwrap();
        assert!(req.headers.get(AUTHORIZATION).unwrap().contains("nc=00000001"));
        assert_eq!(req.headers.get_all(AUTHORIZATION).count(), 1);
    }

    #[test]
    fn random_cnonce_per_attempt() {
        let mut auth = Digest::new("u", "p");
        let resp = challenge_response("Digest realm=\"r\", nonce=\"n\", qop=auth");
        let mut a = Request::new(Method::Options, "rtsp://cam/");
        let mut b = a.clone();
        auth.authorize(&mut a, Some(&resp)).unwrap();
        auth.authorize(&mut b, Some(&resp)).unwrap();
        assert_ne!(a.headers.get(AUTHORIZATION), b.headers.get(AUTHORIZATION));
    }

    #[test]
    fn picks_digest_among_several_challenges() {
        let resp = Response::with_status(status::UNAUTHORIZED)
            .add_header("WWW-Authenticate", "Basic realm=\"cam\"")
            .add_header("WWW-Authenticate", "Digest realm=\"cam\", nonce=\"n\"");
        let mut auth = Digest::new("u", "p");
        let mut req = Request::new(Method::Options, "rtsp://cam/");
        assert!(auth.authorize(&mut req, Some(&resp)).unwrap());
    }

    #[test]
    fn fallback_policy() {
        let resp = challenge_response("Basic realm=\"cam\"");
        let mut req = Request::new(Method::Options, "rtsp://cam/");

        let mut strict = Digest::new("u", "p");
        assert!(strict.authorize(&mut req, Some(&resp)).is_err());

        let mut lenient = Digest::new("u", "p").with_fallback(ChallengeFallback::RetryUnauthenticated);
        assert!(lenient.authorize(&mut req, Some(&resp)).unwrap());
        assert!(!req.headers.contains(AUTHORIZATION));

        let missing = Response::with_status(status::UNAUTHORIZED);
        assert!(matches!(
            strict.authorize(&mut req, Some(&missing)),
            Err(RtspError::Auth {
                kind: AuthErrorKind::MissingChallenge
            })
        ));
    }
}
