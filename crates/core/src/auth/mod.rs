//! Challenge/response authentication (RFC 2326 §D, RFC 2617).
//!
//! The client calls [`Authenticator::authorize`] twice per request at most:
//!
//! 1. Before the first send, with no response. The strategy may decorate
//!    the request pre-emptively.
//! 2. If the server answered `401 Unauthorized`, with that response. The
//!    strategy decorates the request from the challenge and returns `true`
//!    to have it sent again. The client never retries more than once.
//!
//! | Strategy | Pre-flight | On challenge |
//! |----------|------------|--------------|
//! | [`NoAuth`] | nothing | no retry |
//! | [`Basic`] | depends on [`BasicPolicy`] | sets header, retries |
//! | [`Digest`] | nothing | computes MD5 digest, retries |

pub mod basic;
pub mod digest;

pub use basic::{Basic, BasicPolicy};
pub use digest::{ChallengeFallback, Digest};

use crate::error::Result;
use crate::protocol::{Request, Response};

/// Header carrying credentials.
pub const AUTHORIZATION: &str = "Authorization";

/// Header carrying the server's challenge.
pub const WWW_AUTHENTICATE: &str = "WWW-Authenticate";

/// A strategy for decorating requests with credentials.
///
/// Implementations hold only their own credential state.
pub trait Authenticator: Send {
    /// Decorate `request`; returns whether the client should retry it.
    ///
    /// `challenge` is `None` on the pre-flight call and the `401` response
    /// on the second call.
    fn authorize(&mut self, request: &mut Request, challenge: Option<&Response>) -> Result<bool>;
}

/// Sends requests as they are.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAuth;

impl Authenticator for NoAuth {
    fn authorize(&mut self, _request: &mut Request, _challenge: Option<&Response>) -> Result<bool> {
        Ok(false)
    }
}

impl<A: Authenticator + ?Sized> Authenticator for Box<A> {
    fn authorize(&mut self, request: &mut Request, challenge: Option<&Response>) -> Result<bool> {
        (**self).authorize(request, challenge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{Method, status};

    #[test]
    fn no_auth_never_retries_or_decorates() {
        let mut auth = NoAuth;
        let mut req = Request::new(Method::Options, "rtsp://cam/stream");
        let before = req.clone();
        assert!(!auth.authorize(&mut req, None).unwrap());
        let challenge = Response::with_status(status::UNAUTHORIZED);
        assert!(!auth.authorize(&mut req, Some(&challenge)).unwrap());
        assert_eq!(req, before);
    }
}
