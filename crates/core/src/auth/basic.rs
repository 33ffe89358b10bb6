use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::auth::{AUTHORIZATION, Authenticator};
use crate::error::Result;
use crate::protocol::{Request, Response};

/// When Basic credentials are attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BasicPolicy {
    /// Attach credentials to every request up front. A `401` means they
    /// were rejected, so no retry is attempted.
    #[default]
    Preemptive,
    /// Send the first attempt bare and attach credentials only after a
    /// `401`, then retry once.
    OnChallenge,
}

/// HTTP Basic authentication (RFC 2617 §2).
#[derive(Debug, Clone)]
pub struct Basic {
    username: String,
    password: String,
    policy: BasicPolicy,
}

impl Basic {
    pub fn new(username: &str, password: &str) -> Self {
        Basic {
            username: username.to_string(),
            password: password.to_string(),
            policy: BasicPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: BasicPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// `Basic base64(username:password)`.
    pub fn header_value(&self) -> String {
        let raw = format!("{}:{}", self.username, self.password);
        format!("Basic {}", STANDARD.encode(raw))
    }
}

impl Authenticator for Basic {
    fn authorize(&mut self, request: &mut Request, challenge: Option<&Response>) -> Result<bool> {
        match (self.policy, challenge) {
            (BasicPolicy::Preemptive, None) => {
                request.headers.set(AUTHORIZATION, &self.header_value());
                Ok(false)
            }
            (BasicPolicy::Preemptive, Some(_)) => {
                tracing::debug!(username = %self.username, "basic credentials rejected");
                Ok(false)
            }
            (BasicPolicy::OnChallenge, None) => Ok(false),
            (BasicPolicy::OnChallenge, Some(_)) => {
                request.headers.set(AUTHORIZATION, &self.header_value());
                Ok(true)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{Method, status};

    #[test]
    fn aladdin_header() {
        let auth = Basic::new("Aladdin", "open sesame");
        assert_eq!(auth.header_value(), "Basic QWxhZGRpbjpvcGVuIHNlc2FtZQ==");
    }

    #[test]
    fn preemptive_decorates_up_front() {
        let mut auth = Basic::new("Aladdin", "open sesame");
        let mut req = Request::new(Method::Describe, "rtsp://cam/stream");
        assert!(!auth.authorize(&mut req, None).unwrap());
        assert_eq!(
            req.headers.get("authorization"),
            Some("Basic QWxhZGRpbjpvcGVuIHNlc2FtZQ==")
        );

        let challenge = Response::with_status(status::UNAUTHORIZED);
        assert!(!auth.authorize(&mut req, Some(&challenge)).unwrap());
    }

    #[test]
    fn on_challenge_waits_for_401() {
        let mut auth = Basic::new("Aladdin", "open sesame").with_policy(BasicPolicy::OnChallenge);
        let mut req = Request::new(Method::Describe, "rtsp://cam/stream");
        assert!(!auth.authorize(&mut req, None).unwrap());
        assert!(!req.headers.contains(AUTHORIZATION));

        let challenge = Response::with_status(status::UNAUTHORIZED)
            .add_header("WWW-Authenticate", "Basic realm=\"cam\"");
        assert!(auth.authorize(&mut req, Some(&challenge)).unwrap());
        assert_eq!(req.headers.get_all(AUTHORIZATION).count(), 1);
    }
}
