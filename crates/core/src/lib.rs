pub mod auth;
pub mod client;
pub mod error;
pub mod protocol;
pub mod transport;

pub use auth::{Authenticator, Basic, BasicPolicy, ChallengeFallback, Digest, NoAuth};
pub use client::{Client, ClientConfig, FrameHandler};
pub use error::{Result, RtspError};
pub use protocol::{Frame, Header, Method, Request, Response, TransportSpec};
