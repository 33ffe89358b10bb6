use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::Duration;

use clap::Parser;
use rtsp::{Basic, BasicPolicy, Client, ClientConfig, Digest, Response, RtspError, TransportSpec};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "rtsp-client",
    about = "Probe an RTSP stream: OPTIONS, DESCRIBE, and optionally SETUP/PLAY over TCP"
)]
struct Args {
    /// Stream URI, e.g. rtsp://127.0.0.1:8554/stream
    url: String,

    /// Username for Basic or Digest authentication
    #[arg(long, short)]
    user: Option<String>,

    /// Password for Basic or Digest authentication
    #[arg(long, short, default_value = "")]
    password: String,

    /// Use Digest instead of Basic authentication
    #[arg(long)]
    digest: bool,

    /// Play for this many seconds after SETUP (0 stops after DESCRIBE)
    #[arg(long, default_value_t = 0)]
    play_secs: u64,

    /// First interleaved channel; RTCP uses the next one
    #[arg(long, default_value_t = 0)]
    channel: u8,
}

/// Why a probe run stopped.
#[derive(Debug, Error)]
enum ProbeError {
    #[error(transparent)]
    Rtsp(#[from] RtspError),

    /// The server answered with a non-2xx status.
    #[error("server answered {code} {text}")]
    Status { code: u16, text: String },

    #[error("SETUP response has no Session header")]
    NoSession,

    #[error("channel {0} leaves no room for RTCP")]
    NoRtcpChannel(u8),
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {e}", args.url);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), ProbeError> {
    let counts: Arc<Vec<AtomicU64>> = Arc::new((0..256).map(|_| AtomicU64::new(0)).collect());
    let sink = counts.clone();

    let mut client = Client::new(ClientConfig::default()).with_frame_handler(move |frame| {
        sink[usize::from(frame.channel)].fetch_add(1, Ordering::Relaxed);
        Ok(())
    });
    if let Some(user) = &args.user {
        client = if args.digest {
            client.with_auth(Digest::new(user, &args.password))
        } else {
            client.with_auth(Basic::new(user, &args.password).with_policy(BasicPolicy::OnChallenge))
        };
    }

    let options = checked(client.options(&args.url)?)?;
    if let Some(public) = options.headers.get("Public") {
        println!("Public: {public}");
    }

    let describe = checked(client.describe(&args.url)?)?;
    let sdp = String::from_utf8_lossy(&describe.body);
    println!("{sdp}");

    if args.play_secs == 0 {
        return Ok(());
    }

    let track = control_uri(&args.url, &sdp);
    let rtcp = args
        .channel
        .checked_add(1)
        .ok_or(ProbeError::NoRtcpChannel(args.channel))?;
    let transport = TransportSpec::interleaved(args.channel, rtcp).to_string();
    let setup = checked(client.setup(&track, &transport)?)?;
    let session = setup
        .session_id()
        .ok_or(ProbeError::NoSession)?
        .to_string();
    tracing::info!(%track, %session, "session established");

    checked(client.play(&args.url, &session)?)?;
    thread::sleep(Duration::from_secs(args.play_secs));

    for (channel, count) in counts.iter().enumerate() {
        let count = count.load(Ordering::Relaxed);
        if count > 0 {
            println!("channel {channel}: {count} frames");
        }
    }

    checked(client.teardown(&args.url, &session)?)?;
    Ok(())
}

/// Turn a non-2xx status into an error naming it.
fn checked(response: Response) -> Result<Response, ProbeError> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(ProbeError::Status {
            code: response.status_code,
            text: response.status_text,
        })
    }
}

/// SETUP target for the first media section's `a=control` attribute.
fn control_uri(base: &str, sdp: &str) -> String {
    let control = sdp
        .lines()
        .skip_while(|line| !line.starts_with("m="))
        .find_map(|line| line.trim().strip_prefix("a=control:"));
    match control {
        None | Some("*") => base.to_string(),
        Some(c) if c.contains("://") => c.to_string(),
        Some(c) => format!("{}/{}", base.trim_end_matches('/'), c),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_relative_to_base() {
        let sdp = "v=0\r\na=control:*\r\nm=video 0 RTP/AVP 96\r\na=control:trackID=0\r\n";
        assert_eq!(
            control_uri("rtsp://cam/live/", sdp),
            "rtsp://cam/live/trackID=0"
        );
    }

    #[test]
    fn control_absolute_or_missing() {
        let sdp = "m=video 0 RTP/AVP 96\r\na=control:rtsp://cam/other/track1\r\n";
        assert_eq!(control_uri("rtsp://cam/live", sdp), "rtsp://cam/other/track1");
        assert_eq!(control_uri("rtsp://cam/live", "v=0\r\n"), "rtsp://cam/live");
    }

    #[test]
    fn non_success_status_is_reported() {
        assert!(checked(Response::ok()).is_ok());
        let err = checked(Response::with_status(rtsp::protocol::status::UNAUTHORIZED)).unwrap_err();
        assert!(matches!(err, ProbeError::Status { code: 401, .. }));
        assert_eq!(err.to_string(), "server answered 401 Unauthorized");
    }

    #[test]
    fn args_parse() {
        let args = Args::parse_from([
            "rtsp-client",
            "rtsp://cam/live",
            "--user",
            "admin",
            "--digest",
            "--play-secs",
            "5",
        ]);
        assert_eq!(args.user.as_deref(), Some("admin"));
        assert!(args.digest);
        assert_eq!(args.play_secs, 5);
        assert_eq!(args.channel, 0);
    }
}
