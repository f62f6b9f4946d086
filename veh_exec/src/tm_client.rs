//! # Telemetry client
//!
//! The TmClient relays one-line telemetry briefs to a remote log server over
//! a plain TCP connection. The connection lives on a background thread,
//! modelled as a Disconnected/Connected state machine driven by an
//! exponential backoff policy (delay doubling from one second, capped), so
//! the control loop never blocks on the network: [`TmClient::send`] only
//! pushes onto a channel, and briefs arriving while the link is down are
//! dropped.
//!
//! If no endpoint is configured the client is created disabled and sending
//! is a no-op.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use log::{debug, info, warn};
use std::io::Write;
use std::net::TcpStream;
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Delay before the first reconnection attempt.
///
/// Units: seconds
const INITIAL_DELAY_S: f64 = 1.0;

/// Upper limit on the reconnection delay.
///
/// Units: seconds
const MAX_DELAY_S: f64 = 16.0;

/// How long the background thread waits on the channel before checking the
/// connection state again.
const RECV_TIMEOUT: Duration = Duration::from_millis(100);

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// Client relaying telemetry briefs to a remote log server.
pub struct TmClient {
    /// `None` when no endpoint is configured and the relay is disabled.
    sender: Option<Sender<String>>,
}

/// Exponential backoff policy for reconnection attempts.
struct Backoff {
    delay_s: f64,
}

// ------------------------------------------------------------------------------------------------
// ENUMERATIONS
// ------------------------------------------------------------------------------------------------

/// Connection state of the background thread.
enum ConnState {
    /// No link, next attempt not before the given instant.
    Disconnected { next_attempt: Instant },

    /// Live link to the server.
    Connected(TcpStream),
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl TmClient {
    /// Create a new client for the given `host:port` endpoint, or a disabled
    /// client if no endpoint is configured.
    pub fn new(endpoint: Option<&str>) -> Self {
        match endpoint {
            Some(ep) => {
                let (sender, receiver) = channel();
                let ep = ep.to_string();

                thread::spawn(move || bg_thread(ep, receiver));

                Self {
                    sender: Some(sender),
                }
            }
            None => {
                info!("No telemetry endpoint configured, relay disabled");
                Self { sender: None }
            }
        }
    }

    /// Queue a telemetry line for sending. Never blocks.
    pub fn send(&self, line: &str) {
        if let Some(ref sender) = self.sender {
            if sender.send(line.to_string()).is_err() {
                warn!("Telemetry thread has stopped, dropping message");
            }
        }
    }
}

impl Backoff {
    fn new() -> Self {
        Self { delay_s: 0.0 }
    }

    /// Move to the next delay: the initial delay first, then doubling up to
    /// the cap.
    fn advance(&mut self) {
        self.delay_s = (self.delay_s * 2.0).clamp(INITIAL_DELAY_S, MAX_DELAY_S);
    }

    /// Clear the delay after a successful connection.
    fn reset(&mut self) {
        self.delay_s = 0.0;
    }

    fn delay_s(&self) -> f64 {
        self.delay_s
    }
}

// ------------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Background thread owning the connection. Exits when the exec drops the
/// client and the channel hangs up.
fn bg_thread(endpoint: String, receiver: Receiver<String>) {
    let mut conn = ConnState::Disconnected {
        next_attempt: Instant::now(),
    };
    let mut backoff = Backoff::new();

    loop {
        let line = match receiver.recv_timeout(RECV_TIMEOUT) {
            Ok(l) => Some(l),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => break,
        };

        // Try to (re)connect once the backoff delay has passed
        if let ConnState::Disconnected { next_attempt } = conn {
            if Instant::now() >= next_attempt {
                match TcpStream::connect(&endpoint) {
                    Ok(stream) => {
                        info!("Connected to telemetry server at {}", endpoint);
                        backoff.reset();
                        conn = ConnState::Connected(stream);
                    }
                    Err(e) => {
                        backoff.advance();
                        debug!(
                            "Telemetry connection to {} failed ({}), retrying in {} s",
                            endpoint,
                            e,
                            backoff.delay_s()
                        );
                        conn = ConnState::Disconnected {
                            next_attempt: Instant::now()
                                + Duration::from_secs_f64(backoff.delay_s()),
                        };
                    }
                }
            }
        }

        if let Some(line) = line {
            match conn {
                ConnState::Connected(ref mut stream) => {
                    if let Err(e) = writeln!(stream, "{}", line) {
                        warn!("Telemetry send failed ({}), reconnecting", e);
                        backoff.advance();
                        conn = ConnState::Disconnected {
                            next_attempt: Instant::now()
                                + Duration::from_secs_f64(backoff.delay_s()),
                        };
                    }
                }
                ConnState::Disconnected { .. } => {
                    debug!("Telemetry not connected, dropping message");
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_backoff_doubles_to_cap() {
        let mut backoff = Backoff::new();
        assert_eq!(backoff.delay_s(), 0.0);

        let mut delays = Vec::new();
        for _ in 0..6 {
            backoff.advance();
            delays.push(backoff.delay_s());
        }

        assert_eq!(delays, vec![1.0, 2.0, 4.0, 8.0, 16.0, 16.0]);
    }

    #[test]
    fn test_backoff_resets_after_connect() {
        let mut backoff = Backoff::new();
        for _ in 0..4 {
            backoff.advance();
        }

        backoff.reset();
        assert_eq!(backoff.delay_s(), 0.0);

        // The cycle restarts from the initial delay
        backoff.advance();
        assert_eq!(backoff.delay_s(), 1.0);
    }

    #[test]
    fn test_disabled_client_send_is_noop() {
        let client = TmClient::new(None);
        client.send("[Ds]=--.--::[v]=--.--::[a]=--.--::[st]=OFF");
    }
}
