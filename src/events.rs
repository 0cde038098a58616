//! Live event feed over the monitor's WebSocket endpoint.

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::protocol::{ClientMessage, Event};

/// Lifecycle of one WebSocket session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
  Connecting,
  Open,
  Closing,
  Closed,
}

/// Options for one event session.
#[derive(Debug, Clone)]
pub struct SessionOptions {
  pub connect_timeout: Duration,
  /// Close after this many delivered events; `None` leaves termination to
  /// the caller or the remote end.
  pub limit: Option<usize>,
  /// Reason string carried on the locally-sent close frame.
  pub close_reason: String,
}

impl Default for SessionOptions {
  fn default() -> Self {
    Self {
      connect_timeout: Duration::from_secs(10),
      limit: None,
      close_reason: "done".to_string(),
    }
  }
}

impl SessionOptions {
  pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
    self.connect_timeout = timeout;
    self
  }

  pub fn with_limit(mut self, limit: usize) -> Self {
    self.limit = Some(limit);
    self
  }

  pub fn with_close_reason(mut self, reason: impl Into<String>) -> Self {
    self.close_reason = reason.into();
    self
  }
}

/// Map an HTTP base URL to the monitor's WebSocket endpoint.
pub fn ws_url(base_url: &str) -> String {
  let base = base_url.trim_end_matches('/');
  if let Some(rest) = base.strip_prefix("https://") {
    format!("wss://{}/ws", rest)
  } else if let Some(rest) = base.strip_prefix("http://") {
    format!("ws://{}/ws", rest)
  } else {
    format!("{}/ws", base)
  }
}

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// One live WebSocket session against the monitor.
///
/// A session is single-shot: it connects, sends one initial message and
/// then yields inbound events from [`next`](EventSession::next) until the
/// close handshake completes. There is no reconnect logic; dropping the
/// session closes the socket.
pub struct EventSession {
  ws: WsStream,
  state: SessionState,
  received: usize,
  options: SessionOptions,
}

impl EventSession {
  /// Connect, send the initial message and enter the open state.
  ///
  /// The handshake is bounded by the configured connect timeout; exceeding
  /// it fails with [`Error::Connect`].
  pub async fn connect(
    base_url: &str,
    initial: &ClientMessage,
    options: SessionOptions,
  ) -> Result<Self> {
    let url = ws_url(base_url);
    debug!(%url, "connecting");

    let (ws, _response) = tokio::time::timeout(options.connect_timeout, connect_async(&url))
      .await
      .map_err(|_| {
        Error::Connect(format!(
          "connect to {} timed out after {:?}",
          url, options.connect_timeout
        ))
      })?
      .map_err(|e| Error::Connect(e.to_string()))?;

    let mut session = Self {
      ws,
      state: SessionState::Connecting,
      received: 0,
      options,
    };

    let text = serde_json::to_string(initial).map_err(|e| Error::Session(e.to_string()))?;
    if let Err(e) = session.ws.send(Message::Text(text)).await {
      session.state = SessionState::Closed;
      return Err(Error::Session(e.to_string()));
    }

    session.state = SessionState::Open;
    info!(%url, "session open");
    Ok(session)
  }

  pub fn state(&self) -> SessionState {
    self.state
  }

  /// Number of events delivered so far.
  pub fn received(&self) -> usize {
    self.received
  }

  /// Next inbound event.
  ///
  /// Returns `None` once the close handshake has completed; the sequence
  /// is finite and not restartable. A malformed frame surfaces as an
  /// [`Error::Decode`] item without ending the session.
  pub async fn next(&mut self) -> Option<Result<Event>> {
    loop {
      if self.state == SessionState::Closed {
        return None;
      }

      match self.ws.next().await {
        Some(Ok(Message::Text(text))) => {
          if self.state != SessionState::Open {
            debug!("discarding frame received while closing");
            continue;
          }

          let event = match serde_json::from_str::<Event>(&text) {
            Ok(event) => event,
            Err(e) => {
              warn!(%text, "malformed event frame");
              return Some(Err(Error::decode(e, &text)));
            }
          };

          self.received += 1;
          if let Some(limit) = self.options.limit {
            if self.received >= limit {
              if let Err(e) = self.send_close().await {
                return Some(Err(e));
              }
            }
          }
          return Some(Ok(event));
        }
        Some(Ok(Message::Ping(payload))) => {
          if let Err(e) = self.ws.send(Message::Pong(payload)).await {
            self.state = SessionState::Closed;
            return Some(Err(Error::Session(e.to_string())));
          }
        }
        Some(Ok(Message::Close(frame))) => {
          debug!(?frame, "close frame received");
          self.state = SessionState::Closing;
          // tungstenite completes the handshake; keep polling to the end
        }
        Some(Ok(_)) => {
          // binary and pong frames are ignored
        }
        Some(Err(e)) => {
          self.state = SessionState::Closed;
          return Some(Err(Error::Session(e.to_string())));
        }
        None => {
          info!(received = self.received, "session closed");
          self.state = SessionState::Closed;
          return None;
        }
      }
    }
  }

  /// Terminate the session early with a normal close frame.
  ///
  /// Keep calling [`next`](EventSession::next) afterwards to drain the
  /// close handshake.
  pub async fn close(&mut self) -> Result<()> {
    if self.state == SessionState::Open {
      self.send_close().await?;
    }
    Ok(())
  }

  async fn send_close(&mut self) -> Result<()> {
    debug!(reason = %self.options.close_reason, "sending close frame");
    let frame = CloseFrame {
      code: CloseCode::Normal,
      reason: self.options.close_reason.clone().into(),
    };
    match self.ws.send(Message::Close(Some(frame))).await {
      Ok(()) => {
        self.state = SessionState::Closing;
        Ok(())
      }
      Err(e) => {
        self.state = SessionState::Closed;
        Err(Error::Session(e.to_string()))
      }
    }
  }
}
