//! Error types for the PeopleChain client SDK.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
  #[error("Transport error: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("{method} {path} -> {status}: {body}")]
  Request {
    method: String,
    path: String,
    status: u16,
    body: String,
  },

  #[error("Decode error: {message} (payload: {payload})")]
  Decode { message: String, payload: String },

  #[error("WebSocket connect failed: {0}")]
  Connect(String),

  #[error("WebSocket session error: {0}")]
  Session(String),
}

impl Error {
  pub(crate) fn decode(err: serde_json::Error, payload: &str) -> Self {
    Self::Decode {
      message: err.to_string(),
      payload: payload.to_string(),
    }
  }
}

pub type Result<T> = std::result::Result<T, Error>;
