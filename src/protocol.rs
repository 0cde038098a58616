//! Wire types for the PeopleChain monitor API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Response wrapper for single-document operations.
///
/// The server guarantees an `id`; all other fields are server-defined and
/// carried through untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
  pub id: String,
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

/// A stored document: server-assigned `id` plus caller-defined `data`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
  pub id: String,
  #[serde(default)]
  pub data: Value,
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

/// Client-to-server WebSocket messages
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
  GetInfo,
}

/// Server-to-client WebSocket message.
///
/// Event kinds are server-defined; the payload rides along untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
  #[serde(rename = "type")]
  pub kind: String,
  #[serde(flatten)]
  pub payload: Map<String, Value>,
}
