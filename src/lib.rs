//! PeopleChain Rust Client SDK
//!
//! An HTTP + WebSocket client for the PeopleChain monitor API: document
//! CRUD on named collections, informational reads, and a live event feed.
//!
//! # Example
//!
//! ```no_run
//! use peoplechain::{ClientMessage, PeopleChain, SessionOptions};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> peoplechain::Result<()> {
//!   // Connect to a monitor node
//!   let client = PeopleChain::new("http://127.0.0.1:8081");
//!
//!   // Create a document
//!   let notes = client.collection("notes");
//!   let note = notes.create(json!({
//!       "title": "First",
//!       "body": "Hello",
//!       "tags": ["demo"]
//!   })).await?;
//!   println!("Created: {}", note.id);
//!
//!   // Read it back
//!   let doc = notes.get(&note.id).await?;
//!   println!("Data: {}", doc.data);
//!
//!   // Follow live events until five have arrived
//!   let options = SessionOptions::default().with_limit(5);
//!   let mut session = client.events(&ClientMessage::GetInfo, options).await?;
//!   while let Some(event) = session.next().await {
//!     println!("Event: {:?}", event?);
//!   }
//!
//!   Ok(())
//! }
//! ```

mod client;
mod error;
mod events;
pub mod protocol;
pub mod query;

pub use client::{Collection, Options, PeopleChain, DEFAULT_BASE_URL};
pub use error::{Error, Result};
pub use events::{ws_url, EventSession, SessionOptions, SessionState};
pub use protocol::{ClientMessage, Document, Envelope, Event};
pub use query::ListQuery;
