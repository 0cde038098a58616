//! Basic example demonstrating the PeopleChain client SDK.
//!
//! Run against a local monitor node, overriding the target with
//! `BASE_URL=http://192.168.1.50:8081` if needed.

use peoplechain::{ClientMessage, ListQuery, Options, PeopleChain, SessionOptions};
use serde_json::json;

#[tokio::main]
async fn main() -> peoplechain::Result<()> {
  let options = Options::from_env();
  println!("Using BASE_URL={}", options.base_url);
  let client = PeopleChain::with_options(options);

  println!("\n== REST: /api/info");
  println!("{:#}", client.info().await?);

  println!("\n== REST: /api/peers");
  println!("{:#}", client.peers(Some(10)).await?);

  println!("\n== REST: /api/blocks");
  println!("{:#}", client.blocks("tip", 3).await?);

  let notes = client.collection("notes");

  println!("\n1) Create two notes");
  let n1 = notes
    .create(json!({"title": "First", "body": "Hello from Rust", "tags": ["demo", "rust"]}))
    .await?;
  let n2 = notes
    .create(json!({"title": "Second", "body": "Filter me", "tags": ["filter"]}))
    .await?;
  println!("created {} and {}", n1.id, n2.id);

  println!("\n2) List (limit=10)");
  println!("{:#}", notes.list(ListQuery::new().limit(10)).await?);

  println!("\n3) Filter q=filter");
  println!("{:#}", notes.list(ListQuery::new().q("filter")).await?);

  println!("\n4) Read first by id");
  let doc = notes.get(&n1.id).await?;
  println!("{:#}", doc.data);

  println!("\n5) Replace with PUT");
  notes
    .replace(&n1.id, json!({"title": "Updated", "body": "Replaced body", "tags": ["updated"]}))
    .await?;

  println!("\n6) Patch with PATCH");
  notes
    .patch(&n1.id, json!({"extra": 42, "tags": ["updated", "patched"]}))
    .await?;

  println!("\n7) Delete second");
  println!("{:#}", notes.delete(&n2.id).await?);

  println!("\n8) List again");
  println!("{:#}", notes.list(ListQuery::new()).await?);

  println!("\n== WS: follow five events");
  let session_options = SessionOptions::default().with_limit(5);
  let mut session = client.events(&ClientMessage::GetInfo, session_options).await?;
  while let Some(event) = session.next().await {
    match event {
      Ok(event) => println!("WS: {} {:?}", event.kind, event.payload),
      Err(e) => eprintln!("WS error: {}", e),
    }
  }

  Ok(())
}
