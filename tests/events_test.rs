//! Event session tests against a local WebSocket fixture server.

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use peoplechain::{ClientMessage, Error, EventSession, SessionOptions, SessionState};
use serde_json::json;
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::Message;

#[tokio::test]
async fn test_session_closes_after_limit() {
  let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();

  let server = tokio::spawn(async move {
    let (stream, _) = listener.accept().await.unwrap();
    let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();

    // the session's single proactive request
    let first = ws.next().await.unwrap().unwrap();
    assert_eq!(first, Message::Text(r#"{"type":"get_info"}"#.to_string()));

    // more frames than the client's limit
    for height in 0..8 {
      let frame = serde_json::to_string(&json!({"type": "block", "height": height})).unwrap();
      ws.send(Message::Text(frame)).await.unwrap();
    }

    // drain until the close handshake completes, capturing the close frame
    let mut close_frame = None;
    while let Some(msg) = ws.next().await {
      match msg {
        Ok(Message::Close(frame)) => close_frame = frame,
        Ok(_) => {}
        Err(_) => break,
      }
    }
    close_frame
  });

  let base_url = format!("http://{}", addr);
  let options = SessionOptions::default().with_limit(5).with_close_reason("enough");
  let mut session = EventSession::connect(&base_url, &ClientMessage::GetInfo, options)
    .await
    .unwrap();
  assert_eq!(session.state(), SessionState::Open);

  let mut events = Vec::new();
  while let Some(event) = session.next().await {
    events.push(event.unwrap());
  }

  assert_eq!(events.len(), 5);
  assert_eq!(session.received(), 5);
  assert_eq!(session.state(), SessionState::Closed);
  assert_eq!(events[0].kind, "block");
  assert_eq!(events[4].payload["height"], 4);

  let close_frame = server.await.unwrap().expect("close frame");
  assert_eq!(close_frame.code, CloseCode::Normal);
  assert_eq!(close_frame.reason, "enough");
}

#[tokio::test]
async fn test_session_ends_on_remote_close() {
  let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();

  let server = tokio::spawn(async move {
    let (stream, _) = listener.accept().await.unwrap();
    let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();

    let _initial = ws.next().await.unwrap().unwrap();
    for height in 0..2 {
      let frame = serde_json::to_string(&json!({"type": "block", "height": height})).unwrap();
      ws.send(Message::Text(frame)).await.unwrap();
    }

    ws.close(None).await.unwrap();
    while ws.next().await.is_some() {}
  });

  let base_url = format!("http://{}", addr);
  let mut session =
    EventSession::connect(&base_url, &ClientMessage::GetInfo, SessionOptions::default())
      .await
      .unwrap();

  let mut events = Vec::new();
  while let Some(event) = session.next().await {
    events.push(event.unwrap());
  }

  assert_eq!(events.len(), 2);
  assert_eq!(session.state(), SessionState::Closed);
  server.await.unwrap();
}

#[tokio::test]
async fn test_malformed_frame_surfaces_without_ending_session() {
  let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();

  let server = tokio::spawn(async move {
    let (stream, _) = listener.accept().await.unwrap();
    let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();

    let _initial = ws.next().await.unwrap().unwrap();
    ws.send(Message::Text("not json".to_string())).await.unwrap();
    ws.send(Message::Text(r#"{"type":"peer","addr":"10.0.0.2"}"#.to_string()))
      .await
      .unwrap();

    ws.close(None).await.unwrap();
    while ws.next().await.is_some() {}
  });

  let base_url = format!("http://{}", addr);
  let mut session =
    EventSession::connect(&base_url, &ClientMessage::GetInfo, SessionOptions::default())
      .await
      .unwrap();

  match session.next().await {
    Some(Err(Error::Decode { payload, .. })) => assert_eq!(payload, "not json"),
    other => panic!("Expected Decode error, got: {:?}", other),
  }
  assert_eq!(session.state(), SessionState::Open);

  let event = session.next().await.unwrap().unwrap();
  assert_eq!(event.kind, "peer");
  assert_eq!(session.received(), 1);

  assert!(session.next().await.is_none());
  assert_eq!(session.state(), SessionState::Closed);
  server.await.unwrap();
}

#[tokio::test]
async fn test_connect_refused() {
  let result = EventSession::connect(
    "http://127.0.0.1:59998",
    &ClientMessage::GetInfo,
    SessionOptions::default(),
  )
  .await;

  match result {
    Err(Error::Connect(_)) => {}
    other => panic!("Expected Connect error, got: {:?}", other.map(|_| ())),
  }
}

#[tokio::test]
async fn test_connect_times_out_without_handshake() {
  let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();

  // accept the TCP connection but never answer the upgrade request
  let server = tokio::spawn(async move {
    let (stream, _) = listener.accept().await.unwrap();
    tokio::time::sleep(Duration::from_secs(5)).await;
    drop(stream);
  });

  let base_url = format!("http://{}", addr);
  let options = SessionOptions::default().with_connect_timeout(Duration::from_millis(200));
  let result = EventSession::connect(&base_url, &ClientMessage::GetInfo, options).await;

  match result {
    Err(Error::Connect(msg)) => assert!(msg.contains("timed out")),
    other => panic!("Expected Connect error, got: {:?}", other.map(|_| ())),
  }
  server.abort();
}
