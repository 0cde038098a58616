//! HTTP client for the PeopleChain monitor REST API.

use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde_json::{json, Value};
use tracing::debug;

use crate::error::{Error, Result};
use crate::events::{EventSession, SessionOptions};
use crate::protocol::{ClientMessage, Document, Envelope};
use crate::query::ListQuery;

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8081";

/// Client configuration.
#[derive(Debug, Clone)]
pub struct Options {
  pub base_url: String,
  pub request_timeout: Duration,
}

impl Options {
  pub fn new(base_url: impl Into<String>) -> Self {
    let base_url = base_url.into();
    Self {
      base_url: base_url.trim_end_matches('/').to_string(),
      request_timeout: Duration::from_secs(10),
    }
  }

  /// Read the base URL from the `BASE_URL` environment variable, falling
  /// back to [`DEFAULT_BASE_URL`].
  pub fn from_env() -> Self {
    match std::env::var("BASE_URL") {
      Ok(url) if !url.is_empty() => Self::new(url),
      _ => Self::new(DEFAULT_BASE_URL),
    }
  }

  pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
    self.request_timeout = timeout;
    self
  }
}

impl Default for Options {
  fn default() -> Self {
    Self::new(DEFAULT_BASE_URL)
  }
}

fn decode_json<T: serde::de::DeserializeOwned>(text: &str) -> Result<T> {
  serde_json::from_str(text).map_err(|e| Error::decode(e, text))
}

/// Client for the PeopleChain monitor REST API.
///
/// Holds a base URL and a reusable HTTP connection pool; individual calls
/// are otherwise stateless. Cloning is cheap and clones share the pool.
#[derive(Debug, Clone)]
pub struct PeopleChain {
  options: Options,
  http: reqwest::Client,
}

impl PeopleChain {
  /// Create a client for the given base URL.
  pub fn new(base_url: impl Into<String>) -> Self {
    Self::with_options(Options::new(base_url))
  }

  pub fn with_options(options: Options) -> Self {
    Self {
      options,
      http: reqwest::Client::new(),
    }
  }

  pub fn base_url(&self) -> &str {
    &self.options.base_url
  }

  /// Issue a raw request. Status codes are not interpreted here.
  async fn request(
    &self,
    method: Method,
    path: &str,
    body: Option<&Value>,
  ) -> Result<(StatusCode, String)> {
    let url = format!("{}{}", self.options.base_url, path);
    debug!(%method, %url, "request");

    let mut req = self
      .http
      .request(method, &url)
      .timeout(self.options.request_timeout);
    if let Some(body) = body {
      req = req.header("Content-Type", "application/json").json(body);
    }

    let res = req.send().await?;
    let status = res.status();
    let text = res.text().await?;
    Ok((status, text))
  }

  /// Issue a request and map any non-2xx status to [`Error::Request`].
  async fn request_ok(&self, method: Method, path: &str, body: Option<&Value>) -> Result<String> {
    let method_name = method.to_string();
    let (status, text) = self.request(method, path, body).await?;
    if status.is_success() {
      Ok(text)
    } else {
      Err(Error::Request {
        method: method_name,
        path: path.to_string(),
        status: status.as_u16(),
        body: text,
      })
    }
  }

  async fn get_json(&self, path: &str) -> Result<Value> {
    let text = self.request_ok(Method::GET, path, None).await?;
    decode_json(&text)
  }

  /// Node and chain summary from `/api/info`.
  pub async fn info(&self) -> Result<Value> {
    self.get_json("/api/info").await
  }

  /// Known peers from `/api/peers`.
  pub async fn peers(&self, limit: Option<usize>) -> Result<Value> {
    match limit {
      Some(n) => self.get_json(&format!("/api/peers?limit={}", n)).await,
      None => self.get_json("/api/peers").await,
    }
  }

  /// A block range from `/api/blocks`, e.g. `from = "tip"`.
  pub async fn blocks(&self, from: &str, count: usize) -> Result<Value> {
    let path = format!("/api/blocks?from={}&count={}", urlencoding::encode(from), count);
    self.get_json(&path).await
  }

  /// Handle on a named document collection.
  pub fn collection(&self, name: impl Into<String>) -> Collection {
    Collection {
      client: self.clone(),
      name: name.into(),
    }
  }

  /// Open a live event session against the monitor's WebSocket endpoint.
  pub async fn events(
    &self,
    initial: &ClientMessage,
    options: SessionOptions,
  ) -> Result<EventSession> {
    EventSession::connect(self.base_url(), initial, options).await
  }
}

/// CRUD operations on one named collection of documents.
///
/// Each call is a single independent request; handles hold no state beyond
/// the collection name and the shared connection pool.
#[derive(Debug, Clone)]
pub struct Collection {
  client: PeopleChain,
  name: String,
}

impl Collection {
  pub fn name(&self) -> &str {
    &self.name
  }

  fn base_path(&self) -> String {
    format!("/api/db/{}", self.name)
  }

  fn doc_path(&self, id: &str) -> String {
    format!("/api/db/{}/{}", self.name, id)
  }

  /// Create a document; the server assigns its id.
  pub async fn create(&self, data: Value) -> Result<Envelope> {
    let body = json!({ "data": data });
    let text = self
      .client
      .request_ok(Method::POST, &self.base_path(), Some(&body))
      .await?;
    decode_json(&text)
  }

  /// Create a document under a caller-chosen id.
  pub async fn create_with_id(&self, id: &str, data: Value) -> Result<Envelope> {
    let body = json!({ "id": id, "data": data });
    let text = self
      .client
      .request_ok(Method::POST, &self.base_path(), Some(&body))
      .await?;
    decode_json(&text)
  }

  /// List documents, optionally filtered and paginated.
  ///
  /// The list shape is server-defined, so the parsed body is returned
  /// as-is.
  pub async fn list(&self, query: ListQuery) -> Result<Value> {
    let qs = query.to_query_string();
    let path = if qs.is_empty() {
      self.base_path()
    } else {
      format!("{}?{}", self.base_path(), qs)
    };
    let text = self.client.request_ok(Method::GET, &path, None).await?;
    decode_json(&text)
  }

  /// Read one document by id.
  pub async fn get(&self, id: &str) -> Result<Document> {
    let text = self
      .client
      .request_ok(Method::GET, &self.doc_path(id), None)
      .await?;
    decode_json(&text)
  }

  /// Replace a document's data wholesale. Fields missing from `data` are
  /// discarded server-side.
  pub async fn replace(&self, id: &str, data: Value) -> Result<Envelope> {
    let body = json!({ "data": data });
    let text = self
      .client
      .request_ok(Method::PUT, &self.doc_path(id), Some(&body))
      .await?;
    decode_json(&text)
  }

  /// Shallow-merge fields into a document's data. Fields absent from
  /// `data` are left untouched server-side.
  pub async fn patch(&self, id: &str, data: Value) -> Result<Envelope> {
    let body = json!({ "data": data });
    let text = self
      .client
      .request_ok(Method::PATCH, &self.doc_path(id), Some(&body))
      .await?;
    decode_json(&text)
  }

  /// Delete a document by id. A later read of the same id fails with a
  /// not-found [`Error::Request`].
  pub async fn delete(&self, id: &str) -> Result<Value> {
    let text = self
      .client
      .request_ok(Method::DELETE, &self.doc_path(id), None)
      .await?;
    decode_json(&text)
  }
}
