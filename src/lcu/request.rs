// HTTP transport and retry handling for LCU requests

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Failure, LcuError};

/// Username half of the Basic auth pair, the password comes from the lockfile.
pub const LCU_USERNAME: &str = "riot";

/// Exponential backoff without jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
  pub max_attempts: u32,
  pub initial_delay: Duration,
  pub max_delay: Duration,
}

impl Default for RetryPolicy {
  fn default() -> Self {
    Self {
      max_attempts: 5,
      initial_delay: Duration::from_secs(1),
      max_delay: Duration::from_secs(16),
    }
  }
}

impl RetryPolicy {
  /// Delay after the failed attempt `attempt` (0-indexed): `min(initial * 2^attempt, max)`.
  pub fn delay(&self, attempt: u32) -> Duration {
    2u32
      .checked_pow(attempt)
      .and_then(|factor| self.initial_delay.checked_mul(factor))
      .map_or(self.max_delay, |delay| delay.min(self.max_delay))
  }
}

/// Raw response: status plus body text. Non-2xx is not an error at this level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LcuResponse {
  pub status: u16,
  pub body: String,
}

impl LcuResponse {
  pub fn new(status: u16, body: impl Into<String>) -> Self {
    Self {
      status,
      body: body.into(),
    }
  }

  pub fn is_success(&self) -> bool {
    (200..300).contains(&self.status)
  }

  pub fn json<T: DeserializeOwned>(&self, path: &str) -> Result<T, LcuError> {
    serde_json::from_str(&self.body).map_err(|source| LcuError::Decode {
      path: path.to_string(),
      source,
    })
  }

  pub fn error_for_status(self, method: Method, path: &str) -> Result<Self, LcuError> {
    if self.is_success() {
      return Ok(self);
    }
    Err(LcuError::Status {
      method,
      path: path.to_string(),
      status: self.status,
      body: self.body,
    })
  }

  fn failure(&self) -> Failure {
    Failure::Status {
      status: self.status,
      body: self.body.clone(),
    }
  }
}

/// One HTTP exchange against a local API. `Err` only for transport-level failures.
#[async_trait]
pub trait Transport: Send + Sync {
  async fn send(
    &self,
    method: Method,
    path: &str,
    body: Option<&Value>,
  ) -> Result<LcuResponse, LcuError>;
}

/// reqwest-backed transport for the client API (port from lockfile) and the live game API.
pub struct HttpTransport {
  client: reqwest::Client,
  base_url: String,
  authorization: Option<String>,
}

impl HttpTransport {
  /// `password` is `None` for unauthenticated endpoints such as the live client data API.
  /// `accept_invalid_certs` must be set explicitly; the local services use a self-signed
  /// certificate.
  pub fn new(base_url: impl Into<String>, password: Option<&str>, accept_invalid_certs: bool) -> Self {
    let base_url = base_url.into();
    if accept_invalid_certs {
      warn!(
        "TLS certificate validation is disabled for {} (accept_invalid_certs = true)",
        base_url
      );
    }

    let client = reqwest::Client::builder()
      .danger_accept_invalid_certs(accept_invalid_certs)
      .timeout(Duration::from_secs(5))
      .connect_timeout(Duration::from_secs(2))
      .pool_max_idle_per_host(2)
      .build()
      .unwrap_or_else(|e| {
        warn!("Failed to build HTTP client ({}), using defaults", e);
        reqwest::Client::new()
      });

    Self {
      client,
      base_url,
      authorization: password.map(basic_auth),
    }
  }
}

pub fn basic_auth(password: &str) -> String {
  let token = general_purpose::STANDARD.encode(format!("{}:{}", LCU_USERNAME, password));
  format!("Basic {}", token)
}

#[async_trait]
impl Transport for HttpTransport {
  async fn send(
    &self,
    method: Method,
    path: &str,
    body: Option<&Value>,
  ) -> Result<LcuResponse, LcuError> {
    let url = format!("{}{}", self.base_url, path);
    let mut request = self.client.request(method, &url);
    if let Some(auth) = &self.authorization {
      request = request.header("Authorization", auth);
    }
    if let Some(body) = body {
      request = request.json(body);
    }

    let response = request.send().await?;
    let status = response.status().as_u16();
    let body = response.text().await?;
    Ok(LcuResponse { status, body })
  }
}

/// Wraps a transport with per-call opt-in retries.
#[derive(Clone)]
pub struct ResilientClient {
  transport: Arc<dyn Transport>,
  policy: RetryPolicy,
}

impl ResilientClient {
  pub fn new(transport: Arc<dyn Transport>, policy: RetryPolicy) -> Self {
    Self { transport, policy }
  }

  pub async fn get(&self, path: &str) -> Result<LcuResponse, LcuError> {
    self.transport.send(Method::GET, path, None).await
  }

  pub async fn post(&self, path: &str, body: Option<&Value>) -> Result<LcuResponse, LcuError> {
    self.transport.send(Method::POST, path, body).await
  }

  pub async fn put(&self, path: &str, body: Option<&Value>) -> Result<LcuResponse, LcuError> {
    self.transport.send(Method::PUT, path, body).await
  }

  pub async fn patch(&self, path: &str, body: Option<&Value>) -> Result<LcuResponse, LcuError> {
    self.transport.send(Method::PATCH, path, body).await
  }

  pub async fn get_with_retries(&self, path: &str) -> Result<LcuResponse, LcuError> {
    let transport = &self.transport;
    self
      .call(path, || transport.send(Method::GET, path, None))
      .await
  }

  pub async fn post_with_retries(
    &self,
    path: &str,
    body: Option<&Value>,
  ) -> Result<LcuResponse, LcuError> {
    let transport = &self.transport;
    self
      .call(path, || transport.send(Method::POST, path, body))
      .await
  }

  /// Runs `request` until it returns a 2xx response, sleeping `policy.delay(i)` after each
  /// failed attempt except the last. Transport errors count as failed attempts.
  pub async fn call<F, Fut>(&self, path: &str, mut request: F) -> Result<LcuResponse, LcuError>
  where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<LcuResponse, LcuError>>,
  {
    let attempts = self.policy.max_attempts.max(1);
    let mut last = Failure::Transport("no attempt made".to_string());

    for attempt in 0..attempts {
      match request().await {
        Ok(response) if response.is_success() => return Ok(response),
        Ok(response) => last = response.failure(),
        Err(LcuError::Transport(msg)) => last = Failure::Transport(msg),
        Err(other) => return Err(other),
      }

      debug!(
        "[LCU] {} failed (attempt {}/{}): {}",
        path,
        attempt + 1,
        attempts,
        last
      );

      if attempt + 1 < attempts {
        tokio::time::sleep(self.policy.delay(attempt)).await;
      }
    }

    Err(LcuError::RetriesExhausted {
      path: path.to_string(),
      attempts,
      last,
    })
  }
}
