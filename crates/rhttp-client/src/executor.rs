use std::fmt;
use std::io;
use std::sync::{Arc, Mutex, mpsc};
use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;

use rhttp_core::config::Settings;
use rhttp_core::kv::OrderedKeyValueSet;

use crate::model::{HttpMethod, ProtocolVersion, RequestModel, canonical_header_name};

/// Command sent from the UI thread to the executor thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequestCmd {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    pub protocol: ProtocolVersion,
    pub timeout: Duration,
    pub max_redirects: usize,
}

impl HttpRequestCmd {
    pub fn from_model(model: &RequestModel, settings: &Settings) -> Self {
        Self {
            method: model.method,
            url: model.url(),
            headers: model.outgoing_headers(),
            body: model.body(),
            protocol: model.protocol,
            timeout: settings.timeout(),
            max_redirects: settings.max_redirects,
        }
    }
}

/// Result received from the executor thread.
#[derive(Debug, Clone)]
pub struct HttpResponseResult {
    /// e.g. `"200 OK"`.
    pub status: String,
    /// e.g. `"HTTP/1.1"`.
    pub proto: String,
    pub headers: OrderedKeyValueSet,
    pub body: String,
    pub elapsed: Duration,
    /// Redirect hops as `"<status> <url>"`, in the order they were followed.
    pub redirects: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Timeout,
    Connect,
    Redirect,
    Body,
    InvalidRequest,
    Other,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorKind::Timeout => "timeout",
            ErrorKind::Connect => "connection failed",
            ErrorKind::Redirect => "redirect failed",
            ErrorKind::Body => "failed to read response body",
            ErrorKind::InvalidRequest => "invalid request",
            ErrorKind::Other => "request failed",
        })
    }
}

/// Error from a failed request.
#[derive(Debug, Clone, Error)]
#[error("{kind}: {message}")]
pub struct HttpRequestError {
    pub kind: ErrorKind,
    pub message: String,
    pub elapsed: Duration,
}

impl HttpRequestError {
    fn new(kind: ErrorKind, message: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            kind,
            message: message.into(),
            elapsed,
        }
    }

    fn from_reqwest(err: reqwest::Error, elapsed: Duration) -> Self {
        let kind = if err.is_timeout() {
            ErrorKind::Timeout
        } else if err.is_connect() {
            ErrorKind::Connect
        } else if err.is_redirect() {
            ErrorKind::Redirect
        } else if err.is_body() || err.is_decode() {
            ErrorKind::Body
        } else if err.is_builder() {
            ErrorKind::InvalidRequest
        } else {
            ErrorKind::Other
        };
        Self::new(kind, err.to_string(), elapsed)
    }
}

/// The result type sent back from the executor.
pub type ExecutorResult = Result<HttpResponseResult, HttpRequestError>;

/// Handle to the background executor thread.
pub struct HttpExecutor {
    sender: mpsc::Sender<HttpRequestCmd>,
}

impl HttpExecutor {
    /// Spawn the background executor thread with a tokio runtime. Every
    /// result is passed through `wrap` and pushed into `results`.
    pub fn spawn<T, F>(results: mpsc::Sender<T>, wrap: F) -> io::Result<Self>
    where
        T: Send + 'static,
        F: Fn(ExecutorResult) -> T + Send + 'static,
    {
        let (cmd_tx, cmd_rx) = mpsc::channel::<HttpRequestCmd>();
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        thread::Builder::new()
            .name("rhttp-executor".to_string())
            .spawn(move || {
                rt.block_on(async move {
                    while let Ok(cmd) = cmd_rx.recv() {
                        let result = execute_request(cmd).await;
                        if results.send(wrap(result)).is_err() {
                            break; // Event loop dropped the receiver
                        }
                    }
                });
            })?;

        Ok(Self { sender: cmd_tx })
    }

    /// Send a request command (non-blocking).
    pub fn send(&self, cmd: HttpRequestCmd) -> Result<(), mpsc::SendError<HttpRequestCmd>> {
        self.sender.send(cmd)
    }
}

/// A client configured for one command: timeout, protocol and a redirect
/// policy that records every hop into `hops`.
pub fn build_client(
    cmd: &HttpRequestCmd,
    hops: Arc<Mutex<Vec<String>>>,
) -> Result<reqwest::Client, reqwest::Error> {
    let max_redirects = cmd.max_redirects;
    let policy = reqwest::redirect::Policy::custom(move |attempt| {
        if attempt.previous().len() > max_redirects {
            return attempt.error(format!("stopped after {max_redirects} redirects"));
        }
        if let Ok(mut hops) = hops.lock() {
            hops.push(format!("{} {}", attempt.status().as_u16(), attempt.url()));
        }
        attempt.follow()
    });

    let builder = reqwest::Client::builder()
        .timeout(cmd.timeout)
        .redirect(policy);
    let builder = match cmd.protocol {
        ProtocolVersion::Http11 => builder.http1_only(),
        ProtocolVersion::Http2 => builder.http2_prior_knowledge(),
    };
    builder.build()
}

pub fn build_request(
    client: &reqwest::Client,
    cmd: &HttpRequestCmd,
) -> Result<reqwest::Request, HttpRequestError> {
    let method = reqwest::Method::from_bytes(cmd.method.as_str().as_bytes()).map_err(|e| {
        HttpRequestError::new(ErrorKind::InvalidRequest, e.to_string(), Duration::ZERO)
    })?;

    let url = url::Url::parse(&cmd.url).map_err(|e| {
        HttpRequestError::new(
            ErrorKind::InvalidRequest,
            format!("{}: {e}", cmd.url),
            Duration::ZERO,
        )
    })?;

    let mut builder = client.request(method, url);
    for (key, value) in &cmd.headers {
        builder = builder.header(key, value);
    }
    if let Some(body) = &cmd.body {
        builder = builder.body(body.clone());
    }
    builder
        .build()
        .map_err(|e| HttpRequestError::from_reqwest(e, Duration::ZERO))
}

/// Execute an HTTP request using reqwest.
async fn execute_request(cmd: HttpRequestCmd) -> ExecutorResult {
    tracing::info!(method = %cmd.method, url = %cmd.url, "sending request");
    let hops = Arc::new(Mutex::new(Vec::new()));
    let client = build_client(&cmd, Arc::clone(&hops))
        .map_err(|e| HttpRequestError::from_reqwest(e, Duration::ZERO))?;
    let request = build_request(&client, &cmd)?;

    let start = Instant::now();
    let response = client
        .execute(request)
        .await
        .map_err(|e| HttpRequestError::from_reqwest(e, start.elapsed()))?;

    let status = response.status();
    let status = format!(
        "{} {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("")
    )
    .trim_end()
    .to_string();
    let proto = format!("{:?}", response.version());

    let mut headers = OrderedKeyValueSet::new();
    for (name, value) in response.headers() {
        headers.set(
            canonical_header_name(name.as_str()),
            String::from_utf8_lossy(value.as_bytes()).into_owned(),
        );
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| HttpRequestError::from_reqwest(e, start.elapsed()))?;
    let elapsed = start.elapsed();

    let redirects = hops.lock().map(|h| h.clone()).unwrap_or_default();
    tracing::info!(%status, %proto, ?elapsed, redirects = redirects.len(), "response received");

    Ok(HttpResponseResult {
        status,
        proto,
        headers,
        body: String::from_utf8_lossy(&bytes).into_owned(),
        elapsed,
        redirects,
    })
}
