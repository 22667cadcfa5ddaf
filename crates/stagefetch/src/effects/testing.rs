//! Scripted in-memory transport for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use bytes::Bytes;
use url::Url;

use super::http::{HttpClient, HttpResponse};

#[derive(Debug)]
pub(crate) struct MockError(pub String);

impl std::fmt::Display for MockError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for MockError {}

#[derive(Clone, Debug)]
pub(crate) enum Reply {
    Ok(u16, &'static str),
    Refused,
    /// Sends the first chunk, then the connection drops.
    Truncated(&'static str),
}

/// Replies are played in order per URL; the last one repeats.
#[derive(Default)]
pub(crate) struct MockClient {
    scripts: HashMap<String, Vec<Reply>>,
    calls: Mutex<HashMap<String, u32>>,
    headers: Mutex<Vec<(String, String)>>,
}

impl MockClient {
    pub(crate) fn route(mut self, url: &str, replies: &[Reply]) -> Self {
        self.scripts.insert(url.to_string(), replies.to_vec());
        self
    }

    pub(crate) fn calls(&self, url: &str) -> u32 {
        let calls = self.calls.lock().unwrap_or_else(|e| e.into_inner());
        calls.get(url).copied().unwrap_or(0)
    }

    pub(crate) fn last_headers(&self) -> Vec<(String, String)> {
        self.headers.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl HttpClient for MockClient {
    type Error = MockError;

    async fn get(
        &self,
        url: &Url,
        headers: &[(&str, &str)],
    ) -> Result<HttpResponse<MockError>, MockError> {
        let n = {
            let mut calls = self.calls.lock().unwrap_or_else(|e| e.into_inner());
            let n = calls.entry(url.to_string()).or_insert(0);
            *n += 1;
            *n as usize
        };
        *self.headers.lock().unwrap_or_else(|e| e.into_inner()) = headers
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        let reply = self
            .scripts
            .get(url.as_str())
            .and_then(|script| script.get(n - 1).or_else(|| script.last()))
            .cloned()
            .unwrap_or(Reply::Refused);

        match reply {
            Reply::Ok(status, body) => Ok(HttpResponse {
                status,
                body: Box::pin(futures_util::stream::iter([Ok(Bytes::from_static(
                    body.as_bytes(),
                ))])),
            }),
            Reply::Refused => Err(MockError(format!("connection refused: {url}"))),
            Reply::Truncated(first) => Ok(HttpResponse {
                status: 200,
                body: Box::pin(futures_util::stream::iter([
                    Ok(Bytes::from_static(first.as_bytes())),
                    Err(MockError("connection reset".to_string())),
                ])),
            }),
        }
    }
}
