use serde::de::DeserializeOwned;
use url::Url;

use super::http::HttpClient;
use crate::error::{FetchError, Result};

const JSON_HEADERS: &[(&str, &str)] = &[("Accept", "application/json")];

/// One JSON request against one endpoint. No retries of its own.
#[derive(Debug)]
pub struct JsonFetcher<'a, C> {
    client: &'a C,
}

impl<'a, C: HttpClient> JsonFetcher<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// Request `url` and deserialize the body into `T`.
    ///
    /// Fails with [`FetchError::Transport`] when the request or the body
    /// stream breaks, [`FetchError::Remote`] on a non-2xx status and
    /// [`FetchError::Deserialization`] when the body is not a `T`.
    pub async fn fetch<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let response = self
            .client
            .get(&url, JSON_HEADERS)
            .await
            .map_err(|e| FetchError::transport(url.as_str(), e))?;

        if !response.is_success() {
            return Err(FetchError::Remote {
                url: url.to_string(),
                status: response.status,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::transport(url.as_str(), e))?;

        serde_json::from_slice(&body).map_err(|source| FetchError::Deserialization {
            url: url.to_string(),
            source,
        })
    }
}
