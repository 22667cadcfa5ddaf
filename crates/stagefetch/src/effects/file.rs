use std::path::Path;

use futures_util::TryStreamExt;
use tokio::io::AsyncWriteExt;
use url::Url;

use super::http::HttpClient;
use crate::error::{FetchError, Result};

/// One download of one endpoint into a staging path. No retries of its own.
#[derive(Debug)]
pub struct FileFetcher<'a, C> {
    client: &'a C,
}

impl<'a, C: HttpClient> FileFetcher<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// Stream `url` into `staging`, truncating whatever an earlier attempt
    /// left there, and flush it to disk. Returns the number of bytes written.
    ///
    /// Any network or write fault is a [`FetchError::Transport`]; a non-2xx
    /// status is a [`FetchError::Remote`] and leaves `staging` untouched.
    pub async fn fetch(&self, url: Url, staging: &Path) -> Result<u64> {
        let fault = |e: std::io::Error| FetchError::transport(url.as_str(), e);

        let response = self
            .client
            .get(&url, &[])
            .await
            .map_err(|e| FetchError::transport(url.as_str(), e))?;

        if !response.is_success() {
            return Err(FetchError::Remote {
                url: url.to_string(),
                status: response.status,
            });
        }

        let mut file = tokio::fs::File::create(staging).await.map_err(fault)?;
        let mut body = response.body;
        let mut bytes_written = 0u64;

        while let Some(chunk) = body
            .try_next()
            .await
            .map_err(|e| FetchError::transport(url.as_str(), e))?
        {
            file.write_all(&chunk).await.map_err(fault)?;
            bytes_written += chunk.len() as u64;
        }

        file.flush().await.map_err(fault)?;
        file.sync_all().await.map_err(fault)?;

        Ok(bytes_written)
    }
}
