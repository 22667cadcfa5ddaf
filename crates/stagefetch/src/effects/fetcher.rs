use std::path::PathBuf;

use serde::de::DeserializeOwned;
use stagefetch_fs::StagingFile;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::file::FileFetcher;
use super::http::HttpClient;
use super::installer::{install, resolve_path};
use super::json::JsonFetcher;
use super::mirror::{MirrorResolver, NoMirror};
use crate::core::FallbackDriver;
use crate::data::{DownloadRequest, EndpointSet, FetchOptions, Freshness, Installed, RetryPolicy};
use crate::error::{FetchError, Result};

/// Fetches resources from redundant endpoints.
///
/// Owns the transport, the mirror resolver and a cancellation token. Every
/// call walks its endpoints in order under the given [`RetryPolicy`]; nothing
/// runs in the background.
pub struct RemoteFetcher<C, M = NoMirror> {
    client: C,
    mirror: M,
    options: FetchOptions,
    cancel: CancellationToken,
}

impl<C: HttpClient> RemoteFetcher<C, NoMirror> {
    pub fn new(client: C, options: FetchOptions) -> Self {
        Self {
            client,
            mirror: NoMirror,
            options,
            cancel: CancellationToken::new(),
        }
    }
}

impl<C: HttpClient, M: MirrorResolver> RemoteFetcher<C, M> {
    pub fn with_mirror<N: MirrorResolver>(self, mirror: N) -> RemoteFetcher<C, N> {
        RemoteFetcher {
            client: self.client,
            mirror,
            options: self.options,
            cancel: self.cancel,
        }
    }

    /// Replace the cancellation token, e.g. with a child of a process-wide one.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Cancelling this token stops in-flight fetches at the next attempt or
    /// endpoint boundary.
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn options(&self) -> &FetchOptions {
        &self.options
    }

    fn driver<'a>(&'a self, policy: &'a RetryPolicy) -> FallbackDriver<'a> {
        FallbackDriver::new(policy, self.options.endpoint_cooldown, &self.cancel)
    }

    /// Fetch a JSON document from the first endpoint that serves it.
    ///
    /// There is no stale fallback for JSON: when every endpoint fails the
    /// call fails with [`FetchError::AllEndpointsFailed`].
    ///
    /// # Errors
    ///
    /// - [`FetchError::NoEndpoints`] if `endpoints` is empty
    /// - [`FetchError::AllEndpointsFailed`] once every endpoint has used its
    ///   retry budget; [`FetchError::root`] gives the last transport, status
    ///   or deserialization error
    /// - [`FetchError::Cancelled`] if the token fires first
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        endpoints: &EndpointSet,
        policy: &RetryPolicy,
    ) -> Result<T> {
        let fetcher = JsonFetcher::new(&self.client);
        let resource = endpoints.to_string();

        self.driver(policy)
            .fetch_with_fallback(endpoints, &resource, |url| fetcher.fetch::<T>(url.clone()))
            .await
    }

    /// Download a file and install it atomically.
    ///
    /// The body is staged under [`FetchOptions::staging_dir`], moved onto
    /// `request.local_dir/file_name`, and, when `request.mirror` is set and
    /// the resolver has a base, copied into the mirror directory. Readers of
    /// either location only ever see complete files.
    ///
    /// If no endpoint delivers but a file from an earlier run is already at
    /// the primary path, it is returned as [`Freshness::Stale`]. Publish
    /// errors, cancellation and an empty endpoint set are never downgraded.
    ///
    /// # Arguments
    ///
    /// * `endpoints` - Candidate locations, tried in order
    /// * `request` - File name, primary directory and whether to mirror
    /// * `policy` - Attempts per endpoint and the pause between them
    ///
    /// # Returns
    ///
    /// The path callers should read, relative to the mirror base when the
    /// file lives there, and whether it is fresh or stale.
    ///
    /// # Errors
    ///
    /// - [`FetchError::InvalidFileName`] if `request.file_name` is not a
    ///   single plain component
    /// - [`FetchError::NoEndpoints`] if `endpoints` is empty
    /// - [`FetchError::Publish`] if moving or copying the finished download
    ///   into place fails; this is never retried
    /// - [`FetchError::DownloadUnavailable`] if no endpoint delivered and no
    ///   earlier copy exists
    /// - [`FetchError::Cancelled`] if the token fires first
    pub async fn download_file(
        &self,
        endpoints: &EndpointSet,
        request: &DownloadRequest,
        policy: &RetryPolicy,
    ) -> Result<Installed> {
        request.check_file_name()?;
        let mirror_dir = self.mirror.mirror_dir();
        let primary = request.primary_path();

        let (installed, freshness) = match self.stage(endpoints, request, policy).await {
            Ok(staged) => {
                let installed = install(staged, request, mirror_dir.as_deref())?;
                (installed, Freshness::Fresh)
            }
            Err(e @ (FetchError::Cancelled | FetchError::NoEndpoints(_))) => return Err(e),
            Err(e) if primary.is_file() => {
                warn!(
                    file = %request.file_name,
                    path = %primary.display(),
                    error = %e,
                    "download failed, using previous download"
                );
                (primary, Freshness::Stale)
            }
            Err(e) => {
                return Err(FetchError::DownloadUnavailable {
                    file_name: request.file_name.clone(),
                    cause: Some(Box::new(e)),
                });
            }
        };

        if !installed.exists() {
            return Err(FetchError::DownloadUnavailable {
                file_name: request.file_name.clone(),
                cause: None,
            });
        }

        let path = resolve_path(&installed, mirror_dir.as_deref());
        info!(
            file = %request.file_name,
            path = %path.as_path().display(),
            ?freshness,
            "config file ready"
        );

        Ok(Installed { path, freshness })
    }

    async fn stage(
        &self,
        endpoints: &EndpointSet,
        request: &DownloadRequest,
        policy: &RetryPolicy,
    ) -> Result<StagingFile> {
        if endpoints.is_empty() {
            return Err(FetchError::NoEndpoints(request.file_name.clone()));
        }

        let staging_dir = &self.options.staging_dir;
        let staged = StagingFile::new(staging_dir, &request.file_name).map_err(|source| {
            FetchError::Staging {
                path: staging_dir.clone(),
                source,
            }
        })?;

        let fetcher = FileFetcher::new(&self.client);
        let staging_path = staged.path();
        self.driver(policy)
            .fetch_with_fallback(endpoints, &request.file_name, |url| {
                fetcher.fetch(url.clone(), staging_path)
            })
            .await?;

        Ok(staged)
    }
}

#[cfg(feature = "reqwest")]
impl RemoteFetcher<super::http::ReqwestClient, Option<PathBuf>> {
    /// Build a fetcher with a reqwest transport from file configuration.
    pub fn from_config(config: &crate::data::FetchConfig) -> Result<Self> {
        let client = super::http::ReqwestClient::with_timeouts(
            config.connect_timeout(),
            config.request_timeout(),
        )
        .map_err(|e| FetchError::ClientInit(e.into()))?;

        let fetcher = RemoteFetcher::new(client, config.fetch_options());
        Ok(fetcher.with_mirror(config.mirror_dir.clone()))
    }
}
