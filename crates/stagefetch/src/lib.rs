//! Resilient fetching of remote configuration resources.
//!
//! A resource is served by several redundant endpoints. Each endpoint is tried
//! in order under a [`RetryPolicy`]; the first success wins. Files are staged
//! privately and only then published into place with an atomic rename, so
//! readers never observe a partial download. When no endpoint delivers, a
//! file installed by an earlier run is kept and reported as stale.
//!
//! # Architecture
//!
//! - [`data`] - endpoint sets, policies, options and configuration
//! - [`core`](self::core) - the retry executor and the fallback driver
//! - `effects` - transport, fetchers, installation
//!
//! # Example
//!
//! ```no_run
//! use stagefetch::{DownloadRequest, EndpointSet, FetchConfig, RemoteFetcher};
//!
//! # async fn run() -> stagefetch::Result<()> {
//! let config = FetchConfig::load("stagefetch.toml")?;
//! let fetcher = RemoteFetcher::from_config(&config)?;
//! let policy = config.retry_policy()?;
//!
//! let endpoints = EndpointSet::from_servers(
//!     ["10.0.0.1:8080", "10.0.0.2:8080"],
//!     "/api/config/file?app=demo&key=redis.properties",
//! )?;
//! let request = DownloadRequest::new("redis.properties", "/etc/demo").mirror(true);
//! let installed = fetcher.download_file(&endpoints, &request, &policy).await?;
//! println!("{}", installed.path.resolve().display());
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod data;
mod effects;
mod error;

pub use crate::core::{FallbackDriver, attempt};
pub use data::{
    DownloadRequest, EndpointSet, FetchConfig, FetchOptions, Freshness, Installed, InstalledPath,
    RetryConfig, RetryPolicy,
};
pub use effects::{
    BoxStream, EnvMirror, FileFetcher, HttpClient, HttpResponse, JsonFetcher, MirrorResolver,
    NoMirror, RemoteFetcher,
};

#[cfg(feature = "reqwest")]
pub use effects::ReqwestClient;

pub use error::{FetchError, Result};
pub use tokio_util::sync::CancellationToken;
