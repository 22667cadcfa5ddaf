//! Immutable inputs and outputs of a fetch.

pub mod config;
pub mod endpoints;
pub mod options;
pub mod policy;

pub use config::{FetchConfig, RetryConfig};
pub use endpoints::EndpointSet;
pub use options::{DownloadRequest, FetchOptions, Freshness, Installed, InstalledPath};
pub use policy::RetryPolicy;
