//! I/O: the transport, the two fetchers, and installation.

mod fetcher;
mod file;
mod http;
mod installer;
mod json;
mod mirror;

#[cfg(test)]
pub(crate) mod testing;

pub use fetcher::RemoteFetcher;
pub use file::FileFetcher;
pub use http::{BoxStream, HttpClient, HttpResponse};
pub use json::JsonFetcher;
pub use mirror::{EnvMirror, MirrorResolver, NoMirror};

#[cfg(feature = "reqwest")]
pub use http::ReqwestClient;
