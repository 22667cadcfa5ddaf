use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use futures_util::{Stream, TryStreamExt};
use url::Url;

/// A boxed stream type for HTTP response bodies.
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = T> + Send + 'a>>;

/// Status and body of one HTTP exchange.
pub struct HttpResponse<E> {
    pub status: u16,
    pub body: BoxStream<'static, Result<Bytes, E>>,
}

impl<E> HttpResponse<E> {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Drain the body into memory.
    pub async fn bytes(self) -> Result<Vec<u8>, E> {
        self.body
            .try_fold(Vec::new(), |mut buf, chunk| async move {
                buf.extend_from_slice(&chunk);
                Ok(buf)
            })
            .await
    }
}

impl<E> std::fmt::Debug for HttpResponse<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status)
            .field("body", &"{ ... }")
            .finish()
    }
}

/// Asynchronous HTTP transport.
///
/// One call is one request: implementations must not retry on their own.
/// Connection and timeout failures are reported as `Err`; any status code,
/// success or not, is reported as `Ok` and judged by the caller.
///
/// # Implementations
///
/// - [`ReqwestClient`]: production implementation using `reqwest`
/// - Mock implementations for testing
pub trait HttpClient: Send + Sync {
    /// Error type for HTTP operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Issue a GET request for `url` with extra request headers.
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to fetch
    /// * `headers` - Extra headers to send, e.g. `Accept`
    ///
    /// # Returns
    ///
    /// The status code and a stream over the response body. Non-2xx
    /// statuses are returned here too.
    ///
    /// # Errors
    ///
    /// Returns an error when no response arrives: DNS failure, refused
    /// connection, TLS failure or timeout. Errors while reading the body are
    /// yielded by the body stream instead.
    fn get(
        &self,
        url: &Url,
        headers: &[(&str, &str)],
    ) -> impl Future<Output = Result<HttpResponse<Self::Error>, Self::Error>> + Send;
}

#[cfg(feature = "reqwest")]
mod reqwest_impl {
    use super::*;
    use std::time::Duration;

    /// Production HTTP client implementation using reqwest.
    ///
    /// Build it once per process and hand it to a
    /// [`RemoteFetcher`](crate::RemoteFetcher); the connection pool is shared
    /// by every fetch that goes through it.
    #[derive(Clone, Debug)]
    pub struct ReqwestClient {
        client: reqwest::Client,
    }

    impl ReqwestClient {
        pub fn new() -> Result<Self, reqwest::Error> {
            Self::with_timeouts(Duration::from_secs(5), Duration::from_secs(30))
        }

        pub fn with_timeouts(connect: Duration, request: Duration) -> Result<Self, reqwest::Error> {
            let client = reqwest::Client::builder()
                .connect_timeout(connect)
                .timeout(request)
                .build()?;
            Ok(Self { client })
        }
    }

    impl HttpClient for ReqwestClient {
        type Error = reqwest::Error;

        async fn get(
            &self,
            url: &Url,
            headers: &[(&str, &str)],
        ) -> Result<HttpResponse<Self::Error>, Self::Error> {
            let mut request = self.client.get(url.clone());
            for (key, value) in headers {
                request = request.header(*key, *value);
            }

            let response = request.send().await?;
            let status = response.status().as_u16();
            let body = response.bytes_stream();

            Ok(HttpResponse {
                status,
                body: Box::pin(body),
            })
        }
    }
}

#[cfg(feature = "reqwest")]
pub use reqwest_impl::ReqwestClient;
