use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use url::Url;

use super::retry::{self, pause};
use crate::data::{EndpointSet, RetryPolicy};
use crate::error::{FetchError, Result};

/// Walks an [`EndpointSet`] in order, retrying each endpoint under one policy.
///
/// The first endpoint to succeed wins and later endpoints are never touched.
/// After an endpoint is exhausted the driver waits `cooldown` before moving
/// on.
#[derive(Clone, Copy, Debug)]
pub struct FallbackDriver<'a> {
    policy: &'a RetryPolicy,
    cooldown: Duration,
    cancel: &'a CancellationToken,
}

impl<'a> FallbackDriver<'a> {
    pub fn new(policy: &'a RetryPolicy, cooldown: Duration, cancel: &'a CancellationToken) -> Self {
        Self {
            policy,
            cooldown,
            cancel,
        }
    }

    /// Run `operation` against each endpoint until one succeeds.
    ///
    /// `resource` only names the resource in logs and in
    /// [`FetchError::AllEndpointsFailed`]. An empty set fails with
    /// [`FetchError::NoEndpoints`] before anything is attempted.
    pub async fn fetch_with_fallback<T, F, Fut>(
        &self,
        endpoints: &EndpointSet,
        resource: &str,
        mut operation: F,
    ) -> Result<T>
    where
        F: FnMut(&Url) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut last = None;

        for (index, url) in endpoints.iter().enumerate() {
            if index > 0 {
                pause(self.cooldown, self.cancel).await?;
            }

            debug!(url = %url, resource, "querying endpoint");

            match retry::attempt(self.policy, self.cancel, || operation(url)).await {
                Ok(value) => return Ok(value),
                Err(FetchError::Cancelled) => return Err(FetchError::Cancelled),
                Err(e) => {
                    warn!(url = %url, resource, error = %e, "endpoint exhausted");
                    last = Some(e);
                }
            }
        }

        match last {
            Some(last) => Err(FetchError::AllEndpointsFailed {
                resource: resource.to_string(),
                last: Box::new(last),
            }),
            None => Err(FetchError::NoEndpoints(resource.to_string())),
        }
    }
}
