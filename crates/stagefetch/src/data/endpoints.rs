use std::fmt;
use url::Url;

use crate::error::{FetchError, Result};

/// Ordered, deduplicated candidate locations for one logical resource.
///
/// Order is significant: the fallback driver tries endpoints front to back.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EndpointSet {
    urls: Vec<Url>,
}

impl EndpointSet {
    /// Parse every locator, dropping repeats while keeping first-seen order.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidUrl`] for a locator that does not parse,
    /// is not `http`/`https`, or has no host. A bare `host:port/path` parses
    /// as a URL with scheme `host` and is rejected; use
    /// [`from_servers`](Self::from_servers) for that form.
    pub fn new<I, S>(urls: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::default();
        for raw in urls {
            let raw = raw.as_ref().trim();
            let url = Url::parse(raw).map_err(|source| FetchError::InvalidUrl {
                url: raw.to_string(),
                reason: source.to_string(),
                source: Some(source),
            })?;
            check_usable(raw, &url)?;
            set.push(url);
        }
        Ok(set)
    }

    /// One endpoint per server, all pointing at the same resource path.
    ///
    /// A server is either a bare `host[:port]`, which gets `http://`, or a
    /// base URL with a scheme.
    ///
    /// ```
    /// use stagefetch::EndpointSet;
    ///
    /// let set = EndpointSet::from_servers(
    ///     ["10.0.0.1:8080", "https://conf.example.com/base/"],
    ///     "/api/config/file?app=demo",
    /// ).unwrap();
    /// assert_eq!(set.len(), 2);
    /// assert_eq!(set.iter().next().unwrap().as_str(), "http://10.0.0.1:8080/api/config/file?app=demo");
    /// ```
    pub fn from_servers<I, S>(servers: I, path: &str) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let path = path.trim_start_matches('/');
        let urls = servers.into_iter().filter_map(|server| {
            let server = server.as_ref().trim().trim_end_matches('/');
            if server.is_empty() {
                return None;
            }
            let base = if server.contains("://") {
                server.to_string()
            } else {
                format!("http://{server}")
            };
            Some(format!("{base}/{path}"))
        });
        Self::new(urls)
    }

    fn push(&mut self, url: Url) {
        if !self.urls.contains(&url) {
            self.urls.push(url);
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Url> {
        self.urls.iter()
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

fn check_usable(raw: &str, url: &Url) -> Result<()> {
    let reason = if !matches!(url.scheme(), "http" | "https") {
        format!("unsupported scheme `{}`", url.scheme())
    } else if url.host_str().is_none_or(str::is_empty) {
        "missing host".to_string()
    } else {
        return Ok(());
    };
    Err(FetchError::InvalidUrl {
        url: raw.to_string(),
        reason,
        source: None,
    })
}

impl<'a> IntoIterator for &'a EndpointSet {
    type Item = &'a Url;
    type IntoIter = std::slice::Iter<'a, Url>;

    fn into_iter(self) -> Self::IntoIter {
        self.urls.iter()
    }
}

impl fmt::Display for EndpointSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        write!(f, "[")?;
        for url in &self.urls {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{url}")?;
            first = false;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_keeps_order_and_dedups() {
        let set = EndpointSet::new([
            "http://b.example.com/conf",
            "http://a.example.com/conf",
            "http://b.example.com/conf",
        ])
        .unwrap();

        let urls: Vec<_> = set.iter().map(Url::as_str).collect();
        assert_eq!(urls, ["http://b.example.com/conf", "http://a.example.com/conf"]);
    }

    #[test]
    fn test_new_rejects_invalid() {
        let err = EndpointSet::new(["not a url"]).unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl { .. }));
    }

    #[test]
    fn test_new_rejects_bare_host_port() {
        let err = EndpointSet::new(["localhost:8080/api/config/file"]).unwrap_err();
        match err {
            FetchError::InvalidUrl { url, reason, source } => {
                assert_eq!(url, "localhost:8080/api/config/file");
                assert!(reason.contains("scheme"), "{reason}");
                assert!(source.is_none());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_new_rejects_non_http() {
        for raw in ["ftp://conf.local/app.properties", "file:///etc/app.properties"] {
            let err = EndpointSet::new([raw]).unwrap_err();
            assert!(matches!(err, FetchError::InvalidUrl { .. }), "{raw}");
        }
    }

    #[test]
    fn test_new_accepts_https() {
        let set = EndpointSet::new(["https://conf.local:8443/api"]).unwrap();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_empty_is_constructible() {
        let set = EndpointSet::new(Vec::<String>::new()).unwrap();
        assert!(set.is_empty());
        assert_eq!(set.to_string(), "[]");
    }

    #[test]
    fn test_from_servers_joins_path() {
        let set = EndpointSet::from_servers(
            ["127.0.0.1:8081", " 127.0.0.1:8082/ ", "", "https://conf.local"],
            "api/config/item?key=timeout",
        )
        .unwrap();

        let urls: Vec<_> = set.iter().map(Url::as_str).collect();
        assert_eq!(
            urls,
            [
                "http://127.0.0.1:8081/api/config/item?key=timeout",
                "http://127.0.0.1:8082/api/config/item?key=timeout",
                "https://conf.local/api/config/item?key=timeout",
            ]
        );
    }

    #[test]
    fn test_display_lists_urls() {
        let set = EndpointSet::new(["http://a/x", "http://b/x"]).unwrap();
        assert_eq!(set.to_string(), "[http://a/x, http://b/x]");
    }
}
