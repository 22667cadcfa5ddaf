use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use crate::error::{FetchError, Result};

/// Settings shared by every fetch a [`RemoteFetcher`](crate::RemoteFetcher) makes.
///
/// # Examples
///
/// ```
/// use stagefetch::FetchOptions;
/// use std::time::Duration;
///
/// let options = FetchOptions::default()
///     .staging_dir("/var/tmp/conf-download")
///     .endpoint_cooldown(Duration::from_millis(250));
/// assert_eq!(options.endpoint_cooldown, Duration::from_millis(250));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchOptions {
    /// Private directory that holds in-flight downloads.
    ///
    /// It may be shared by concurrent fetches; staging names are unique.
    ///
    /// Default: `./stagefetch/download`
    pub staging_dir: PathBuf,

    /// Pause after one endpoint is exhausted, before the next is tried.
    ///
    /// Independent of the retry policy.
    ///
    /// Default: 1s
    pub endpoint_cooldown: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            staging_dir: PathBuf::from(DEFAULT_STAGING_DIR),
            endpoint_cooldown: Duration::from_secs(1),
        }
    }
}

pub(crate) const DEFAULT_STAGING_DIR: &str = "./stagefetch/download";

impl FetchOptions {
    #[must_use]
    pub fn staging_dir(mut self, staging_dir: impl Into<PathBuf>) -> Self {
        self.staging_dir = staging_dir.into();
        self
    }

    #[must_use]
    pub fn endpoint_cooldown(mut self, cooldown: Duration) -> Self {
        self.endpoint_cooldown = cooldown;
        self
    }
}

/// A configuration file to download and install.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DownloadRequest {
    pub file_name: String,
    pub local_dir: PathBuf,
    /// Also publish a copy into the mirror base directory, when one resolves.
    pub mirror: bool,
}

impl DownloadRequest {
    pub fn new(file_name: impl Into<String>, local_dir: impl Into<PathBuf>) -> Self {
        Self {
            file_name: file_name.into(),
            local_dir: local_dir.into(),
            mirror: false,
        }
    }

    #[must_use]
    pub fn mirror(mut self, mirror: bool) -> Self {
        self.mirror = mirror;
        self
    }

    /// Where the primary copy is installed.
    pub fn primary_path(&self) -> PathBuf {
        self.local_dir.join(&self.file_name)
    }

    /// `file_name` must be one plain path component, so the primary and
    /// mirror copies stay inside their directories.
    pub fn check_file_name(&self) -> Result<()> {
        let mut components = Path::new(&self.file_name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(()),
            _ => Err(FetchError::InvalidFileName(self.file_name.clone())),
        }
    }
}

/// Whether an installed file came from this call or from an earlier one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Freshness {
    Fresh,
    /// Every endpoint failed; the file left by a previous run was kept.
    Stale,
}

/// Location of an installed file as handed back to callers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InstalledPath {
    /// The file lives under the mirror base directory.
    Relative { base: PathBuf, path: PathBuf },
    Absolute(PathBuf),
}

impl InstalledPath {
    /// A path that can be opened directly, whichever form this is.
    pub fn resolve(&self) -> PathBuf {
        match self {
            InstalledPath::Relative { base, path } => base.join(path),
            InstalledPath::Absolute(path) => path.clone(),
        }
    }

    /// The path as reported: relative to the base, or absolute.
    pub fn as_path(&self) -> &Path {
        match self {
            InstalledPath::Relative { path, .. } => path,
            InstalledPath::Absolute(path) => path,
        }
    }

    pub fn is_relative(&self) -> bool {
        matches!(self, InstalledPath::Relative { .. })
    }
}

/// Result of a successful file download.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Installed {
    pub path: InstalledPath,
    pub freshness: Freshness,
}

impl Installed {
    pub fn is_stale(&self) -> bool {
        self.freshness == Freshness::Stale
    }
}
