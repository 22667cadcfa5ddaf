//! Publishing a finished download and naming the result.

use std::path::{Path, PathBuf};

use stagefetch_fs::{StagingFile, publish_copy, publish_move, relative_to};
use tracing::{debug, warn};

use crate::data::{DownloadRequest, InstalledPath};
use crate::error::{FetchError, Result};

/// Move `staged` onto the primary path, then copy it into `mirror_dir` when
/// the request asks for a mirror and one is available.
///
/// Returns the path of the copy callers should read: the mirror copy if one
/// was made, the primary otherwise. Failures are never retried.
pub(crate) fn install(
    staged: StagingFile,
    request: &DownloadRequest,
    mirror_dir: Option<&Path>,
) -> Result<PathBuf> {
    let primary = request.primary_path();
    publish_move(staged, &primary).map_err(|source| FetchError::Publish {
        path: primary.clone(),
        source,
    })?;
    debug!(file = %request.file_name, path = %primary.display(), "published primary copy");

    if !request.mirror {
        return Ok(primary);
    }

    let Some(mirror_dir) = mirror_dir else {
        warn!(file = %request.file_name, "mirror directory unavailable, skipping mirror copy");
        return Ok(primary);
    };

    let mirror = mirror_dir.join(&request.file_name);
    publish_copy(&primary, &mirror).map_err(|source| FetchError::Publish {
        path: mirror.clone(),
        source,
    })?;
    debug!(file = %request.file_name, path = %mirror.display(), "published mirror copy");

    Ok(mirror)
}

/// Relative to `base` when `installed` is a file under it, absolute otherwise.
pub(crate) fn resolve_path(installed: &Path, base: Option<&Path>) -> InstalledPath {
    if let Some(base) = base
        && let Some(relative) = relative_to(installed, base)
        && base.join(&relative).is_file()
    {
        return InstalledPath::Relative {
            base: base.to_path_buf(),
            path: relative,
        };
    }

    let absolute = std::path::absolute(installed).unwrap_or_else(|_| installed.to_path_buf());
    InstalledPath::Absolute(absolute)
}
