use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// A uniquely named file inside a private staging directory.
///
/// The name is the target file name followed by a random v4 UUID, so
/// concurrent downloads of the same logical file never share a path. The
/// file is removed when the record is dropped, unless [`publish_move`]
/// consumed it.
///
/// [`publish_move`]: crate::publish_move
#[derive(Debug)]
pub struct StagingFile {
    path: PathBuf,
    consumed: bool,
}

impl StagingFile {
    /// Reserve a staging path for `file_name` under `staging_dir`.
    ///
    /// The directory is created if missing. The file itself is not created.
    pub fn new(staging_dir: impl AsRef<Path>, file_name: impl AsRef<Path>) -> Result<Self> {
        let staging_dir = staging_dir.as_ref();
        let file_name = file_name.as_ref();
        let base = file_name.file_name().ok_or_else(|| Error::NoFileName {
            path: file_name.to_path_buf(),
        })?;

        if !staging_dir.exists() {
            std::fs::create_dir_all(staging_dir).map_err(Error::write(staging_dir))?;
        }

        let unique = format!(
            "{}.{}.tmp",
            base.to_string_lossy(),
            uuid::Uuid::new_v4().simple()
        );

        Ok(Self {
            path: staging_dir.join(unique),
            consumed: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn consume(mut self) {
        self.consumed = true;
    }
}

impl Drop for StagingFile {
    fn drop(&mut self) {
        if !self.consumed {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}
