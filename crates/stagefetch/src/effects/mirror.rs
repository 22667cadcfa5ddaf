use std::path::PathBuf;

/// Supplies the optional secondary base directory.
///
/// Downloaded files may be mirrored into it, and returned paths are made
/// relative to it when the installed file lives underneath. `None` means the
/// base is unavailable and mirroring is skipped.
pub trait MirrorResolver: Send + Sync {
    fn mirror_dir(&self) -> Option<PathBuf>;
}

/// No secondary location.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoMirror;

impl MirrorResolver for NoMirror {
    fn mirror_dir(&self) -> Option<PathBuf> {
        None
    }
}

impl MirrorResolver for Option<PathBuf> {
    fn mirror_dir(&self) -> Option<PathBuf> {
        self.clone()
    }
}

impl MirrorResolver for PathBuf {
    fn mirror_dir(&self) -> Option<PathBuf> {
        Some(self.clone())
    }
}

/// Reads the base directory from an environment variable on every call.
///
/// Unset, empty, or pointing at something that is not a directory all count
/// as unavailable.
#[derive(Clone, Debug)]
pub struct EnvMirror {
    var: String,
}

impl EnvMirror {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl MirrorResolver for EnvMirror {
    fn mirror_dir(&self) -> Option<PathBuf> {
        let dir = std::env::var_os(&self.var).filter(|v| !v.is_empty())?;
        let dir = PathBuf::from(dir);
        dir.is_dir().then_some(dir)
    }
}
