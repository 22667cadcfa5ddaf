use std::path::{Path, PathBuf};

/// Express `path` relative to `base`, or `None` if it does not live under it.
///
/// Both paths are made absolute against the current directory first; no
/// symlinks are resolved.
pub fn relative_to(path: impl AsRef<Path>, base: impl AsRef<Path>) -> Option<PathBuf> {
    let path = std::path::absolute(path.as_ref()).ok()?;
    let base = std::path::absolute(base.as_ref()).ok()?;
    let relative = path.strip_prefix(&base).ok()?;

    if relative.as_os_str().is_empty() {
        None
    } else {
        Some(relative.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_under_base() {
        let rel = relative_to("/srv/classes/conf/app.properties", "/srv/classes");
        assert_eq!(rel, Some(PathBuf::from("conf/app.properties")));
    }

    #[test]
    fn test_relative_outside_base() {
        assert_eq!(relative_to("/srv/other/app.properties", "/srv/classes"), None);
    }

    #[test]
    fn test_relative_base_itself() {
        assert_eq!(relative_to("/srv/classes", "/srv/classes"), None);
    }

    #[test]
    fn test_relative_partial_component_is_not_prefix() {
        assert_eq!(relative_to("/srv/classes2/a.conf", "/srv/classes"), None);
    }
}
