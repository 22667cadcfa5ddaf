use crate::primitives::StagingFile;
use crate::{Error, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Make a staged file visible at `destination` by renaming it into place.
///
/// When the staging directory and the destination are on different volumes
/// the file is copied next to the destination first and then renamed, so the
/// destination is never truncated and rewritten in place.
pub fn publish_move(staged: StagingFile, destination: impl AsRef<Path>) -> Result<()> {
    move_with(staged, destination.as_ref(), |from, to| fs::rename(from, to))
}

/// `publish_move` with the first rename supplied by the caller.
///
/// On the cross-device path the staged file is left for `staged`'s drop to
/// remove once the copy is in place.
fn move_with<F>(staged: StagingFile, destination: &Path, rename: F) -> Result<()>
where
    F: FnOnce(&Path, &Path) -> std::io::Result<()>,
{
    ensure_parent(destination)?;

    match rename(staged.path(), destination) {
        Ok(()) => {
            staged.consume();
            Ok(())
        }
        Err(e) if crosses_devices(&e) => copy_then_rename(staged.path(), destination),
        Err(source) => Err(Error::Rename {
            from: staged.path().to_path_buf(),
            to: destination.to_path_buf(),
            source,
        }),
    }
}

/// Atomically replace `destination` with a copy of `src`. `src` is untouched.
pub fn publish_copy(src: impl AsRef<Path>, destination: impl AsRef<Path>) -> Result<()> {
    let destination = destination.as_ref();
    ensure_parent(destination)?;
    copy_then_rename(src.as_ref(), destination)
}

fn copy_then_rename(src: &Path, destination: &Path) -> Result<()> {
    let tmp_path = sibling_tmp(destination)?;

    fs::copy(src, &tmp_path).map_err(|source| {
        let _ = fs::remove_file(&tmp_path);
        Error::Copy {
            from: src.to_path_buf(),
            to: tmp_path.clone(),
            source,
        }
    })?;

    let synced = fs::File::open(&tmp_path).and_then(|file| file.sync_all());
    if let Err(source) = synced {
        let _ = fs::remove_file(&tmp_path);
        return Err(Error::Write {
            path: tmp_path,
            source,
        });
    }

    fs::rename(&tmp_path, destination).map_err(|source| {
        let _ = fs::remove_file(&tmp_path);
        Error::Rename {
            from: tmp_path.clone(),
            to: destination.to_path_buf(),
            source,
        }
    })
}

fn sibling_tmp(destination: &Path) -> Result<PathBuf> {
    let name = destination.file_name().ok_or_else(|| Error::NoFileName {
        path: destination.to_path_buf(),
    })?;
    let tmp_name = format!(
        ".{}.{}.tmp",
        name.to_string_lossy(),
        uuid::Uuid::new_v4().simple()
    );
    Ok(parent_dir(destination).join(tmp_name))
}

fn ensure_parent(destination: &Path) -> Result<()> {
    let parent = parent_dir(destination);
    if !parent.exists() {
        fs::create_dir_all(parent).map_err(Error::write(parent))?;
    }
    Ok(())
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

// EXDEV is 18 on Linux and macOS.
fn crosses_devices(e: &std::io::Error) -> bool {
    e.kind() == ErrorKind::CrossesDevices || e.raw_os_error() == Some(18)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn leftover_tmp_files(dir: &Path) -> usize {
        fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .count()
    }

    #[test]
    fn test_publish_move_replaces_destination() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("conf").join("app.properties");
        fs::create_dir_all(dest.parent().unwrap()).unwrap();
        fs::write(&dest, "old=1").unwrap();

        let staged = StagingFile::new(dir.path().join("staging"), "app.properties").unwrap();
        fs::write(staged.path(), "new=2").unwrap();
        let staged_path = staged.path().to_path_buf();

        publish_move(staged, &dest).unwrap();

        assert_eq!(fs::read_to_string(&dest).unwrap(), "new=2");
        assert!(!staged_path.exists());
    }

    #[test]
    fn test_publish_move_creates_parent() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("a").join("b").join("redis.conf");
        let staged = StagingFile::new(dir.path().join("staging"), "redis.conf").unwrap();
        fs::write(staged.path(), "port 6379").unwrap();

        publish_move(staged, &dest).unwrap();
        assert_eq!(fs::read_to_string(&dest).unwrap(), "port 6379");
    }

    #[test]
    fn test_publish_move_missing_source_is_rename_error() {
        let dir = tempdir().unwrap();
        let staged = StagingFile::new(dir.path().join("staging"), "missing.conf").unwrap();
        let err = publish_move(staged, dir.path().join("missing.conf")).unwrap_err();
        assert!(matches!(err, Error::Rename { .. }));
        assert!(!dir.path().join("missing.conf").exists());
    }

    #[test]
    fn test_publish_copy_keeps_source() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("primary.conf");
        let dest = dir.path().join("mirror").join("primary.conf");
        fs::write(&src, "k=v").unwrap();

        publish_copy(&src, &dest).unwrap();

        assert_eq!(fs::read_to_string(&src).unwrap(), "k=v");
        assert_eq!(fs::read_to_string(&dest).unwrap(), "k=v");
        assert_eq!(leftover_tmp_files(dest.parent().unwrap()), 0);
    }

    #[test]
    fn test_copy_then_rename_failure_leaves_destination() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("app.properties");
        fs::write(&dest, "old").unwrap();

        let err = copy_then_rename(&dir.path().join("nope"), &dest).unwrap_err();
        assert!(matches!(err, Error::Copy { .. }));
        assert_eq!(fs::read_to_string(&dest).unwrap(), "old");
        assert_eq!(leftover_tmp_files(dir.path()), 0);
    }

    fn exdev(_: &Path, _: &Path) -> std::io::Result<()> {
        Err(std::io::Error::from_raw_os_error(18))
    }

    #[test]
    fn test_crosses_devices_detection() {
        assert!(crosses_devices(&std::io::Error::from_raw_os_error(18)));
        assert!(crosses_devices(&std::io::Error::from(ErrorKind::CrossesDevices)));
        assert!(!crosses_devices(&std::io::Error::from(ErrorKind::PermissionDenied)));
    }

    #[test]
    fn test_move_across_devices_copies_then_renames() {
        let dir = tempdir().unwrap();
        let dest_dir = dir.path().join("conf");
        let dest = dest_dir.join("app.properties");
        fs::create_dir_all(&dest_dir).unwrap();
        fs::write(&dest, "old=1").unwrap();

        let staged = StagingFile::new(dir.path().join("staging"), "app.properties").unwrap();
        fs::write(staged.path(), "new=2").unwrap();
        let staged_path = staged.path().to_path_buf();

        move_with(staged, &dest, exdev).unwrap();

        assert_eq!(fs::read_to_string(&dest).unwrap(), "new=2");
        assert!(!staged_path.exists());
        assert_eq!(leftover_tmp_files(&dest_dir), 0);
        assert_eq!(leftover_tmp_files(&dir.path().join("staging")), 0);
    }

    #[test]
    fn test_move_across_devices_failure_keeps_destination() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("app.properties");
        fs::write(&dest, "old=1").unwrap();

        // never written, so the fallback copy has nothing to read
        let staged = StagingFile::new(dir.path().join("staging"), "app.properties").unwrap();
        let staged_path = staged.path().to_path_buf();

        let err = move_with(staged, &dest, exdev).unwrap_err();

        assert!(matches!(err, Error::Copy { .. }));
        assert_eq!(fs::read_to_string(&dest).unwrap(), "old=1");
        assert!(!staged_path.exists());
        assert_eq!(leftover_tmp_files(dir.path()), 0);
    }

    #[test]
    fn test_other_rename_errors_are_not_retried_as_copy() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("app.properties");
        let staged = StagingFile::new(dir.path().join("staging"), "app.properties").unwrap();
        fs::write(staged.path(), "new=2").unwrap();

        let err = move_with(staged, &dest, |_, _| {
            Err(std::io::Error::from(ErrorKind::PermissionDenied))
        })
        .unwrap_err();

        assert!(matches!(err, Error::Rename { .. }));
        assert!(!dest.exists());
    }

    #[test]
    fn test_parent_dir_of_bare_name() {
        assert_eq!(parent_dir(Path::new("app.properties")), Path::new("."));
        assert_eq!(parent_dir(Path::new("conf/app.properties")), Path::new("conf"));
    }
}
