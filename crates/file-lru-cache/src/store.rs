//! Filesystem access for identifier-named entry files
//!
//! The directory is the only source of truth: nothing here caches listings
//! or metadata between calls.

use crate::error::{CacheError, Result};
use crate::hasher::is_identifier;
use crate::types::EntryInfo;
use chrono::{DateTime, Utc};
use std::fs::{self, File, FileTimes, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Entry files stored directly under a root directory
#[derive(Debug, Clone)]
pub struct EntryStore {
    root: PathBuf,
}

impl EntryStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file backing an identifier
    pub fn path(&self, id: &str) -> PathBuf {
        self.root.join(id)
    }

    /// Create the root directory and any missing parents
    pub fn create_root(&self) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        Ok(())
    }

    /// Create or overwrite the entry file with exactly `data`
    pub fn write(&self, id: &str, data: &[u8]) -> Result<()> {
        let mut file = File::create(self.path(id))?;
        file.write_all(data)?;
        Ok(())
    }

    /// Read an entry into `buf`, returning the payload length.
    ///
    /// Fails with an `InvalidInput` I/O error when the payload does not fit.
    pub fn read_into(&self, id: &str, buf: &mut [u8]) -> Result<usize> {
        let mut file = File::open(self.path(id)).map_err(CacheError::from_lookup)?;
        let len = payload_len(&file)?;
        if len > buf.len() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "buffer of {} bytes is too small for a {} byte entry",
                    buf.len(),
                    len
                ),
            )
            .into());
        }
        file.read_exact(&mut buf[..len])?;
        Ok(len)
    }

    /// Read an entry into a freshly allocated buffer
    pub fn read(&self, id: &str) -> Result<Vec<u8>> {
        let mut file = File::open(self.path(id)).map_err(CacheError::from_lookup)?;
        let mut data = Vec::with_capacity(payload_len(&file)?);
        file.read_to_end(&mut data)?;
        Ok(data)
    }

    /// Delete an entry file; an absent entry is `NotFound`
    pub fn remove(&self, id: &str) -> Result<()> {
        fs::remove_file(self.path(id)).map_err(CacheError::from_lookup)
    }

    /// Set the entry's access and modification times to now
    pub fn touch(&self, id: &str) -> Result<()> {
        let file = OpenOptions::new()
            .write(true)
            .open(self.path(id))
            .map_err(CacheError::from_lookup)?;
        let now = SystemTime::now();
        file.set_times(FileTimes::new().set_accessed(now).set_modified(now))?;
        Ok(())
    }

    /// Enumerate every entry currently present, in directory order.
    ///
    /// Only regular files named like identifiers count as entries.
    pub fn list(&self) -> Result<Vec<EntryInfo>> {
        let mut entries = Vec::new();
        for dir_entry in fs::read_dir(&self.root)? {
            let dir_entry = dir_entry?;
            let name = dir_entry.file_name();
            let Some(id) = name.to_str().filter(|n| is_identifier(n)) else {
                continue;
            };

            let metadata = match dir_entry.metadata() {
                Ok(metadata) => metadata,
                // Removed between listing and stat
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };
            if !metadata.is_file() {
                continue;
            }

            entries.push(EntryInfo {
                id: id.to_string(),
                path: dir_entry.path(),
                size: metadata.len(),
                modified: DateTime::<Utc>::from(metadata.modified()?),
            });
        }
        Ok(entries)
    }

    /// Delete everything inside the root directory. The root itself is kept
    /// (or recreated if missing), so its links, mode and owner survive.
    pub fn remove_all(&self) -> Result<()> {
        let children = match fs::read_dir(&self.root) {
            Ok(children) => children,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return self.create_root(),
            Err(e) => return Err(e.into()),
        };

        for child in children {
            let child = child?;
            // Does not follow symlinks: a linked directory loses only the link
            let result = if child.file_type()?.is_dir() {
                fs::remove_dir_all(child.path())
            } else {
                fs::remove_file(child.path())
            };
            match result {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        self.create_root()
    }
}

fn payload_len(file: &File) -> Result<usize> {
    let len = file.metadata()?.len();
    usize::try_from(len).map_err(|_| {
        CacheError::from(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("entry of {} bytes does not fit in memory", len),
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hasher::identifier;
    use std::time::Duration;
    use tempfile::tempdir;

    fn store_in(dir: &Path) -> EntryStore {
        let store = EntryStore::new(dir.join("entries"));
        store.create_root().unwrap();
        store
    }

    #[test]
    fn test_write_and_read() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());
        let id = identifier("key");

        store.write(&id, b"hello world").unwrap();
        assert_eq!(store.read(&id).unwrap(), b"hello world");

        let mut buf = [0u8; 32];
        let len = store.read_into(&id, &mut buf).unwrap();
        assert_eq!(&buf[..len], b"hello world");
    }

    #[test]
    fn test_write_overwrites() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());
        let id = identifier("key");

        store.write(&id, b"a much longer first payload").unwrap();
        store.write(&id, b"short").unwrap();
        assert_eq!(store.read(&id).unwrap(), b"short");
    }

    #[test]
    fn test_file_content_is_verbatim() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());
        let id = identifier("key");

        store.write(&id, &[0, 1, 2, 255]).unwrap();
        assert_eq!(fs::read(store.path(&id)).unwrap(), vec![0, 1, 2, 255]);
    }

    #[test]
    fn test_read_missing_is_not_found() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());
        let id = identifier("missing");

        assert!(store.read(&id).unwrap_err().is_not_found());
        assert!(store.read_into(&id, &mut [0u8; 4]).unwrap_err().is_not_found());
    }

    #[test]
    fn test_read_into_small_buffer_is_io_error() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());
        let id = identifier("key");
        store.write(&id, b"0123456789").unwrap();

        let err = store.read_into(&id, &mut [0u8; 4]).unwrap_err();
        match err {
            CacheError::Io(e) => assert_eq!(e.kind(), io::ErrorKind::InvalidInput),
            other => panic!("expected IO error, got {:?}", other),
        }
    }

    #[test]
    fn test_remove() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());
        let id = identifier("key");
        store.write(&id, b"data").unwrap();

        store.remove(&id).unwrap();
        assert!(store.read(&id).unwrap_err().is_not_found());
        assert!(store.remove(&id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_touch_advances_modified_time() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());
        let id = identifier("key");
        store.write(&id, b"data").unwrap();

        let old = SystemTime::now() - Duration::from_secs(3600);
        File::options()
            .write(true)
            .open(store.path(&id))
            .unwrap()
            .set_modified(old)
            .unwrap();

        store.touch(&id).unwrap();
        let modified = fs::metadata(store.path(&id)).unwrap().modified().unwrap();
        assert!(modified > old + Duration::from_secs(3000));
        assert!(store.touch(&identifier("missing")).unwrap_err().is_not_found());
    }

    #[test]
    fn test_list_skips_foreign_files() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());
        store.write(&identifier("a"), b"1").unwrap();
        store.write(&identifier("b"), b"22").unwrap();
        fs::write(store.root().join("README"), b"not an entry").unwrap();
        fs::create_dir(store.root().join(identifier("dir"))).unwrap();

        let mut ids: Vec<_> = store.list().unwrap().into_iter().map(|e| e.id).collect();
        ids.sort();
        let mut expected = vec![identifier("a"), identifier("b")];
        expected.sort();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_remove_all_keeps_root() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());
        store.write(&identifier("a"), b"1").unwrap();
        store.write(&identifier("b"), b"2").unwrap();

        store.remove_all().unwrap();
        assert!(store.root().is_dir());
        assert!(store.list().unwrap().is_empty());

        store.write(&identifier("c"), b"3").unwrap();
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn test_remove_all_removes_foreign_children() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());
        fs::write(store.root().join("README"), b"x").unwrap();
        fs::create_dir_all(store.root().join("sub").join("deeper")).unwrap();

        store.remove_all().unwrap();
        assert_eq!(fs::read_dir(store.root()).unwrap().count(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_remove_all_through_symlinked_root() {
        let dir = tempdir().unwrap();
        let real = dir.path().join("real");
        let link = dir.path().join("link");
        fs::create_dir(&real).unwrap();
        std::os::unix::fs::symlink(&real, &link).unwrap();

        let store = EntryStore::new(link.clone());
        store.write(&identifier("a"), b"1").unwrap();
        store.remove_all().unwrap();

        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(fs::read_dir(&real).unwrap().count(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_remove_all_keeps_root_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let store = store_in(dir.path());
        fs::set_permissions(store.root(), fs::Permissions::from_mode(0o700)).unwrap();
        store.write(&identifier("a"), b"1").unwrap();

        store.remove_all().unwrap();
        let mode = fs::metadata(store.root()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o700);
    }
}
