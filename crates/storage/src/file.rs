//! On-disk blob store
//!
//! One file per key under `<root>/<namespace>/`. Writes go to a temporary
//! sibling first and are moved into place with a rename, so a crash mid-write
//! leaves the previous blob intact. Keys are sanitized to a conservative
//! filename alphabet before touching the filesystem.
//!
//! Read failures degrade to "absent" rather than erroring, matching the
//! loader policy of the record store: a local-only document favors
//! availability over strict durability. Write failures do surface.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::BlobStore;
use stitchbook_core::{Error, Result};

/// Disk-backed `BlobStore` implementation.
#[derive(Debug)]
pub struct FileBlobStore {
    dir: PathBuf,
}

impl FileBlobStore {
    /// Open (creating if needed) the namespace directory under `root`.
    ///
    /// # Errors
    /// Returns `Error::Io` when the directory cannot be created.
    pub fn open(root: impl AsRef<Path>, namespace: &str) -> Result<Self> {
        let dir = root.as_ref().join(sanitize(namespace));
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Directory this store reads and writes.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize(key)))
    }
}

// Conservative filename alphabet: alphanumerics, '-', '_'. Everything else
// becomes '_'. Collisions between pathological keys are acceptable; real
// keys are fixed identifiers like "stitchbook_data".
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

impl BlobStore for FileBlobStore {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(blob) => Some(blob),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
            Err(err) => {
                warn!(
                    target: "stitchbook::storage",
                    key,
                    %err,
                    "blob unreadable, treating as absent"
                );
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)
            .and_then(|()| fs::rename(&tmp, &path))
            .map_err(|err| Error::Storage(format!("write {}: {}", path.display(), err)))
    }

    fn delete(&self, key: &str) {
        let _ = fs::remove_file(self.path_for(key));
    }

    fn contains(&self, key: &str) -> bool {
        self.path_for(key).exists()
    }
}
