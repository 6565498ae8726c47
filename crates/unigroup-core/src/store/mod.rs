// ── Group store persistence ──
//
// A single JSON document, rewritten whole on every save. Reads are
// forgiving: a missing file is an empty store and a corrupted one is
// logged and discarded. There is no locking; concurrent writers race
// and the last rename wins.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::GroupError;
use crate::model::GroupsDocument;

/// File-backed storage for the groups document.
#[derive(Debug, Clone)]
pub struct GroupStore {
    path: PathBuf,
}

impl GroupStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the document from disk.
    ///
    /// Missing file and unparseable content both yield an empty document.
    /// Other I/O failures (permissions, a directory in the way) propagate.
    pub fn load(&self) -> Result<GroupsDocument, GroupError> {
        let raw = match std::fs::read(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no groups file, starting empty");
                return Ok(GroupsDocument::default());
            }
            Err(err) => return Err(err.into()),
        };

        // Invalid UTF-8 is a parse failure here, not an I/O error.
        match serde_json::from_slice::<GroupsDocument>(&raw) {
            Ok(doc) => {
                debug!(
                    path = %self.path.display(),
                    groups = doc.groups.len(),
                    "loaded groups file"
                );
                Ok(doc)
            }
            Err(err) => {
                warn!(
                    path = %self.path.display(),
                    error = %err,
                    "groups file is corrupted, starting from an empty store"
                );
                Ok(GroupsDocument::default())
            }
        }
    }

    /// Write the full document, replacing the file atomically.
    pub fn save(&self, doc: &GroupsDocument) -> Result<(), GroupError> {
        let parent = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent)?;

        let mut body = serde_json::to_string_pretty(doc)?;
        body.push('\n');

        let mut tmp = NamedTempFile::new_in(parent)?;
        tmp.write_all(body.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|err| err.error)?;

        debug!(
            path = %self.path.display(),
            groups = doc.groups.len(),
            "saved groups file"
        );
        Ok(())
    }
}
