//! Flat-file persistence for mood entries.
//!
//! The whole collection is read and rewritten on every operation. There is
//! no locking: one local user, one writer.

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;

use crate::models::mood::{MoodCollection, MoodEntry};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed mood data in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode mood data: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("{path} is not a writable directory")]
    NotWritable { path: PathBuf },
}

impl StoreError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}

#[derive(Debug, Clone)]
pub struct MoodStore {
    path: PathBuf,
}

impl MoodStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored entries, or an empty collection when the file is missing or
    /// can't be parsed.
    pub async fn load_all(&self) -> MoodCollection {
        match self.try_load().await {
            Ok(collection) => collection,
            Err(e) if e.is_not_found() => {
                tracing::debug!(path = %self.path.display(), "No mood data yet");
                MoodCollection::default()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Unreadable mood data, starting from empty");
                MoodCollection::default()
            }
        }
    }

    pub async fn try_load(&self) -> Result<MoodCollection, StoreError> {
        let raw = fs::read(&self.path)
            .await
            .map_err(|e| StoreError::io(&self.path, e))?;

        serde_json::from_slice(&raw).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    /// Replaces the file with `collection`. Written to a sibling temp file
    /// first, then renamed into place.
    pub async fn save(&self, collection: &MoodCollection) -> Result<(), StoreError> {
        let encoded = serde_json::to_vec_pretty(collection).map_err(StoreError::Encode)?;

        if let Some(parent) = parent_dir(&self.path) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::io(parent, e))?;
        }

        let tmp = self.tmp_path();
        fs::write(&tmp, &encoded)
            .await
            .map_err(|e| StoreError::io(&tmp, e))?;
        fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| StoreError::io(&self.path, e))?;

        Ok(())
    }

    pub async fn append_and_save(&self, entry: MoodEntry) -> Result<(), StoreError> {
        self.append_with(|_| Ok::<_, StoreError>(entry))
            .await
            .map(|_| ())
    }

    /// Loads the collection, lets `build` derive the new entry from it,
    /// appends, saves and hands the entry back. Nothing is written when
    /// `build` fails.
    pub async fn append_with<F, E>(&self, build: F) -> Result<MoodEntry, E>
    where
        F: FnOnce(&MoodCollection) -> Result<MoodEntry, E>,
        E: From<StoreError>,
    {
        let mut collection = self.load_all().await;
        let entry = build(&collection)?;
        collection.entries.push(entry.clone());
        self.save(&collection).await?;

        tracing::debug!(id = %entry.id, total = collection.len(), "Saved mood entry");
        Ok(entry)
    }

    /// Whether a save could succeed: the closest existing ancestor of the
    /// data file must be a directory that isn't read-only. Touches nothing
    /// on disk.
    pub async fn check_writable_dir(&self) -> Result<(), StoreError> {
        let cwd = Path::new(".");
        let mut dir = parent_dir(&self.path).unwrap_or(cwd);

        loop {
            match fs::metadata(dir).await {
                Ok(meta) if meta.is_dir() && !meta.permissions().readonly() => return Ok(()),
                Ok(_) => {
                    return Err(StoreError::NotWritable {
                        path: dir.to_path_buf(),
                    })
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound && dir != cwd => {
                    dir = parent_dir(dir).unwrap_or(cwd);
                }
                Err(e) => return Err(StoreError::io(dir, e)),
            }
        }
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "moods.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

fn parent_dir(path: &Path) -> Option<&Path> {
    path.parent().filter(|p| !p.as_os_str().is_empty())
}
