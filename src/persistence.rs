//! Snapshot Persistence
//!
//! Saves and restores the whole key/entry mapping as JSON. Values keep their
//! runtime type through their serde representation; for [`Value`](crate::Value)
//! every payload carries its variant tag.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::cache::{Cache, Entry};
use crate::error::{CacheError, Result};

impl<V> Cache<V>
where
    V: Clone + Send + Sync + Serialize + DeserializeOwned + 'static,
{
    // == Save ==
    /// Writes a snapshot of every entry to `sink`.
    ///
    /// The read lock is held until encoding finishes, so the snapshot is
    /// consistent but writers wait. On error the sink may hold a partial
    /// stream that must be discarded.
    pub async fn save<W: Write>(&self, sink: W) -> Result<()> {
        let store = self.shared.store.read().await;
        serde_json::to_writer(sink, store.entries()).map_err(CacheError::EncodeFailure)
    }

    // == Load ==
    /// Decodes a snapshot from `source` and merges it into the cache.
    ///
    /// Decoding happens before any lock is taken; a malformed stream leaves
    /// the cache untouched. Decoded entries only replace keys that are absent
    /// or expired. Returns the number of live entries installed.
    pub async fn load<R: Read>(&self, source: R) -> Result<usize> {
        let incoming: HashMap<String, Entry<V>> =
            serde_json::from_reader(source).map_err(CacheError::DecodeFailure)?;

        let mut store = self.shared.store.write().await;
        Ok(store.merge(incoming))
    }

    /// Saves a snapshot to `path`, creating or truncating the file.
    pub async fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut file = tokio::fs::File::create(path).await?;

        let mut buf = Vec::new();
        self.save(&mut buf).await?;

        file.write_all(&buf).await?;
        file.flush().await?;
        file.sync_all().await?;

        info!(path = %path.display(), bytes = buf.len(), "Snapshot saved");
        Ok(())
    }

    /// Loads and merges a snapshot from an existing file at `path`.
    pub async fn load_from_file(&self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;

        let installed = self.load(bytes.as_slice()).await?;
        info!(path = %path.display(), installed, "Snapshot loaded");
        Ok(installed)
    }
}
