// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! On-disk cache of raw encoded polylines, one file per activity.
//!
//! Records are never invalidated, expired or evicted: an activity's route is
//! assumed not to change once recorded, so the directory grows by one file
//! per activity ever fetched. Delete the directory to start over.

use crate::error::AppError;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// File-backed polyline cache keyed by Strava activity ID.
#[derive(Debug, Clone)]
pub struct PolylineCache {
    dir: PathBuf,
}

impl PolylineCache {
    /// Open the cache rooted at `dir`, creating the directory if needed.
    pub async fn open<P: AsRef<Path>>(dir: P) -> std::io::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&dir).await?;
        tracing::info!(path = %dir.display(), "Polyline cache ready");
        Ok(Self { dir })
    }

    /// Cache directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the record for an activity (`<dir>/<id>.cache`).
    pub fn path_for(&self, activity_id: u64) -> PathBuf {
        self.dir.join(format!("{}.cache", activity_id))
    }

    /// Whether a record exists for the activity.
    pub async fn exists(&self, activity_id: u64) -> bool {
        tokio::fs::try_exists(self.path_for(activity_id))
            .await
            .unwrap_or(false)
    }

    /// Read the raw polyline bytes for the activity.
    pub async fn read(&self, activity_id: u64) -> Result<Vec<u8>, AppError> {
        tokio::fs::read(self.path_for(activity_id))
            .await
            .map_err(|source| AppError::CacheRead {
                activity_id,
                source,
            })
    }

    /// Persist the raw polyline bytes for the activity.
    ///
    /// The bytes go to `<id>.cache.tmp` first and are renamed into place only
    /// after a complete write, so a failed write never leaves a record that
    /// `exists` would report. The file handle is flushed and released before
    /// the rename.
    pub async fn write(&self, activity_id: u64, polyline: &[u8]) -> Result<(), AppError> {
        let path = self.path_for(activity_id);
        let tmp = self.dir.join(format!("{}.cache.tmp", activity_id));

        let written = match write_file(&tmp, polyline).await {
            Ok(()) => tokio::fs::rename(&tmp, &path).await,
            Err(e) => Err(e),
        };

        if let Err(source) = written {
            // Fails harmlessly when the temp file was never created.
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(AppError::CacheWrite {
                activity_id,
                source,
            });
        }

        tracing::debug!(activity_id, bytes = polyline.len(), "Cached polyline");
        Ok(())
    }
}

async fn write_file(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut file = tokio::fs::File::create(path).await?;
    file.write_all(contents).await?;
    file.flush().await?;
    Ok(())
}
