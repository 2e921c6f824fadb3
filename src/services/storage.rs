// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Image upload storage on the local filesystem.

use crate::error::AppError;
use std::path::{Path, PathBuf};

/// Accepted image extensions (lower-case, without the dot).
pub const ALLOWED_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

/// URL prefix the upload directory is served under.
pub const STATIC_PREFIX: &str = "/static";

/// Writes uploads under a single directory with random names.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Store `bytes` and return the public path (`/static/<name>`).
    ///
    /// Only the extension of `filename` is used; the stored name is a random
    /// UUID so client names never reach the filesystem.
    pub async fn save(&self, filename: &str, bytes: &[u8]) -> Result<String, AppError> {
        let extension = allowed_extension(filename)?;
        let name = format!("{}.{}", uuid::Uuid::new_v4().simple(), extension);

        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            AppError::Internal(anyhow::anyhow!(
                "Failed to create upload dir {}: {}",
                self.dir.display(),
                e
            ))
        })?;

        tokio::fs::write(self.dir.join(&name), bytes)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to write upload: {}", e)))?;

        tracing::info!(file = %name, size = bytes.len(), "Stored upload");
        Ok(format!("{}/{}", STATIC_PREFIX, name))
    }
}

/// Lower-cased extension of `filename` if it is an accepted image type.
pub fn allowed_extension(filename: &str) -> Result<String, AppError> {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .filter(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
        .ok_or_else(|| AppError::BadRequest("Unsupported file format".to_string()))
}
