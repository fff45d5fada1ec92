// SPDX-License-Identifier: LGPL-2.1-or-later
// Copyright (C) 2025 Shahzad A. Bhatti <bhatti@plexobject.com>
//
// This file is part of PlexGallery.
//
// PlexGallery is free software: you can redistribute it and/or modify
// it under the terms of the GNU Lesser General Public License as published by
// the Free Software Foundation, either version 2.1 of the License, or
// (at your option) any later version.
//
// PlexGallery is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Lesser General Public License for more details.
//
// You should have received a copy of the GNU Lesser General Public License
// along with PlexGallery. If not, see <https://www.gnu.org/licenses/>.

//! Blob store gateway implementation

use bytes::Bytes;
use chrono::Duration;
use object_store::{
    aws::AmazonS3Builder, local::LocalFileSystem, path::Path as ObjectPath, ObjectStore,
};
use std::sync::Arc;
use tracing::{debug, warn};
use ulid::Ulid;

use crate::{BlobConfig, BlobError, BlobResult};

/// Extension appended to object keys when the source filename has none
const DEFAULT_EXTENSION: &str = ".jpg";

/// Blob store gateway
///
/// Cheap to clone via the shared backend handle; safe for concurrent use.
pub struct BlobStore {
    config: BlobConfig,
    object_store: Arc<dyn ObjectStore>,
}

impl BlobStore {
    /// Create a gateway with a custom object store (for testing)
    pub fn with_object_store(config: BlobConfig, object_store: Arc<dyn ObjectStore>) -> Self {
        let prefix = if config.prefix.is_empty() {
            "plexgallery".to_string()
        } else {
            config.prefix.clone()
        };
        let mut config_with_prefix = config;
        config_with_prefix.prefix = prefix;

        Self {
            config: config_with_prefix,
            object_store,
        }
    }

    /// Create a gateway from configuration
    pub fn new(config: BlobConfig) -> BlobResult<Self> {
        config.validate().map_err(BlobError::ConfigError)?;

        let object_store: Arc<dyn ObjectStore> = match config.backend.as_str() {
            "s3" => {
                let mut builder = AmazonS3Builder::new().with_bucket_name(&config.bucket);

                if let Some(region) = &config.region {
                    builder = builder.with_region(region);
                }

                if let Some(access_key_id) = config.get_access_key_id() {
                    builder = builder.with_access_key_id(&access_key_id);
                }

                if let Some(secret_access_key) = config.get_secret_access_key() {
                    builder = builder.with_secret_access_key(&secret_access_key);
                }

                Arc::new(builder.build().map_err(|e| {
                    BlobError::ConfigError(format!("Failed to build S3 store: {}", e))
                })?)
            }
            "minio" => {
                let endpoint = config.endpoint.clone().ok_or_else(|| {
                    BlobError::ConfigError("endpoint required for MinIO".to_string())
                })?;

                let mut builder = AmazonS3Builder::new()
                    .with_bucket_name(&config.bucket)
                    .with_endpoint(&endpoint)
                    .with_allow_http(!config.use_ssl);

                if let Some(access_key_id) = config.get_access_key_id() {
                    builder = builder.with_access_key_id(&access_key_id);
                }

                if let Some(secret_access_key) = config.get_secret_access_key() {
                    builder = builder.with_secret_access_key(&secret_access_key);
                }

                Arc::new(builder.build().map_err(|e| {
                    BlobError::ConfigError(format!("Failed to build MinIO store: {}", e))
                })?)
            }
            "local" => {
                // Local filesystem for testing
                Arc::new(LocalFileSystem::new_with_prefix("/").map_err(|e| {
                    BlobError::ConfigError(format!(
                        "Failed to create local filesystem store: {}",
                        e
                    ))
                })?)
            }
            _ => {
                return Err(BlobError::ConfigError(format!(
                    "Unsupported backend: {}",
                    config.backend
                )))
            }
        };

        Ok(Self::with_object_store(config, object_store))
    }

    /// Generate a collision-resistant object key for an upload
    ///
    /// ULID plus the lowercased extension of the original filename, falling
    /// back to `.jpg` when the source name has none.
    pub fn object_key(original_filename: Option<&str>) -> String {
        let extension = original_filename
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .map(|ext| format!(".{}", ext))
            .unwrap_or_else(|| DEFAULT_EXTENSION.to_string());

        format!("{}{}", Ulid::new().to_string().to_lowercase(), extension)
    }

    /// Storage path for a key: {prefix}/{key}
    pub fn storage_path(&self, key: &str) -> String {
        format!("{}/{}", self.config.prefix.trim_matches('/'), key)
    }

    /// Upload a blob
    ///
    /// Failures are surfaced to the caller; an upload with no stored blob
    /// must never produce metadata.
    pub async fn put(&self, key: &str, data: Bytes, content_type: &str) -> BlobResult<()> {
        if data.is_empty() {
            return Err(BlobError::InvalidInput("data cannot be empty".to_string()));
        }

        let path = ObjectPath::from(self.storage_path(key));
        let size = data.len();

        self.object_store
            .put(&path, data.into())
            .await
            .map_err(|e| BlobError::StorageError(format!("Failed to upload blob: {}", e)))?;

        debug!(key, content_type, size, "blob stored");
        Ok(())
    }

    /// Delete a blob
    ///
    /// Deleting an already-absent key is Ok; only genuine I/O failures are
    /// surfaced.
    pub async fn delete(&self, key: &str) -> BlobResult<()> {
        let path = ObjectPath::from(self.storage_path(key));

        match self.object_store.delete(&path).await {
            Ok(()) => {
                debug!(key, "blob deleted");
                Ok(())
            }
            Err(object_store::Error::NotFound { .. }) => {
                debug!(key, "blob already absent on delete");
                Ok(())
            }
            Err(e) => Err(BlobError::StorageError(format!(
                "Failed to delete blob: {}",
                e
            ))),
        }
    }

    /// Whether a blob exists for the key
    pub async fn exists(&self, key: &str) -> BlobResult<bool> {
        let path = ObjectPath::from(self.storage_path(key));

        match self.object_store.head(&path).await {
            Ok(_) => Ok(true),
            Err(object_store::Error::NotFound { .. }) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Generate a time-limited presigned GET URL for a blob
    ///
    /// Returns None when signing is unavailable or fails; the failure is
    /// logged, never surfaced. Callers choose the TTL per use-case.
    pub async fn presigned_get_url(&self, key: &str, ttl_minutes: i64) -> Option<String> {
        if self.config.backend == "local" {
            debug!(key, "presigned URLs unavailable for local backend");
            return None;
        }

        let storage_path = self.storage_path(key);
        match crate::presigned::generate_presigned_url(
            &self.config,
            &storage_path,
            "GET",
            Duration::minutes(ttl_minutes),
        )
        .await
        {
            Ok(url) => Some(url),
            Err(e) => {
                warn!(key, error = %e, "failed to generate presigned URL");
                None
            }
        }
    }
}
