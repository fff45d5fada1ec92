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

//! Content manager: upload, retrieval, search and deletion
//!
//! Orchestrates the blob gateway, the tag normalizer and the metadata
//! repositories. A blob-store failure during upload aborts the whole
//! operation before any metadata is written; a blob-store failure during
//! deletion is logged and metadata deletion proceeds, accepting a possible
//! orphaned blob.

use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use plexgallery_blob::BlobStore;
use plexgallery_common::{Page, PageRequest, RequestContext};

use crate::config::GalleryConfig;
use crate::error::{GalleryError, GalleryResult};
use crate::model::{ImageDetails, ImageRecord, TagRecord, UploadRequest};
use crate::repository::{
    ImageRepository, LikeRepository, TagMatch, TagRepository, UserRepository,
};
use crate::tags::{normalize_names, TagNormalizer};

/// Content manager for gallery images
pub struct ContentService {
    blob: Arc<BlobStore>,
    images: Arc<dyn ImageRepository>,
    likes: Arc<dyn LikeRepository>,
    users: Arc<dyn UserRepository>,
    tags: TagNormalizer,
    tag_catalog: Arc<dyn TagRepository>,
    config: GalleryConfig,
}

impl ContentService {
    pub fn new(
        blob: Arc<BlobStore>,
        images: Arc<dyn ImageRepository>,
        tags: Arc<dyn TagRepository>,
        likes: Arc<dyn LikeRepository>,
        users: Arc<dyn UserRepository>,
        config: GalleryConfig,
    ) -> Self {
        Self {
            blob,
            images,
            likes,
            users,
            tags: TagNormalizer::new(tags.clone()),
            tag_catalog: tags,
            config,
        }
    }

    /// Upload an image with its metadata
    ///
    /// The blob is stored first; only then is the metadata row written, in
    /// one transaction with its tag associations. A failed blob put aborts
    /// the upload with no metadata written; a failed metadata write triggers
    /// a best-effort blob cleanup.
    pub async fn upload(
        &self,
        ctx: &RequestContext,
        request: UploadRequest,
    ) -> GalleryResult<ImageDetails> {
        let owner_id = ctx.user_id.ok_or_else(|| {
            GalleryError::Forbidden("Authentication required to upload images".to_string())
        })?;

        self.validate_upload(&request)?;

        let owner = self
            .users
            .get(owner_id)
            .await?
            .ok_or_else(|| GalleryError::NotFound(format!("User not found: {}", owner_id)))?;

        let blob_key = BlobStore::object_key(request.original_filename.as_deref());
        info!(user = %owner.username, key = %blob_key, "starting image upload");

        self.blob
            .put(&blob_key, request.data.clone(), &request.content_type)
            .await?;

        let record = match self.persist_metadata(&request, owner_id, &blob_key).await {
            Ok(record) => record,
            Err(e) => {
                // The blob is already stored; try not to leave it orphaned
                if let Err(cleanup) = self.blob.delete(&blob_key).await {
                    warn!(key = %blob_key, error = %cleanup,
                        "failed to clean up blob after metadata write failure");
                }
                return Err(e);
            }
        };

        info!(image_id = %record.id, "image uploaded");
        self.to_details(ctx, record).await
    }

    /// Resolve tags and write the image row with its associations
    async fn persist_metadata(
        &self,
        request: &UploadRequest,
        owner_id: Uuid,
        blob_key: &str,
    ) -> GalleryResult<ImageRecord> {
        let tags = self.tags.resolve(&request.tags).await?;
        let tag_ids: Vec<Uuid> = tags.iter().map(|tag| tag.id).collect();

        let record = ImageRecord {
            id: Uuid::new_v4(),
            title: request.title.trim().to_string(),
            description: request.description.clone(),
            blob_key: blob_key.to_string(),
            original_filename: request.original_filename.clone(),
            content_type: request.content_type.clone(),
            size_bytes: request.data.len() as i64,
            owner_id,
            uploaded_at: Utc::now(),
        };

        self.images.insert_with_tags(&record, &tag_ids).await?;
        Ok(record)
    }

    /// Get one image by id
    pub async fn get_by_id(&self, ctx: &RequestContext, id: Uuid) -> GalleryResult<ImageDetails> {
        let record = self
            .images
            .get(id)
            .await?
            .ok_or_else(|| GalleryError::NotFound(format!("Image not found: {}", id)))?;

        self.to_details(ctx, record).await
    }

    /// All images, newest first
    pub async fn list(
        &self,
        ctx: &RequestContext,
        page: PageRequest,
    ) -> GalleryResult<Page<ImageDetails>> {
        let (records, total) = self.images.list(page.limit(), page.offset()).await?;
        self.to_page(ctx, records, total, page).await
    }

    /// Images owned by one user, newest first
    pub async fn list_by_owner(
        &self,
        ctx: &RequestContext,
        owner_id: Uuid,
        page: PageRequest,
    ) -> GalleryResult<Page<ImageDetails>> {
        let (records, total) = self
            .images
            .list_by_owner(owner_id, page.limit(), page.offset())
            .await?;
        self.to_page(ctx, records, total, page).await
    }

    /// Case-insensitive substring search over title and description
    pub async fn search_text(
        &self,
        ctx: &RequestContext,
        query: &str,
        page: PageRequest,
    ) -> GalleryResult<Page<ImageDetails>> {
        let (records, total) = self
            .images
            .search_text(query, page.limit(), page.offset())
            .await?;
        self.to_page(ctx, records, total, page).await
    }

    /// Multi-tag search; names are normalized before matching
    pub async fn search_tags(
        &self,
        ctx: &RequestContext,
        names: &[String],
        mode: TagMatch,
        page: PageRequest,
    ) -> GalleryResult<Page<ImageDetails>> {
        let normalized: Vec<String> = normalize_names(names).into_iter().collect();
        if normalized.is_empty() {
            return Ok(Page::new(Vec::new(), 0, page));
        }

        let (records, total) = self
            .images
            .search_tags(&normalized, mode, page.limit(), page.offset())
            .await?;
        self.to_page(ctx, records, total, page).await
    }

    /// Delete an image; only the owner or an admin may do so
    pub async fn delete(&self, ctx: &RequestContext, image_id: Uuid) -> GalleryResult<()> {
        let record = self
            .images
            .get(image_id)
            .await?
            .ok_or_else(|| GalleryError::NotFound(format!("Image not found: {}", image_id)))?;

        let is_owner = ctx.user_id == Some(record.owner_id);
        if !is_owner && !ctx.is_admin() {
            return Err(GalleryError::Forbidden(
                "You can only delete your own images".to_string(),
            ));
        }

        // Non-fatal: an orphaned blob is preferable to undeletable metadata
        if let Err(e) = self.blob.delete(&record.blob_key).await {
            warn!(key = %record.blob_key, error = %e, "failed to delete blob");
        }

        self.images.delete(image_id).await?;
        info!(image_id = %image_id, user = %ctx.display_name(), "image deleted");
        Ok(())
    }

    /// Most-used tags, for discovery and autocompletion
    pub async fn popular_tags(&self, limit: i64) -> GalleryResult<Vec<(TagRecord, i64)>> {
        self.tag_catalog.popular(limit).await
    }

    fn validate_upload(&self, request: &UploadRequest) -> GalleryResult<()> {
        if request.data.is_empty() {
            return Err(GalleryError::InvalidInput("File is required".to_string()));
        }

        if !self.config.is_allowed_content_type(&request.content_type) {
            return Err(GalleryError::InvalidInput(format!(
                "Unsupported file type: {}. Supported types: {}",
                request.content_type,
                self.config.allowed_content_types.join(", ")
            )));
        }

        if request.data.len() as i64 > self.config.max_upload_bytes {
            return Err(GalleryError::InvalidInput(format!(
                "File size exceeds maximum limit of {} bytes",
                self.config.max_upload_bytes
            )));
        }

        let title = request.title.trim();
        if title.is_empty() {
            return Err(GalleryError::InvalidInput("Title is required".to_string()));
        }
        if title.chars().count() > self.config.max_title_length {
            return Err(GalleryError::InvalidInput(format!(
                "Title must not exceed {} characters",
                self.config.max_title_length
            )));
        }

        if let Some(description) = &request.description {
            if description.chars().count() > self.config.max_description_length {
                return Err(GalleryError::InvalidInput(format!(
                    "Description must not exceed {} characters",
                    self.config.max_description_length
                )));
            }
        }

        Ok(())
    }

    async fn to_page(
        &self,
        ctx: &RequestContext,
        records: Vec<ImageRecord>,
        total: i64,
        page: PageRequest,
    ) -> GalleryResult<Page<ImageDetails>> {
        let mut items = Vec::with_capacity(records.len());
        for record in records {
            items.push(self.to_details(ctx, record).await?);
        }
        Ok(Page::new(items, total, page))
    }

    /// Enrich a stored row for a response
    ///
    /// The URL is presigned per response and the liked flag depends on the
    /// viewer, so neither can live on the stored row.
    async fn to_details(
        &self,
        ctx: &RequestContext,
        record: ImageRecord,
    ) -> GalleryResult<ImageDetails> {
        let image_url = self
            .blob
            .presigned_get_url(&record.blob_key, self.config.presign_ttl_minutes)
            .await;

        let tags = self.images.tag_names(record.id).await?;

        let uploader_username = self
            .users
            .get(record.owner_id)
            .await?
            .map(|user| user.username)
            .unwrap_or_default();

        let like_count = self.likes.count_for_image(record.id).await?;
        let liked_by_current_user = match ctx.user_id {
            Some(user_id) => self.likes.exists(record.id, user_id).await?,
            None => false,
        };

        Ok(ImageDetails {
            id: record.id,
            title: record.title,
            description: record.description,
            blob_key: record.blob_key,
            original_filename: record.original_filename,
            content_type: record.content_type,
            size_bytes: record.size_bytes,
            image_url,
            tags,
            uploader_username,
            uploaded_at: record.uploaded_at,
            like_count,
            liked_by_current_user,
        })
    }
}
