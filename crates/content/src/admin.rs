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

//! Moderation orchestrator: user deletion, role/status mutation, stats
//!
//! Role gating happens at the transport boundary; these operations assume
//! an already-authorized administrator and only log who acted.

use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

use plexgallery_blob::BlobStore;
use plexgallery_common::{Page, PageRequest, RequestContext};

use crate::error::{GalleryError, GalleryResult};
use crate::model::{
    ImageStats, PublicStats, Role, SystemStats, UserRecord, UserStats, UserSummary,
};
use crate::repository::{ImageRepository, LikeRepository, UserRepository};

/// Moderation operations over users and their content
pub struct AdminService {
    blob: Arc<BlobStore>,
    images: Arc<dyn ImageRepository>,
    likes: Arc<dyn LikeRepository>,
    users: Arc<dyn UserRepository>,
}

impl AdminService {
    pub fn new(
        blob: Arc<BlobStore>,
        images: Arc<dyn ImageRepository>,
        likes: Arc<dyn LikeRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            blob,
            images,
            likes,
            users,
        }
    }

    /// Delete a user and every image they own
    ///
    /// Per-image failures are logged and the loop continues; a re-run after
    /// a partial failure picks up whatever is left. Already-deleted images
    /// and blobs do not error on retry. The user row goes last.
    pub async fn delete_user(&self, ctx: &RequestContext, user_id: Uuid) -> GalleryResult<()> {
        let user = self
            .users
            .get(user_id)
            .await?
            .ok_or_else(|| GalleryError::NotFound(format!("User not found: {}", user_id)))?;

        let owned = self.images.all_by_owner(user_id).await?;
        info!(admin = %ctx.display_name(), user = %user.username, images = owned.len(),
            "deleting user and owned images");

        for image in owned {
            if let Err(e) = self.blob.delete(&image.blob_key).await {
                warn!(image_id = %image.id, key = %image.blob_key, error = %e,
                    "failed to delete blob during user deletion");
            }
            if let Err(e) = self.images.delete(image.id).await {
                error!(image_id = %image.id, error = %e,
                    "failed to delete image metadata during user deletion");
            }
        }

        self.users.delete(user_id).await?;
        info!(%user_id, "user deleted");
        Ok(())
    }

    /// Change a user's role
    pub async fn change_role(
        &self,
        ctx: &RequestContext,
        user_id: Uuid,
        role: Role,
    ) -> GalleryResult<UserSummary> {
        let mut user = self
            .users
            .get(user_id)
            .await?
            .ok_or_else(|| GalleryError::NotFound(format!("User not found: {}", user_id)))?;

        self.users.set_role(user_id, role).await?;
        user.role = role;
        info!(admin = %ctx.display_name(), %user_id, role = %role, "user role changed");

        self.summarize(user).await
    }

    /// Enable or disable a user
    pub async fn set_enabled(
        &self,
        ctx: &RequestContext,
        user_id: Uuid,
        enabled: bool,
    ) -> GalleryResult<UserSummary> {
        let mut user = self
            .users
            .get(user_id)
            .await?
            .ok_or_else(|| GalleryError::NotFound(format!("User not found: {}", user_id)))?;

        self.users.set_enabled(user_id, enabled).await?;
        user.enabled = enabled;
        info!(admin = %ctx.display_name(), %user_id, enabled, "user status changed");

        self.summarize(user).await
    }

    /// All users with their image counts
    pub async fn list_users(
        &self,
        _ctx: &RequestContext,
        page: PageRequest,
    ) -> GalleryResult<Page<UserSummary>> {
        let (records, total) = self.users.list(page.limit(), page.offset()).await?;

        let mut items = Vec::with_capacity(records.len());
        for user in records {
            items.push(self.summarize(user).await?);
        }
        Ok(Page::new(items, total, page))
    }

    /// System-wide aggregates for the admin dashboard
    pub async fn system_stats(&self) -> GalleryResult<SystemStats> {
        let users = UserStats {
            total: self.users.count().await?,
            admins: self.users.count_by_role(Role::Admin).await?,
            regular_users: self.users.count_by_role(Role::User).await?,
            enabled: self.users.count_by_enabled(true).await?,
            disabled: self.users.count_by_enabled(false).await?,
        };
        let images = ImageStats {
            total: self.images.count().await?,
            total_size_bytes: self.images.total_size_bytes().await?,
        };
        let total_likes = self.likes.count_all().await?;

        Ok(SystemStats {
            users,
            images,
            total_likes,
        })
    }

    /// Aggregates visible without authentication
    pub async fn public_stats(&self) -> GalleryResult<PublicStats> {
        Ok(PublicStats {
            total_photos: self.images.count().await?,
            total_likes: self.likes.count_all().await?,
            total_participants: self.users.count_by_enabled(true).await?,
        })
    }

    async fn summarize(&self, user: UserRecord) -> GalleryResult<UserSummary> {
        let image_count = self.images.count_by_owner(user.id).await?;
        Ok(UserSummary::from_record(user, image_count))
    }
}
