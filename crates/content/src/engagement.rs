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

//! Engagement engine: like toggling, counts and monthly leaderboards
//!
//! Toggle correctness under concurrency comes from the storage layer's
//! `(image_id, user_id)` uniqueness constraint plus conflict retry, never
//! from an in-process lock; multiple service instances may run at once.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use plexgallery_blob::BlobStore;
use plexgallery_common::{Page, PageRequest, RequestContext};

use crate::config::GalleryConfig;
use crate::error::{GalleryError, GalleryResult};
use crate::model::{LeaderboardEntry, LikeRecord, LikeStatus};
use crate::repository::{ImageRepository, LikeRepository, UserRepository};

/// A toggle retries this often before reporting the settled state; losing
/// both the delete and the insert race twice in a row already requires a
/// pathological interleaving
const TOGGLE_MAX_ATTEMPTS: usize = 4;

/// Engagement engine for likes and leaderboards
pub struct LikeService {
    blob: Arc<BlobStore>,
    images: Arc<dyn ImageRepository>,
    likes: Arc<dyn LikeRepository>,
    users: Arc<dyn UserRepository>,
    config: GalleryConfig,
}

impl LikeService {
    pub fn new(
        blob: Arc<BlobStore>,
        images: Arc<dyn ImageRepository>,
        likes: Arc<dyn LikeRepository>,
        users: Arc<dyn UserRepository>,
        config: GalleryConfig,
    ) -> Self {
        Self {
            blob,
            images,
            likes,
            users,
            config,
        }
    }

    /// Toggle the caller's like on an image
    ///
    /// Removes the existing like row if present, inserts one otherwise.
    /// Both writes are conditional; when a concurrent toggle wins both
    /// races the loop retries against the new state. The returned count is
    /// recomputed from rows, never from a cached counter.
    pub async fn toggle_like(
        &self,
        ctx: &RequestContext,
        image_id: Uuid,
    ) -> GalleryResult<LikeStatus> {
        let user_id = ctx.user_id.ok_or_else(|| {
            GalleryError::Forbidden("Authentication required to like images".to_string())
        })?;

        self.images
            .get(image_id)
            .await?
            .ok_or_else(|| GalleryError::NotFound(format!("Image not found: {}", image_id)))?;
        self.users
            .get(user_id)
            .await?
            .ok_or_else(|| GalleryError::NotFound(format!("User not found: {}", user_id)))?;

        for attempt in 0..TOGGLE_MAX_ATTEMPTS {
            if self.likes.delete(image_id, user_id).await? {
                let like_count = self.likes.count_for_image(image_id).await?;
                debug!(%image_id, user = %ctx.display_name(), "like removed");
                return Ok(LikeStatus {
                    liked: false,
                    like_count,
                });
            }

            let like = LikeRecord::new(image_id, user_id);
            if self.likes.insert_if_absent(&like).await? {
                let like_count = self.likes.count_for_image(image_id).await?;
                debug!(%image_id, user = %ctx.display_name(), "like added");
                return Ok(LikeStatus {
                    liked: true,
                    like_count,
                });
            }

            debug!(%image_id, attempt, "toggle lost both races, retrying");
        }

        // Every attempt lost both races; report whatever state settled
        Ok(LikeStatus {
            liked: self.likes.exists(image_id, user_id).await?,
            like_count: self.likes.count_for_image(image_id).await?,
        })
    }

    /// Current like count, recomputed from rows
    pub async fn like_count(&self, image_id: Uuid) -> GalleryResult<i64> {
        self.likes.count_for_image(image_id).await
    }

    /// Whether the caller has liked the image
    pub async fn is_liked(&self, ctx: &RequestContext, image_id: Uuid) -> GalleryResult<bool> {
        match ctx.user_id {
            Some(user_id) => self.likes.exists(image_id, user_id).await,
            None => Ok(false),
        }
    }

    /// Images ranked by likes received within one calendar month
    ///
    /// Counts only likes with `liked_at` inside `[month start, next month
    /// start)`. Entries carry URLs presigned at response time.
    pub async fn monthly_leaderboard(
        &self,
        year: i32,
        month: u32,
    ) -> GalleryResult<Vec<LeaderboardEntry>> {
        let (from, to) = month_window(year, month)?;
        let rows = self.likes.leaderboard(from, to, None).await?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in rows {
            let image_url = self
                .blob
                .presigned_get_url(&row.blob_key, self.config.presign_ttl_minutes)
                .await;
            entries.push(LeaderboardEntry {
                image_id: row.image_id,
                title: row.title,
                image_url,
                uploader_username: row.uploader_username,
                like_count: row.like_count,
            });
        }
        Ok(entries)
    }

    /// The most-liked image of a calendar month, if any likes were given
    pub async fn photo_of_month(
        &self,
        year: i32,
        month: u32,
    ) -> GalleryResult<Option<LeaderboardEntry>> {
        let (from, to) = month_window(year, month)?;
        let rows = self.likes.leaderboard(from, to, Some(1)).await?;

        match rows.into_iter().next() {
            Some(row) => {
                let image_url = self
                    .blob
                    .presigned_get_url(&row.blob_key, self.config.presign_ttl_minutes)
                    .await;
                Ok(Some(LeaderboardEntry {
                    image_id: row.image_id,
                    title: row.title,
                    image_url,
                    uploader_username: row.uploader_username,
                    like_count: row.like_count,
                }))
            }
            None => Ok(None),
        }
    }

    /// Photo of the month for the current calendar month
    pub async fn current_photo_of_month(&self) -> GalleryResult<Option<LeaderboardEntry>> {
        let now = Utc::now();
        self.photo_of_month(now.year(), now.month()).await
    }

    /// Like rows for an image, newest first
    pub async fn likes_for_image(
        &self,
        image_id: Uuid,
        page: PageRequest,
    ) -> GalleryResult<Page<LikeRecord>> {
        self.images
            .get(image_id)
            .await?
            .ok_or_else(|| GalleryError::NotFound(format!("Image not found: {}", image_id)))?;

        let (rows, total) = self
            .likes
            .for_image(image_id, page.limit(), page.offset())
            .await?;
        Ok(Page::new(rows, total, page))
    }
}

/// Half-open UTC window covering one calendar month
fn month_window(year: i32, month: u32) -> GalleryResult<(DateTime<Utc>, DateTime<Utc>)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| GalleryError::InvalidInput(format!("Invalid month: {}-{}", year, month)))?;

    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let end = NaiveDate::from_ymd_opt(next_year, next_month, 1).ok_or_else(|| {
        GalleryError::InvalidInput(format!("Invalid month: {}-{}", next_year, next_month))
    })?;

    Ok((
        start.and_time(NaiveTime::MIN).and_utc(),
        end.and_time(NaiveTime::MIN).and_utc(),
    ))
}
