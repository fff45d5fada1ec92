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

//! Repository traits over the relational metadata store
//!
//! List methods return `(rows, total_count)` so services can build paging
//! envelopes without a second round-trip. Conditional writes (`delete`,
//! `insert_if_absent`, `create_if_absent`) report whether a row was affected
//! and leave conflict arbitration to the storage layer's unique constraints.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::GalleryResult;
use crate::model::{ImageRecord, LikeRecord, Role, TagRecord, UserRecord};

/// Multi-tag search mode
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TagMatch {
    /// Image's tag set intersects the requested names
    Any,
    /// Image's tag set is a superset of the requested names
    All,
}

/// One aggregated leaderboard row before enrichment
#[derive(Clone, Debug)]
pub struct LeaderboardRow {
    pub image_id: Uuid,
    pub title: String,
    pub blob_key: String,
    pub uploader_username: String,
    pub like_count: i64,
}

/// Image metadata storage
#[async_trait]
pub trait ImageRepository: Send + Sync {
    /// Persist an image row and its tag associations in one transaction
    async fn insert_with_tags(&self, image: &ImageRecord, tag_ids: &[Uuid]) -> GalleryResult<()>;

    async fn get(&self, id: Uuid) -> GalleryResult<Option<ImageRecord>>;

    /// All images, newest first, ties broken by id
    async fn list(&self, limit: i64, offset: i64) -> GalleryResult<(Vec<ImageRecord>, i64)>;

    async fn list_by_owner(
        &self,
        owner_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> GalleryResult<(Vec<ImageRecord>, i64)>;

    /// Every image owned by a user, unbounded (moderation cascade)
    async fn all_by_owner(&self, owner_id: Uuid) -> GalleryResult<Vec<ImageRecord>>;

    /// Case-insensitive substring match over title OR description
    async fn search_text(
        &self,
        query: &str,
        limit: i64,
        offset: i64,
    ) -> GalleryResult<(Vec<ImageRecord>, i64)>;

    /// Images matching the given canonical tag names under `mode`
    async fn search_tags(
        &self,
        names: &[String],
        mode: TagMatch,
        limit: i64,
        offset: i64,
    ) -> GalleryResult<(Vec<ImageRecord>, i64)>;

    /// Delete an image row, its tag associations and its likes
    ///
    /// Deleting an absent id is not an error; moderation cascades re-run
    /// after partial failures.
    async fn delete(&self, id: Uuid) -> GalleryResult<()>;

    /// Sorted tag names associated with an image
    async fn tag_names(&self, image_id: Uuid) -> GalleryResult<Vec<String>>;

    async fn count(&self) -> GalleryResult<i64>;

    async fn count_by_owner(&self, owner_id: Uuid) -> GalleryResult<i64>;

    async fn total_size_bytes(&self) -> GalleryResult<i64>;
}

/// Tag catalog storage
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// Batch lookup by canonical names
    async fn find_by_names(&self, names: &[String]) -> GalleryResult<Vec<TagRecord>>;

    async fn get_by_name(&self, name: &str) -> GalleryResult<Option<TagRecord>>;

    /// Insert unless a row with the same name exists
    ///
    /// A concurrent create of the same name is not an error; callers
    /// re-fetch by name afterwards.
    async fn create_if_absent(&self, tag: &TagRecord) -> GalleryResult<()>;

    /// Tags ordered by number of associated images, descending
    async fn popular(&self, limit: i64) -> GalleryResult<Vec<(TagRecord, i64)>>;
}

/// Like storage
#[async_trait]
pub trait LikeRepository: Send + Sync {
    /// Conditional insert; false when the (image, user) like already exists
    async fn insert_if_absent(&self, like: &LikeRecord) -> GalleryResult<bool>;

    /// Conditional delete; false when no like row existed
    async fn delete(&self, image_id: Uuid, user_id: Uuid) -> GalleryResult<bool>;

    async fn exists(&self, image_id: Uuid, user_id: Uuid) -> GalleryResult<bool>;

    /// Likes for one image, recomputed from rows
    async fn count_for_image(&self, image_id: Uuid) -> GalleryResult<i64>;

    async fn count_all(&self) -> GalleryResult<i64>;

    /// Like rows for an image, newest first
    async fn for_image(
        &self,
        image_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> GalleryResult<(Vec<LikeRecord>, i64)>;

    /// Per-image like counts over `[from, to)`, most liked first
    ///
    /// Ties order by earliest image upload time, then image id.
    async fn leaderboard(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        limit: Option<i64>,
    ) -> GalleryResult<Vec<LeaderboardRow>>;
}

/// User row storage (accessor only; credentials live elsewhere)
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, user: &UserRecord) -> GalleryResult<()>;

    async fn get(&self, id: Uuid) -> GalleryResult<Option<UserRecord>>;

    async fn list(&self, limit: i64, offset: i64) -> GalleryResult<(Vec<UserRecord>, i64)>;

    /// Deleting an absent id is not an error
    async fn delete(&self, id: Uuid) -> GalleryResult<()>;

    async fn set_role(&self, id: Uuid, role: Role) -> GalleryResult<()>;

    async fn set_enabled(&self, id: Uuid, enabled: bool) -> GalleryResult<()>;

    async fn count(&self) -> GalleryResult<i64>;

    async fn count_by_role(&self, role: Role) -> GalleryResult<i64>;

    async fn count_by_enabled(&self, enabled: bool) -> GalleryResult<i64>;
}

pub mod sql;

pub use sql::{
    connect, migrate, SqlImageRepository, SqlLikeRepository, SqlTagRepository, SqlUserRepository,
};
