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

//! Domain records and outward-facing projections
//!
//! Images, tags and likes are plain rows joined through explicit keys; the
//! image↔tag association lives in its own table and no record holds a
//! back-reference to its peers.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::GalleryError;

/// User role
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = GalleryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "USER" => Ok(Role::User),
            "ADMIN" => Ok(Role::Admin),
            _ => Err(GalleryError::InvalidInput(format!(
                "Invalid role: {}. Valid roles are: USER, ADMIN",
                s
            ))),
        }
    }
}

/// A user row
///
/// Owned by the external auth subsystem; this core stores and projects rows
/// but never validates credentials.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserRecord {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            email: email.into(),
            role: Role::User,
            enabled: true,
            created_at: Utc::now(),
        }
    }
}

/// Image metadata row
///
/// Immutable after creation; the only lifecycle transition is deletion,
/// which also removes the stored blob and cascades like rows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageRecord {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    /// Unique key of the stored blob (1:1 with at most one object)
    pub blob_key: String,
    pub original_filename: Option<String>,
    pub content_type: String,
    pub size_bytes: i64,
    pub owner_id: Uuid,
    pub uploaded_at: DateTime<Utc>,
}

/// Tag row; names are canonical lowercase and globally unique
///
/// Tags form a permanent catalog: created lazily on first use, never pruned
/// even when no image references them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagRecord {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl TagRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            created_at: Utc::now(),
        }
    }
}

/// Like row; at most one per (image, user), enforced by the storage layer
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LikeRecord {
    pub id: Uuid,
    pub image_id: Uuid,
    pub user_id: Uuid,
    pub liked_at: DateTime<Utc>,
}

impl LikeRecord {
    pub fn new(image_id: Uuid, user_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            image_id,
            user_id,
            liked_at: Utc::now(),
        }
    }
}

/// An upload request as received from the transport layer
#[derive(Clone, Debug)]
pub struct UploadRequest {
    pub data: Bytes,
    pub content_type: String,
    pub original_filename: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
}

/// An image enriched for a response
///
/// `image_url` is presigned at response time and `liked_by_current_user`
/// depends on the viewer, so neither is ever cached on the stored row.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ImageDetails {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub blob_key: String,
    pub original_filename: Option<String>,
    pub content_type: String,
    pub size_bytes: i64,
    pub image_url: Option<String>,
    /// Tag names, sorted
    pub tags: Vec<String>,
    pub uploader_username: String,
    pub uploaded_at: DateTime<Utc>,
    pub like_count: i64,
    pub liked_by_current_user: bool,
}

/// Result of a like toggle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeStatus {
    pub liked: bool,
    pub like_count: i64,
}

/// One leaderboard row for a monthly window
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub image_id: Uuid,
    pub title: String,
    pub image_url: Option<String>,
    pub uploader_username: String,
    pub like_count: i64,
}

/// A user projected for moderation responses
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub enabled: bool,
    pub image_count: i64,
}

impl UserSummary {
    pub fn from_record(user: UserRecord, image_count: i64) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
            enabled: user.enabled,
            image_count,
        }
    }
}

/// User counts by role and enabled state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    pub total: i64,
    pub admins: i64,
    pub regular_users: i64,
    pub enabled: i64,
    pub disabled: i64,
}

/// Image counts and cumulative size
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageStats {
    pub total: i64,
    pub total_size_bytes: i64,
}

/// System-wide aggregates for the admin dashboard
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemStats {
    pub users: UserStats,
    pub images: ImageStats,
    pub total_likes: i64,
}

/// Aggregates visible without authentication
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicStats {
    pub total_photos: i64,
    pub total_likes: i64,
    pub total_participants: i64,
}
