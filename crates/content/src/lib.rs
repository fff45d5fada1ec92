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

//! PlexGallery content & engagement services
//!
//! ## Purpose
//! The core of the gallery backend: image upload/browse/search/delete, tag
//! normalization, like toggling with accurate counts under concurrency, and
//! monthly leaderboards. Relational metadata lives behind sqlx repositories
//! (SQLite for tests, PostgreSQL in production); binary data goes through
//! the `plexgallery-blob` gateway.
//!
//! ## Architecture
//! - **Repositories**: `ImageRepository` / `TagRepository` / `LikeRepository`
//!   / `UserRepository` traits with SQL implementations over `sqlx::Any`
//! - **ContentService**: upload pipeline, retrieval, text/tag search,
//!   owner/admin-gated deletion
//! - **LikeService**: constraint-driven like toggling, counts, leaderboards
//! - **AdminService**: cascading user deletion, role/status mutation, stats
//!
//! Correctness under concurrent instances relies on storage-layer unique
//! constraints (tag names, one like per user per image) plus conflict retry,
//! never on in-process locks.

pub mod admin;
pub mod config;
pub mod content;
pub mod engagement;
pub mod error;
pub mod model;
pub mod repository;
pub mod tags;

pub use admin::AdminService;
pub use config::GalleryConfig;
pub use content::ContentService;
pub use engagement::LikeService;
pub use error::{GalleryError, GalleryResult};
pub use model::{
    ImageDetails, ImageRecord, LeaderboardEntry, LikeRecord, LikeStatus, PublicStats, Role,
    SystemStats, TagRecord, UploadRequest, UserRecord, UserSummary,
};
pub use repository::{
    ImageRepository, LikeRepository, TagMatch, TagRepository, UserRepository,
};
pub use tags::{normalize_names, TagNormalizer};
