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

//! Error types for gallery operations
//!
//! Unique-constraint conflicts on tag creation and like insertion are
//! resolved inside the services (re-fetch / retry) and never reach callers.

use plexgallery_blob::BlobError;
use thiserror::Error;

/// Result type for gallery operations
pub type GalleryResult<T> = Result<T, GalleryError>;

/// Error types for gallery operations
#[derive(Error, Debug)]
pub enum GalleryError {
    #[error("Validation error: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Access denied: {0}")]
    Forbidden(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("SQL error: {0}")]
    SqlError(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<BlobError> for GalleryError {
    fn from(e: BlobError) -> Self {
        GalleryError::StorageError(e.to_string())
    }
}
