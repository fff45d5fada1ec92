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

//! Gallery service configuration

use serde::{Deserialize, Serialize};
use std::env;

/// Maximum upload size: 5 MiB
const DEFAULT_MAX_UPLOAD_BYTES: i64 = 5 * 1024 * 1024;

/// Presigned URL lifetime attached to browse responses
const DEFAULT_PRESIGN_TTL_MINUTES: i64 = 30;

/// Gallery service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryConfig {
    /// Maximum accepted upload size in bytes
    pub max_upload_bytes: i64,

    /// Accepted image content types
    pub allowed_content_types: Vec<String>,

    /// TTL for presigned URLs attached to responses, in minutes
    pub presign_ttl_minutes: i64,

    /// Maximum title length in characters
    pub max_title_length: usize,

    /// Maximum description length in characters
    pub max_description_length: usize,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            allowed_content_types: vec![
                "image/jpeg".to_string(),
                "image/jpg".to_string(),
                "image/png".to_string(),
                "image/gif".to_string(),
                "image/webp".to_string(),
            ],
            presign_ttl_minutes: DEFAULT_PRESIGN_TTL_MINUTES,
            max_title_length: 255,
            max_description_length: 1000,
        }
    }
}

impl GalleryConfig {
    /// Create config from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_upload_bytes: env::var("GALLERY_MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_upload_bytes),
            presign_ttl_minutes: env::var("GALLERY_PRESIGN_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.presign_ttl_minutes),
            ..defaults
        }
    }

    /// Whether a content type is an accepted image type
    pub fn is_allowed_content_type(&self, content_type: &str) -> bool {
        self.allowed_content_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(content_type))
    }
}
