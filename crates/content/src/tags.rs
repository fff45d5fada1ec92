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

//! Tag normalization and find-or-create resolution

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use tracing::debug;

use crate::error::{GalleryError, GalleryResult};
use crate::model::TagRecord;
use crate::repository::TagRepository;

/// Canonicalize raw tag names: trim, drop empties, lowercase for identity
///
/// The returned set is the deduplicated canonical form; `"Nature"`,
/// `"nature"` and `" NATURE "` all collapse to `"nature"`.
pub fn normalize_names(raw: &[String]) -> BTreeSet<String> {
    raw.iter()
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .map(|name| name.to_lowercase())
        .collect()
}

/// Resolves raw tag names to catalog rows, creating missing tags lazily
pub struct TagNormalizer {
    tags: Arc<dyn TagRepository>,
}

impl TagNormalizer {
    pub fn new(tags: Arc<dyn TagRepository>) -> Self {
        Self { tags }
    }

    /// Find or create the tags for the given raw names
    ///
    /// Existing tags are looked up in one batch; the remainder is created
    /// with conflict-tolerant inserts. The name's uniqueness constraint is
    /// the source of truth: losing a creation race to a concurrent upload
    /// just means the winner's row is fetched instead.
    pub async fn resolve(&self, raw: &[String]) -> GalleryResult<Vec<TagRecord>> {
        let names: Vec<String> = normalize_names(raw).into_iter().collect();
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let mut resolved = self.tags.find_by_names(&names).await?;
        let existing: HashSet<String> = resolved.iter().map(|tag| tag.name.clone()).collect();

        for name in names.iter().filter(|name| !existing.contains(*name)) {
            self.tags.create_if_absent(&TagRecord::new(name.clone())).await?;
            let tag = self.tags.get_by_name(name).await?.ok_or_else(|| {
                GalleryError::InternalError(format!("tag vanished after create: {}", name))
            })?;
            debug!(tag = %tag.name, "tag resolved");
            resolved.push(tag);
        }

        Ok(resolved)
    }
}
