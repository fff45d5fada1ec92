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

//! PlexGallery Blob Store Gateway
//!
//! ## Purpose
//! Key-addressed put/delete/presigned-URL operations against an
//! S3-compatible object store. Image metadata lives in the relational store
//! (`plexgallery-content`); this crate only moves bytes and signs URLs.
//!
//! ## Architecture
//! - **Backends**: S3, MinIO, or a local filesystem (tests)
//! - **Keys**: caller-generated, collision-resistant (ULID + extension)
//! - **Path Structure**: {prefix}/{key}
//! - **Presigned URLs**: time-limited GET/PUT signatures via the AWS SDK,
//!   behind the default-on `presigned-urls` feature
//!
//! ## Usage
//! ```rust,no_run
//! use plexgallery_blob::{BlobConfig, BlobStore};
//! use bytes::Bytes;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = BlobConfig {
//!     backend: "minio".to_string(),
//!     bucket: "gallery".to_string(),
//!     endpoint: Some("http://localhost:9000".to_string()),
//!     ..BlobConfig::default()
//! };
//!
//! let store = BlobStore::new(config)?;
//! let key = BlobStore::object_key(Some("sunset.jpg"));
//! store.put(&key, Bytes::from_static(b"..."), "image/jpeg").await?;
//! let url = store.presigned_get_url(&key, 30).await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod presigned;
pub mod service;

pub use config::BlobConfig;
pub use error::{BlobError, BlobResult};
pub use service::BlobStore;
