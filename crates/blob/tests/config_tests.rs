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

//! Tests for blob configuration validation

use plexgallery_blob::BlobConfig;

#[test]
fn test_default_config_is_valid() {
    let config = BlobConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.backend, "minio");
}

#[test]
fn test_invalid_backend_rejected() {
    let config = BlobConfig {
        backend: "ftp".to_string(),
        ..BlobConfig::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_minio_requires_endpoint() {
    let config = BlobConfig {
        backend: "minio".to_string(),
        endpoint: None,
        ..BlobConfig::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_s3_requires_region() {
    let config = BlobConfig {
        backend: "s3".to_string(),
        region: None,
        ..BlobConfig::default()
    };
    assert!(config.validate().is_err());

    let config = BlobConfig {
        backend: "s3".to_string(),
        region: Some("eu-west-1".to_string()),
        ..BlobConfig::default()
    };
    assert!(config.validate().is_ok());
}

#[test]
fn test_bucket_required_except_local() {
    let config = BlobConfig {
        bucket: String::new(),
        ..BlobConfig::default()
    };
    assert!(config.validate().is_err());

    let config = BlobConfig {
        backend: "local".to_string(),
        bucket: String::new(),
        ..BlobConfig::default()
    };
    assert!(config.validate().is_ok());
}
