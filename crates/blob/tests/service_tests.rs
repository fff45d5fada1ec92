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

//! Unit tests for the blob gateway using the local filesystem backend

use bytes::Bytes;
use object_store::local::LocalFileSystem;
use plexgallery_blob::{BlobConfig, BlobError, BlobStore};
use std::sync::Arc;
use tempfile::TempDir;

fn create_test_store() -> (BlobStore, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let local_store = Arc::new(LocalFileSystem::new_with_prefix(temp_dir.path()).unwrap());

    let config = BlobConfig {
        backend: "local".to_string(),
        bucket: "test".to_string(),
        endpoint: None,
        region: None,
        access_key_id: None,
        secret_access_key: None,
        use_ssl: false,
        prefix: "plexgallery".to_string(),
    };

    (BlobStore::with_object_store(config, local_store), temp_dir)
}

#[tokio::test]
async fn test_put_and_exists() {
    let (store, _temp_dir) = create_test_store();

    let key = BlobStore::object_key(Some("sunset.jpg"));
    assert!(!store.exists(&key).await.unwrap());

    store
        .put(&key, Bytes::from_static(b"jpeg bytes"), "image/jpeg")
        .await
        .unwrap();

    assert!(store.exists(&key).await.unwrap());
}

#[tokio::test]
async fn test_put_empty_data_error() {
    let (store, _temp_dir) = create_test_store();

    let result = store.put("k", Bytes::new(), "image/png").await;

    assert!(matches!(result, Err(BlobError::InvalidInput(_))));
}

#[tokio::test]
async fn test_delete_removes_blob() {
    let (store, _temp_dir) = create_test_store();

    let key = BlobStore::object_key(Some("photo.png"));
    store
        .put(&key, Bytes::from_static(b"png bytes"), "image/png")
        .await
        .unwrap();
    assert!(store.exists(&key).await.unwrap());

    store.delete(&key).await.unwrap();
    assert!(!store.exists(&key).await.unwrap());
}

#[tokio::test]
async fn test_delete_absent_key_is_ok() {
    let (store, _temp_dir) = create_test_store();

    // Deleting a key that was never stored must not be an error
    store.delete("never-stored.jpg").await.unwrap();

    // Nor deleting the same key twice
    let key = BlobStore::object_key(Some("photo.webp"));
    store
        .put(&key, Bytes::from_static(b"webp bytes"), "image/webp")
        .await
        .unwrap();
    store.delete(&key).await.unwrap();
    store.delete(&key).await.unwrap();
}

#[tokio::test]
async fn test_presigned_url_unavailable_on_local_backend() {
    let (store, _temp_dir) = create_test_store();

    let key = BlobStore::object_key(Some("photo.jpg"));
    store
        .put(&key, Bytes::from_static(b"bytes"), "image/jpeg")
        .await
        .unwrap();

    assert!(store.presigned_get_url(&key, 30).await.is_none());
}

#[test]
fn test_object_key_keeps_original_extension() {
    let key = BlobStore::object_key(Some("Holiday Photo.PNG"));
    assert!(key.ends_with(".png"));

    let key = BlobStore::object_key(Some("archive.tar.gz"));
    assert!(key.ends_with(".gz"));
}

#[test]
fn test_object_key_defaults_extension() {
    assert!(BlobStore::object_key(None).ends_with(".jpg"));
    assert!(BlobStore::object_key(Some("no-extension")).ends_with(".jpg"));
    assert!(BlobStore::object_key(Some("trailing-dot.")).ends_with(".jpg"));
}

#[test]
fn test_object_keys_are_unique() {
    let a = BlobStore::object_key(Some("same.jpg"));
    let b = BlobStore::object_key(Some("same.jpg"));
    assert_ne!(a, b);
}

#[test]
fn test_storage_path_includes_prefix() {
    let (store, _temp_dir) = create_test_store();
    assert_eq!(store.storage_path("abc.jpg"), "plexgallery/abc.jpg");
}
