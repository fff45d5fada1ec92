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

//! Tests for the moderation orchestrator and system statistics

mod common;

use common::{ctx, jpeg_upload, setup};
use plexgallery_common::PageRequest;
use plexgallery_content::{GalleryError, Role};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use uuid::Uuid;

#[tokio::test]
async fn test_delete_user_removes_images_blobs_and_user() {
    let env = setup().await;
    let alice = ctx(&env.alice);
    let root = ctx(&env.root);

    let first = env
        .content
        .upload(&alice, jpeg_upload("One", &["travel"]))
        .await
        .unwrap();
    let second = env
        .content
        .upload(&alice, jpeg_upload("Two", &[]))
        .await
        .unwrap();

    env.admin.delete_user(&root, env.alice.id).await.unwrap();

    assert!(env.users_repo.get(env.alice.id).await.unwrap().is_none());
    assert_eq!(
        env.images_repo.count_by_owner(env.alice.id).await.unwrap(),
        0
    );
    assert!(!env.blob.exists(&first.blob_key).await.unwrap());
    assert!(!env.blob.exists(&second.blob_key).await.unwrap());
}

#[tokio::test]
async fn test_delete_user_continues_past_blob_failures() {
    let env = setup().await;
    let alice = ctx(&env.alice);
    let root = ctx(&env.root);

    env.content
        .upload(&alice, jpeg_upload("One", &[]))
        .await
        .unwrap();
    env.content
        .upload(&alice, jpeg_upload("Two", &[]))
        .await
        .unwrap();

    // Make blob deletion fail by removing write access to the objects'
    // directory; metadata deletion must proceed regardless
    let blob_root = env.blob_dir.path().join("plexgallery");
    let original = fs::metadata(&blob_root).unwrap().permissions();
    fs::set_permissions(&blob_root, fs::Permissions::from_mode(0o555)).unwrap();

    let result = env.admin.delete_user(&root, env.alice.id).await;

    fs::set_permissions(&blob_root, original).unwrap();

    result.unwrap();
    assert!(env.users_repo.get(env.alice.id).await.unwrap().is_none());
    assert_eq!(
        env.images_repo.count_by_owner(env.alice.id).await.unwrap(),
        0
    );
}

#[tokio::test]
async fn test_delete_user_rerun_after_partial_failure() {
    let env = setup().await;
    let alice = ctx(&env.alice);
    let root = ctx(&env.root);

    let first = env
        .content
        .upload(&alice, jpeg_upload("One", &[]))
        .await
        .unwrap();
    env.content
        .upload(&alice, jpeg_upload("Two", &[]))
        .await
        .unwrap();

    // As if an earlier run died after removing one image
    env.blob.delete(&first.blob_key).await.unwrap();
    env.images_repo.delete(first.id).await.unwrap();

    env.admin.delete_user(&root, env.alice.id).await.unwrap();
    assert!(env.users_repo.get(env.alice.id).await.unwrap().is_none());
    assert_eq!(
        env.images_repo.count_by_owner(env.alice.id).await.unwrap(),
        0
    );
}

#[tokio::test]
async fn test_delete_unknown_user_not_found() {
    let env = setup().await;
    let root = ctx(&env.root);

    let result = env.admin.delete_user(&root, Uuid::new_v4()).await;
    assert!(matches!(result, Err(GalleryError::NotFound(_))));
}

#[tokio::test]
async fn test_change_role() {
    let env = setup().await;
    let root = ctx(&env.root);

    let summary = env
        .admin
        .change_role(&root, env.bob.id, Role::Admin)
        .await
        .unwrap();
    assert_eq!(summary.role, Role::Admin);
    assert_eq!(summary.username, "bob");
    assert_eq!(summary.image_count, 0);

    let stored = env.users_repo.get(env.bob.id).await.unwrap().unwrap();
    assert_eq!(stored.role, Role::Admin);

    let result = env
        .admin
        .change_role(&root, Uuid::new_v4(), Role::User)
        .await;
    assert!(matches!(result, Err(GalleryError::NotFound(_))));
}

#[tokio::test]
async fn test_set_enabled() {
    let env = setup().await;
    let root = ctx(&env.root);

    let summary = env
        .admin
        .set_enabled(&root, env.bob.id, false)
        .await
        .unwrap();
    assert!(!summary.enabled);

    let stored = env.users_repo.get(env.bob.id).await.unwrap().unwrap();
    assert!(!stored.enabled);

    let summary = env
        .admin
        .set_enabled(&root, env.bob.id, true)
        .await
        .unwrap();
    assert!(summary.enabled);
}

#[tokio::test]
async fn test_list_users_with_image_counts() {
    let env = setup().await;
    let alice = ctx(&env.alice);
    let root = ctx(&env.root);

    env.content
        .upload(&alice, jpeg_upload("Hers", &[]))
        .await
        .unwrap();

    let page = env
        .admin
        .list_users(&root, PageRequest::first())
        .await
        .unwrap();
    assert_eq!(page.total, 3);

    let alice_row = page
        .items
        .iter()
        .find(|user| user.username == "alice")
        .unwrap();
    assert_eq!(alice_row.image_count, 1);

    let bob_row = page
        .items
        .iter()
        .find(|user| user.username == "bob")
        .unwrap();
    assert_eq!(bob_row.image_count, 0);
}

#[tokio::test]
async fn test_system_stats() {
    let env = setup().await;
    let alice = ctx(&env.alice);
    let bob = ctx(&env.bob);
    let root = ctx(&env.root);

    let first = env
        .content
        .upload(&alice, jpeg_upload("One", &[]))
        .await
        .unwrap();
    let second = env
        .content
        .upload(&alice, jpeg_upload("Two", &[]))
        .await
        .unwrap();
    env.likes.toggle_like(&bob, first.id).await.unwrap();
    env.likes.toggle_like(&root, first.id).await.unwrap();
    env.admin
        .set_enabled(&root, env.bob.id, false)
        .await
        .unwrap();

    let stats = env.admin.system_stats().await.unwrap();
    assert_eq!(stats.users.total, 3);
    assert_eq!(stats.users.admins, 1);
    assert_eq!(stats.users.regular_users, 2);
    assert_eq!(stats.users.enabled, 2);
    assert_eq!(stats.users.disabled, 1);
    assert_eq!(stats.images.total, 2);
    assert_eq!(
        stats.images.total_size_bytes,
        first.size_bytes + second.size_bytes
    );
    assert_eq!(stats.total_likes, 2);
}

#[tokio::test]
async fn test_public_stats() {
    let env = setup().await;
    let alice = ctx(&env.alice);
    let bob = ctx(&env.bob);
    let root = ctx(&env.root);

    let details = env
        .content
        .upload(&alice, jpeg_upload("Shared", &[]))
        .await
        .unwrap();
    env.likes.toggle_like(&bob, details.id).await.unwrap();
    env.admin
        .set_enabled(&root, env.bob.id, false)
        .await
        .unwrap();

    let stats = env.admin.public_stats().await.unwrap();
    assert_eq!(stats.total_photos, 1);
    assert_eq!(stats.total_likes, 1);
    assert_eq!(stats.total_participants, 2);
}
