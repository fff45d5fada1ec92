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

//! Shared fixture: services over in-memory SQLite and a temp-dir blob store

#![allow(dead_code)]

use bytes::Bytes;
use object_store::local::LocalFileSystem;
use std::sync::Arc;
use tempfile::TempDir;

use plexgallery_blob::{BlobConfig, BlobStore};
use plexgallery_common::RequestContext;
use plexgallery_content::repository::{
    connect, migrate, ImageRepository, LikeRepository, SqlImageRepository, SqlLikeRepository,
    SqlTagRepository, SqlUserRepository, TagRepository, UserRepository,
};
use plexgallery_content::{
    AdminService, ContentService, GalleryConfig, LikeService, Role, UploadRequest, UserRecord,
};

pub struct TestEnv {
    pub content: ContentService,
    pub likes: LikeService,
    pub admin: AdminService,
    pub blob: Arc<BlobStore>,
    pub images_repo: Arc<dyn ImageRepository>,
    pub tags_repo: Arc<dyn TagRepository>,
    pub likes_repo: Arc<dyn LikeRepository>,
    pub users_repo: Arc<dyn UserRepository>,
    pub alice: UserRecord,
    pub bob: UserRecord,
    pub root: UserRecord,
    pub blob_dir: TempDir,
}

pub async fn setup() -> TestEnv {
    let pool = connect("sqlite::memory:").await.unwrap();
    migrate(&pool).await.unwrap();

    let images_repo: Arc<dyn ImageRepository> = Arc::new(SqlImageRepository::new(pool.clone()));
    let tags_repo: Arc<dyn TagRepository> = Arc::new(SqlTagRepository::new(pool.clone()));
    let likes_repo: Arc<dyn LikeRepository> = Arc::new(SqlLikeRepository::new(pool.clone()));
    let users_repo: Arc<dyn UserRepository> = Arc::new(SqlUserRepository::new(pool));

    let blob_dir = TempDir::new().unwrap();
    let local_store = Arc::new(LocalFileSystem::new_with_prefix(blob_dir.path()).unwrap());
    let blob_config = BlobConfig {
        backend: "local".to_string(),
        bucket: "test".to_string(),
        endpoint: None,
        ..BlobConfig::default()
    };
    let blob = Arc::new(BlobStore::with_object_store(blob_config, local_store));

    let config = GalleryConfig::default();

    let content = ContentService::new(
        blob.clone(),
        images_repo.clone(),
        tags_repo.clone(),
        likes_repo.clone(),
        users_repo.clone(),
        config.clone(),
    );
    let likes = LikeService::new(
        blob.clone(),
        images_repo.clone(),
        likes_repo.clone(),
        users_repo.clone(),
        config,
    );
    let admin = AdminService::new(
        blob.clone(),
        images_repo.clone(),
        likes_repo.clone(),
        users_repo.clone(),
    );

    let alice = UserRecord::new("alice", "alice@example.com");
    let bob = UserRecord::new("bob", "bob@example.com");
    let root = UserRecord {
        role: Role::Admin,
        ..UserRecord::new("root", "root@example.com")
    };
    users_repo.insert(&alice).await.unwrap();
    users_repo.insert(&bob).await.unwrap();
    users_repo.insert(&root).await.unwrap();

    TestEnv {
        content,
        likes,
        admin,
        blob,
        images_repo,
        tags_repo,
        likes_repo,
        users_repo,
        alice,
        bob,
        root,
        blob_dir,
    }
}

pub fn ctx(user: &UserRecord) -> RequestContext {
    match user.role {
        Role::Admin => RequestContext::admin(user.id, user.username.clone()),
        Role::User => RequestContext::authenticated(user.id, user.username.clone()),
    }
}

pub fn jpeg_upload(title: &str, tags: &[&str]) -> UploadRequest {
    UploadRequest {
        data: Bytes::from_static(b"\xff\xd8\xff\xe0 not a real jpeg"),
        content_type: "image/jpeg".to_string(),
        original_filename: Some(format!("{}.jpg", title.to_lowercase().replace(' ', "-"))),
        title: title.to_string(),
        description: None,
        tags: tags.iter().map(|tag| tag.to_string()).collect(),
    }
}
