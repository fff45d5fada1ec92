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

//! SQL implementations of the metadata repositories
//!
//! Runs on `sqlx::Any`: SQLite in tests, PostgreSQL in production. Ids are
//! TEXT uuids, timestamps TEXT RFC 3339 in UTC (fixed offset, so lexical
//! comparison matches chronological order). Unique constraints on
//! `tags.name` and `image_likes(image_id, user_id)` arbitrate concurrent
//! writers.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::any::{AnyPoolOptions, AnyRow};
use sqlx::{AnyPool, Row};
use tracing::info;
use uuid::Uuid;

use super::{
    ImageRepository, LeaderboardRow, LikeRepository, TagMatch, TagRepository, UserRepository,
};
use crate::error::{GalleryError, GalleryResult};
use crate::model::{ImageRecord, LikeRecord, Role, TagRecord, UserRecord};

/// Connect to the metadata store
///
/// IMPORTANT: in-memory SQLite gets a single connection so every operation
/// sees the same database.
pub async fn connect(url: &str) -> Result<AnyPool, sqlx::Error> {
    sqlx::any::install_default_drivers();

    let max_connections = if url.contains(":memory:") { 1 } else { 10 };
    AnyPoolOptions::new()
        .max_connections(max_connections)
        .connect(url)
        .await
}

/// Create the metadata tables and indexes
///
/// The DDL is shared between SQLite and PostgreSQL: TEXT ids and
/// timestamps, INTEGER flags, no backend-specific column types.
pub async fn migrate(pool: &AnyPool) -> Result<(), sqlx::Error> {
    info!("running gallery metadata migrations");

    let mut conn = pool.acquire().await?;

    let statements = [
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            username TEXT NOT NULL UNIQUE,
            email TEXT NOT NULL UNIQUE,
            role TEXT NOT NULL,
            enabled INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS image_metadata (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT,
            blob_key TEXT NOT NULL UNIQUE,
            original_filename TEXT,
            content_type TEXT NOT NULL,
            size_bytes BIGINT NOT NULL,
            owner_id TEXT NOT NULL,
            uploaded_at TEXT NOT NULL
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS tags (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            created_at TEXT NOT NULL
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS image_tags (
            image_id TEXT NOT NULL,
            tag_id TEXT NOT NULL,
            PRIMARY KEY (image_id, tag_id)
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS image_likes (
            id TEXT PRIMARY KEY,
            image_id TEXT NOT NULL,
            user_id TEXT NOT NULL,
            liked_at TEXT NOT NULL,
            UNIQUE (image_id, user_id)
        )
        "#,
        r#"
        CREATE INDEX IF NOT EXISTS idx_image_metadata_uploaded_at
        ON image_metadata(uploaded_at)
        "#,
        r#"
        CREATE INDEX IF NOT EXISTS idx_image_metadata_owner
        ON image_metadata(owner_id)
        "#,
        r#"
        CREATE INDEX IF NOT EXISTS idx_image_likes_liked_at
        ON image_likes(liked_at)
        "#,
        r#"
        CREATE INDEX IF NOT EXISTS idx_image_tags_tag
        ON image_tags(tag_id)
        "#,
    ];

    for statement in statements {
        sqlx::query(statement).execute(&mut *conn).await?;
    }

    info!("gallery metadata migrations completed");
    Ok(())
}

fn parse_uuid(value: &str, field: &str) -> GalleryResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|e| GalleryError::InternalError(format!("Failed to parse {}: {}", field, e)))
}

fn parse_datetime(value: &str, field: &str) -> GalleryResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| GalleryError::InternalError(format!("Failed to parse {}: {}", field, e)))
}

fn row_to_image(row: &AnyRow) -> GalleryResult<ImageRecord> {
    let id: String = row.try_get("id")?;
    let owner_id: String = row.try_get("owner_id")?;
    let uploaded_at: String = row.try_get("uploaded_at")?;

    Ok(ImageRecord {
        id: parse_uuid(&id, "image id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        blob_key: row.try_get("blob_key")?,
        original_filename: row.try_get("original_filename")?,
        content_type: row.try_get("content_type")?,
        size_bytes: row.try_get("size_bytes")?,
        owner_id: parse_uuid(&owner_id, "owner id")?,
        uploaded_at: parse_datetime(&uploaded_at, "uploaded_at")?,
    })
}

fn row_to_tag(row: &AnyRow) -> GalleryResult<TagRecord> {
    let id: String = row.try_get("id")?;
    let created_at: String = row.try_get("created_at")?;

    Ok(TagRecord {
        id: parse_uuid(&id, "tag id")?,
        name: row.try_get("name")?,
        created_at: parse_datetime(&created_at, "created_at")?,
    })
}

fn row_to_like(row: &AnyRow) -> GalleryResult<LikeRecord> {
    let id: String = row.try_get("id")?;
    let image_id: String = row.try_get("image_id")?;
    let user_id: String = row.try_get("user_id")?;
    let liked_at: String = row.try_get("liked_at")?;

    Ok(LikeRecord {
        id: parse_uuid(&id, "like id")?,
        image_id: parse_uuid(&image_id, "image id")?,
        user_id: parse_uuid(&user_id, "user id")?,
        liked_at: parse_datetime(&liked_at, "liked_at")?,
    })
}

fn row_to_user(row: &AnyRow) -> GalleryResult<UserRecord> {
    let id: String = row.try_get("id")?;
    let role: String = row.try_get("role")?;
    let enabled: i64 = row.try_get("enabled")?;
    let created_at: String = row.try_get("created_at")?;

    Ok(UserRecord {
        id: parse_uuid(&id, "user id")?,
        username: row.try_get("username")?,
        email: row.try_get("email")?,
        role: role.parse()?,
        enabled: enabled != 0,
        created_at: parse_datetime(&created_at, "created_at")?,
    })
}

/// `$start, $start+1, ..` placeholder list for dynamic IN clauses
fn placeholders(start: usize, count: usize) -> String {
    (start..start + count)
        .map(|i| format!("${}", i))
        .collect::<Vec<_>>()
        .join(", ")
}

/// SQL image metadata repository
pub struct SqlImageRepository {
    pool: AnyPool,
}

impl SqlImageRepository {
    pub fn new(pool: AnyPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ImageRepository for SqlImageRepository {
    async fn insert_with_tags(&self, image: &ImageRecord, tag_ids: &[Uuid]) -> GalleryResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO image_metadata (
                id, title, description, blob_key, original_filename,
                content_type, size_bytes, owner_id, uploaded_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(image.id.to_string())
        .bind(&image.title)
        .bind(image.description.as_deref())
        .bind(&image.blob_key)
        .bind(image.original_filename.as_deref())
        .bind(&image.content_type)
        .bind(image.size_bytes)
        .bind(image.owner_id.to_string())
        .bind(image.uploaded_at.to_rfc3339())
        .execute(&mut *tx)
        .await?;

        for tag_id in tag_ids {
            sqlx::query("INSERT INTO image_tags (image_id, tag_id) VALUES ($1, $2)")
                .bind(image.id.to_string())
                .bind(tag_id.to_string())
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn get(&self, id: Uuid) -> GalleryResult<Option<ImageRecord>> {
        let row = sqlx::query(
            r#"
            SELECT id, title, description, blob_key, original_filename,
                   content_type, size_bytes, owner_id, uploaded_at
            FROM image_metadata
            WHERE id = $1
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_image).transpose()
    }

    async fn list(&self, limit: i64, offset: i64) -> GalleryResult<(Vec<ImageRecord>, i64)> {
        let total: i64 = sqlx::query("SELECT COUNT(*) FROM image_metadata")
            .fetch_one(&self.pool)
            .await?
            .get(0);

        let rows = sqlx::query(
            r#"
            SELECT id, title, description, blob_key, original_filename,
                   content_type, size_bytes, owner_id, uploaded_at
            FROM image_metadata
            ORDER BY uploaded_at DESC, id ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let mut results = Vec::with_capacity(rows.len());
        for row in &rows {
            results.push(row_to_image(row)?);
        }
        Ok((results, total))
    }

    async fn list_by_owner(
        &self,
        owner_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> GalleryResult<(Vec<ImageRecord>, i64)> {
        let total: i64 = sqlx::query("SELECT COUNT(*) FROM image_metadata WHERE owner_id = $1")
            .bind(owner_id.to_string())
            .fetch_one(&self.pool)
            .await?
            .get(0);

        let rows = sqlx::query(
            r#"
            SELECT id, title, description, blob_key, original_filename,
                   content_type, size_bytes, owner_id, uploaded_at
            FROM image_metadata
            WHERE owner_id = $1
            ORDER BY uploaded_at DESC, id ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(owner_id.to_string())
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let mut results = Vec::with_capacity(rows.len());
        for row in &rows {
            results.push(row_to_image(row)?);
        }
        Ok((results, total))
    }

    async fn all_by_owner(&self, owner_id: Uuid) -> GalleryResult<Vec<ImageRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, description, blob_key, original_filename,
                   content_type, size_bytes, owner_id, uploaded_at
            FROM image_metadata
            WHERE owner_id = $1
            ORDER BY uploaded_at DESC, id ASC
            "#,
        )
        .bind(owner_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        let mut results = Vec::with_capacity(rows.len());
        for row in &rows {
            results.push(row_to_image(row)?);
        }
        Ok(results)
    }

    async fn search_text(
        &self,
        query: &str,
        limit: i64,
        offset: i64,
    ) -> GalleryResult<(Vec<ImageRecord>, i64)> {
        let pattern = format!("%{}%", query.trim().to_lowercase());

        let total: i64 = sqlx::query(
            r#"
            SELECT COUNT(*)
            FROM image_metadata
            WHERE LOWER(title) LIKE $1 OR LOWER(COALESCE(description, '')) LIKE $2
            "#,
        )
        .bind(&pattern)
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await?
        .get(0);

        let rows = sqlx::query(
            r#"
            SELECT id, title, description, blob_key, original_filename,
                   content_type, size_bytes, owner_id, uploaded_at
            FROM image_metadata
            WHERE LOWER(title) LIKE $1 OR LOWER(COALESCE(description, '')) LIKE $2
            ORDER BY uploaded_at DESC, id ASC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(&pattern)
        .bind(&pattern)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let mut results = Vec::with_capacity(rows.len());
        for row in &rows {
            results.push(row_to_image(row)?);
        }
        Ok((results, total))
    }

    async fn search_tags(
        &self,
        names: &[String],
        mode: TagMatch,
        limit: i64,
        offset: i64,
    ) -> GalleryResult<(Vec<ImageRecord>, i64)> {
        if names.is_empty() {
            return Ok((Vec::new(), 0));
        }

        let in_list = placeholders(1, names.len());

        let (count_sql, list_sql) = match mode {
            TagMatch::Any => (
                format!(
                    r#"
                    SELECT COUNT(DISTINCT i.id)
                    FROM image_metadata i
                    JOIN image_tags it ON it.image_id = i.id
                    JOIN tags t ON t.id = it.tag_id
                    WHERE t.name IN ({in_list})
                    "#
                ),
                format!(
                    r#"
                    SELECT DISTINCT i.id, i.title, i.description, i.blob_key,
                           i.original_filename, i.content_type, i.size_bytes,
                           i.owner_id, i.uploaded_at
                    FROM image_metadata i
                    JOIN image_tags it ON it.image_id = i.id
                    JOIN tags t ON t.id = it.tag_id
                    WHERE t.name IN ({in_list})
                    ORDER BY i.uploaded_at DESC, i.id ASC
                    LIMIT ${} OFFSET ${}
                    "#,
                    names.len() + 1,
                    names.len() + 2
                ),
            ),
            // Superset match: the count of distinct matched names must equal
            // the number of distinct requested names, intersection is not
            // enough
            TagMatch::All => (
                format!(
                    r#"
                    SELECT COUNT(*) FROM (
                        SELECT i.id
                        FROM image_metadata i
                        JOIN image_tags it ON it.image_id = i.id
                        JOIN tags t ON t.id = it.tag_id
                        WHERE t.name IN ({in_list})
                        GROUP BY i.id
                        HAVING COUNT(DISTINCT t.name) = ${}
                    ) matched
                    "#,
                    names.len() + 1
                ),
                format!(
                    r#"
                    SELECT i.id, i.title, i.description, i.blob_key,
                           i.original_filename, i.content_type, i.size_bytes,
                           i.owner_id, i.uploaded_at
                    FROM image_metadata i
                    JOIN image_tags it ON it.image_id = i.id
                    JOIN tags t ON t.id = it.tag_id
                    WHERE t.name IN ({in_list})
                    GROUP BY i.id, i.title, i.description, i.blob_key,
                             i.original_filename, i.content_type, i.size_bytes,
                             i.owner_id, i.uploaded_at
                    HAVING COUNT(DISTINCT t.name) = ${}
                    ORDER BY i.uploaded_at DESC, i.id ASC
                    LIMIT ${} OFFSET ${}
                    "#,
                    names.len() + 1,
                    names.len() + 2,
                    names.len() + 3
                ),
            ),
        };

        let mut count_query = sqlx::query(&count_sql);
        for name in names {
            count_query = count_query.bind(name);
        }
        if mode == TagMatch::All {
            count_query = count_query.bind(names.len() as i64);
        }
        let total: i64 = count_query.fetch_one(&self.pool).await?.get(0);

        let mut list_query = sqlx::query(&list_sql);
        for name in names {
            list_query = list_query.bind(name);
        }
        if mode == TagMatch::All {
            list_query = list_query.bind(names.len() as i64);
        }
        let rows = list_query
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        let mut results = Vec::with_capacity(rows.len());
        for row in &rows {
            results.push(row_to_image(row)?);
        }
        Ok((results, total))
    }

    async fn delete(&self, id: Uuid) -> GalleryResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM image_tags WHERE image_id = $1")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM image_likes WHERE image_id = $1")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM image_metadata WHERE id = $1")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn tag_names(&self, image_id: Uuid) -> GalleryResult<Vec<String>> {
        let rows = sqlx::query(
            r#"
            SELECT t.name
            FROM tags t
            JOIN image_tags it ON it.tag_id = t.id
            WHERE it.image_id = $1
            ORDER BY t.name ASC
            "#,
        )
        .bind(image_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        let mut names = Vec::with_capacity(rows.len());
        for row in &rows {
            names.push(row.try_get("name")?);
        }
        Ok(names)
    }

    async fn count(&self) -> GalleryResult<i64> {
        let total: i64 = sqlx::query("SELECT COUNT(*) FROM image_metadata")
            .fetch_one(&self.pool)
            .await?
            .get(0);
        Ok(total)
    }

    async fn count_by_owner(&self, owner_id: Uuid) -> GalleryResult<i64> {
        let total: i64 = sqlx::query("SELECT COUNT(*) FROM image_metadata WHERE owner_id = $1")
            .bind(owner_id.to_string())
            .fetch_one(&self.pool)
            .await?
            .get(0);
        Ok(total)
    }

    async fn total_size_bytes(&self) -> GalleryResult<i64> {
        let total: i64 = sqlx::query("SELECT COALESCE(SUM(size_bytes), 0) FROM image_metadata")
            .fetch_one(&self.pool)
            .await?
            .get(0);
        Ok(total)
    }
}

/// SQL tag catalog repository
pub struct SqlTagRepository {
    pool: AnyPool,
}

impl SqlTagRepository {
    pub fn new(pool: AnyPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TagRepository for SqlTagRepository {
    async fn find_by_names(&self, names: &[String]) -> GalleryResult<Vec<TagRecord>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT id, name, created_at FROM tags WHERE name IN ({}) ORDER BY name ASC",
            placeholders(1, names.len())
        );

        let mut query = sqlx::query(&sql);
        for name in names {
            query = query.bind(name);
        }
        let rows = query.fetch_all(&self.pool).await?;

        let mut results = Vec::with_capacity(rows.len());
        for row in &rows {
            results.push(row_to_tag(row)?);
        }
        Ok(results)
    }

    async fn get_by_name(&self, name: &str) -> GalleryResult<Option<TagRecord>> {
        let row = sqlx::query("SELECT id, name, created_at FROM tags WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_tag).transpose()
    }

    async fn create_if_absent(&self, tag: &TagRecord) -> GalleryResult<()> {
        sqlx::query(
            r#"
            INSERT INTO tags (id, name, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT(name) DO NOTHING
            "#,
        )
        .bind(tag.id.to_string())
        .bind(&tag.name)
        .bind(tag.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn popular(&self, limit: i64) -> GalleryResult<Vec<(TagRecord, i64)>> {
        let rows = sqlx::query(
            r#"
            SELECT t.id, t.name, t.created_at, COUNT(it.image_id) AS image_count
            FROM tags t
            LEFT JOIN image_tags it ON it.tag_id = t.id
            GROUP BY t.id, t.name, t.created_at
            ORDER BY image_count DESC, t.name ASC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        let mut results = Vec::with_capacity(rows.len());
        for row in &rows {
            let image_count: i64 = row.try_get("image_count")?;
            results.push((row_to_tag(row)?, image_count));
        }
        Ok(results)
    }
}

/// SQL like repository
pub struct SqlLikeRepository {
    pool: AnyPool,
}

impl SqlLikeRepository {
    pub fn new(pool: AnyPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LikeRepository for SqlLikeRepository {
    async fn insert_if_absent(&self, like: &LikeRecord) -> GalleryResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO image_likes (id, image_id, user_id, liked_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT(image_id, user_id) DO NOTHING
            "#,
        )
        .bind(like.id.to_string())
        .bind(like.image_id.to_string())
        .bind(like.user_id.to_string())
        .bind(like.liked_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn delete(&self, image_id: Uuid, user_id: Uuid) -> GalleryResult<bool> {
        let result = sqlx::query("DELETE FROM image_likes WHERE image_id = $1 AND user_id = $2")
            .bind(image_id.to_string())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn exists(&self, image_id: Uuid, user_id: Uuid) -> GalleryResult<bool> {
        let total: i64 =
            sqlx::query("SELECT COUNT(*) FROM image_likes WHERE image_id = $1 AND user_id = $2")
                .bind(image_id.to_string())
                .bind(user_id.to_string())
                .fetch_one(&self.pool)
                .await?
                .get(0);
        Ok(total > 0)
    }

    async fn count_for_image(&self, image_id: Uuid) -> GalleryResult<i64> {
        let total: i64 = sqlx::query("SELECT COUNT(*) FROM image_likes WHERE image_id = $1")
            .bind(image_id.to_string())
            .fetch_one(&self.pool)
            .await?
            .get(0);
        Ok(total)
    }

    async fn count_all(&self) -> GalleryResult<i64> {
        let total: i64 = sqlx::query("SELECT COUNT(*) FROM image_likes")
            .fetch_one(&self.pool)
            .await?
            .get(0);
        Ok(total)
    }

    async fn for_image(
        &self,
        image_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> GalleryResult<(Vec<LikeRecord>, i64)> {
        let total = self.count_for_image(image_id).await?;

        let rows = sqlx::query(
            r#"
            SELECT id, image_id, user_id, liked_at
            FROM image_likes
            WHERE image_id = $1
            ORDER BY liked_at DESC, id ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(image_id.to_string())
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let mut results = Vec::with_capacity(rows.len());
        for row in &rows {
            results.push(row_to_like(row)?);
        }
        Ok((results, total))
    }

    async fn leaderboard(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        limit: Option<i64>,
    ) -> GalleryResult<Vec<LeaderboardRow>> {
        // Equal counts order by earliest upload, then image id, keeping
        // rankings stable across recomputations
        let mut sql = String::from(
            r#"
            SELECT l.image_id, i.title, i.blob_key, u.username,
                   COUNT(*) AS like_count
            FROM image_likes l
            JOIN image_metadata i ON i.id = l.image_id
            JOIN users u ON u.id = i.owner_id
            WHERE l.liked_at >= $1 AND l.liked_at < $2
            GROUP BY l.image_id, i.title, i.blob_key, u.username, i.uploaded_at
            ORDER BY like_count DESC, i.uploaded_at ASC, l.image_id ASC
            "#,
        );
        if limit.is_some() {
            sql.push_str(" LIMIT $3");
        }

        let mut query = sqlx::query(&sql)
            .bind(from.to_rfc3339())
            .bind(to.to_rfc3339());
        if let Some(limit) = limit {
            query = query.bind(limit);
        }
        let rows = query.fetch_all(&self.pool).await?;

        let mut results = Vec::with_capacity(rows.len());
        for row in &rows {
            let image_id: String = row.try_get("image_id")?;
            results.push(LeaderboardRow {
                image_id: parse_uuid(&image_id, "image id")?,
                title: row.try_get("title")?,
                blob_key: row.try_get("blob_key")?,
                uploader_username: row.try_get("username")?,
                like_count: row.try_get("like_count")?,
            });
        }
        Ok(results)
    }
}

/// SQL user repository
pub struct SqlUserRepository {
    pool: AnyPool,
}

impl SqlUserRepository {
    pub fn new(pool: AnyPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqlUserRepository {
    async fn insert(&self, user: &UserRecord) -> GalleryResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, role, enabled, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user.id.to_string())
        .bind(&user.username)
        .bind(&user.email)
        .bind(user.role.as_str())
        .bind(if user.enabled { 1_i64 } else { 0_i64 })
        .bind(user.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, id: Uuid) -> GalleryResult<Option<UserRecord>> {
        let row = sqlx::query(
            "SELECT id, username, email, role, enabled, created_at FROM users WHERE id = $1",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn list(&self, limit: i64, offset: i64) -> GalleryResult<(Vec<UserRecord>, i64)> {
        let total: i64 = sqlx::query("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?
            .get(0);

        let rows = sqlx::query(
            r#"
            SELECT id, username, email, role, enabled, created_at
            FROM users
            ORDER BY username ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let mut results = Vec::with_capacity(rows.len());
        for row in &rows {
            results.push(row_to_user(row)?);
        }
        Ok((results, total))
    }

    async fn delete(&self, id: Uuid) -> GalleryResult<()> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn set_role(&self, id: Uuid, role: Role) -> GalleryResult<()> {
        sqlx::query("UPDATE users SET role = $1 WHERE id = $2")
            .bind(role.as_str())
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn set_enabled(&self, id: Uuid, enabled: bool) -> GalleryResult<()> {
        sqlx::query("UPDATE users SET enabled = $1 WHERE id = $2")
            .bind(if enabled { 1_i64 } else { 0_i64 })
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn count(&self) -> GalleryResult<i64> {
        let total: i64 = sqlx::query("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?
            .get(0);
        Ok(total)
    }

    async fn count_by_role(&self, role: Role) -> GalleryResult<i64> {
        let total: i64 = sqlx::query("SELECT COUNT(*) FROM users WHERE role = $1")
            .bind(role.as_str())
            .fetch_one(&self.pool)
            .await?
            .get(0);
        Ok(total)
    }

    async fn count_by_enabled(&self, enabled: bool) -> GalleryResult<i64> {
        let total: i64 = sqlx::query("SELECT COUNT(*) FROM users WHERE enabled = $1")
            .bind(if enabled { 1_i64 } else { 0_i64 })
            .fetch_one(&self.pool)
            .await?
            .get(0);
        Ok(total)
    }
}
