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

//! Tests for tag normalization and find-or-create resolution

mod common;

use common::setup;
use plexgallery_content::{normalize_names, TagNormalizer};

#[test]
fn test_normalize_names_trims_lowercases_dedups() {
    let raw = vec![
        " Nature ".to_string(),
        "nature".to_string(),
        "NATURE".to_string(),
        String::new(),
        "   ".to_string(),
        "Sky".to_string(),
    ];

    let normalized = normalize_names(&raw);
    let names: Vec<&str> = normalized.iter().map(String::as_str).collect();
    assert_eq!(names, vec!["nature", "sky"]);
}

#[test]
fn test_normalize_names_empty_input() {
    assert!(normalize_names(&[]).is_empty());
    assert!(normalize_names(&["  ".to_string()]).is_empty());
}

#[tokio::test]
async fn test_resolve_creates_then_reuses() {
    let env = setup().await;
    let normalizer = TagNormalizer::new(env.tags_repo.clone());

    let first = normalizer
        .resolve(&["Alpine".to_string(), "alpine".to_string()])
        .await
        .unwrap();
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].name, "alpine");

    // A second resolution returns the same row, not a duplicate
    let second = normalizer.resolve(&["ALPINE ".to_string()]).await.unwrap();
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].id, first[0].id);
}

#[tokio::test]
async fn test_resolve_mixes_existing_and_new() {
    let env = setup().await;
    let normalizer = TagNormalizer::new(env.tags_repo.clone());

    normalizer.resolve(&["existing".to_string()]).await.unwrap();

    let mut resolved = normalizer
        .resolve(&["existing".to_string(), "brand-new".to_string()])
        .await
        .unwrap();
    resolved.sort_by(|a, b| a.name.cmp(&b.name));

    assert_eq!(resolved.len(), 2);
    assert_eq!(resolved[0].name, "brand-new");
    assert_eq!(resolved[1].name, "existing");
}

#[tokio::test]
async fn test_resolve_empty_is_empty() {
    let env = setup().await;
    let normalizer = TagNormalizer::new(env.tags_repo.clone());

    assert!(normalizer.resolve(&[]).await.unwrap().is_empty());
    assert!(normalizer
        .resolve(&["  ".to_string(), String::new()])
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_concurrent_resolution_of_same_name() {
    let env = setup().await;
    let normalizer_a = TagNormalizer::new(env.tags_repo.clone());
    let normalizer_b = TagNormalizer::new(env.tags_repo.clone());

    // Concurrent creation of the same new name: the unique constraint
    // arbitrates and both callers get the surviving row
    let names_a = ["glacier".to_string()];
    let names_b = ["Glacier".to_string()];
    let (a, b) = tokio::join!(
        normalizer_a.resolve(&names_a),
        normalizer_b.resolve(&names_b),
    );

    let a = a.unwrap();
    let b = b.unwrap();
    assert_eq!(a.len(), 1);
    assert_eq!(b.len(), 1);
    assert_eq!(a[0].id, b[0].id);
}
