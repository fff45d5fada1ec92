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

//! Request context carrying the authenticated caller
//!
//! ## Purpose
//! Carries caller identity and request metadata through the call chain.
//! The authentication collaborator resolves credentials once per request and
//! builds one of these; gallery services receive it as an explicit parameter.
//!
//! ## Design Philosophy
//! - **Explicit identity**: no ambient/thread-local security state
//! - **Tracing**: request_id for correlating log lines
//! - **Immutable**: contexts are passed by reference, never mutated

use chrono::{DateTime, Utc};
use ulid::Ulid;
use uuid::Uuid;

/// Request-scoped caller identity
///
/// ## Usage Pattern
/// ```rust
/// use plexgallery_common::RequestContext;
/// use uuid::Uuid;
///
/// let user_id = Uuid::new_v4();
/// let ctx = RequestContext::authenticated(user_id, "alice");
/// assert!(ctx.is_authenticated());
/// assert!(!ctx.is_admin());
///
/// let anon = RequestContext::anonymous();
/// assert!(!anon.is_authenticated());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestContext {
    /// Authenticated user id, None for anonymous browsing
    pub user_id: Option<Uuid>,

    /// Username matching `user_id`, for logging and display
    pub username: Option<String>,

    /// Admin flag (from the caller's resolved role)
    ///
    /// When true, the caller may delete any image and run moderation
    /// operations. The flag is resolved by the auth layer; this core trusts
    /// it as given.
    pub admin: bool,

    /// Request ID (for tracing)
    pub request_id: String,

    /// Request timestamp
    pub timestamp: DateTime<Utc>,
}

impl RequestContext {
    /// Create a context for an authenticated regular user
    pub fn authenticated(user_id: Uuid, username: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id),
            username: Some(username.into()),
            admin: false,
            request_id: Ulid::new().to_string(),
            timestamp: Utc::now(),
        }
    }

    /// Create a context for an authenticated administrator
    pub fn admin(user_id: Uuid, username: impl Into<String>) -> Self {
        Self {
            admin: true,
            ..Self::authenticated(user_id, username)
        }
    }

    /// Create a context for an unauthenticated caller
    ///
    /// Anonymous contexts can browse and search; per-viewer like state is
    /// always reported as false.
    pub fn anonymous() -> Self {
        Self {
            user_id: None,
            username: None,
            admin: false,
            request_id: Ulid::new().to_string(),
            timestamp: Utc::now(),
        }
    }

    /// Whether the caller is authenticated
    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }

    /// Whether the caller has admin privileges
    pub fn is_admin(&self) -> bool {
        self.admin
    }

    /// Username for log lines, "anonymous" when unauthenticated
    pub fn display_name(&self) -> &str {
        self.username.as_deref().unwrap_or("anonymous")
    }
}
