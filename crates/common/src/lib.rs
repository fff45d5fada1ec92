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

//! Shared primitives for PlexGallery services
//!
//! ## Purpose
//! Provides the request-scoped caller identity and the paging primitives that
//! every gallery operation receives as explicit parameters. The
//! authentication layer produces a [`RequestContext`] per request; the core
//! never re-validates credentials and never reads ambient security state.

pub mod page;
pub mod request_context;

pub use page::{Page, PageRequest};
pub use request_context::RequestContext;
