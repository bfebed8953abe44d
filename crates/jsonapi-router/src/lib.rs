// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Routing for JSON:API endpoints: decomposes request paths, classifies the request, negotiates
//! content, and dispatches to the [`ResourceAdapter`] registered for the resource type.

pub mod adapter;
pub mod config;
pub mod error;
pub mod memory;
pub mod negotiation;
pub mod path;
mod router;

pub use adapter::{AdapterError, ResourceAdapter};
pub use config::JsonApiRouterConfig;
pub use error::JsonApiError;
pub use memory::{MemoryAdapter, MemoryStore};
pub use router::JsonApiRouter;
