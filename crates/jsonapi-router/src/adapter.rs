// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use async_trait::async_trait;
use thiserror::Error;

use jsonapi_model::document::{PrimaryData, RelationshipData, ResourceIdentifier, ResourceObject};

/// Storage for one resource type
///
/// The router registers one adapter per resource type and calls the method matching the
/// classified operation. Ids and relationship names come straight from the URL; documents have
/// already been decoded and checked against the URL.
#[async_trait]
pub trait ResourceAdapter: Send + Sync {
    async fn query(&self) -> Result<Vec<ResourceObject>, AdapterError>;

    /// Create a resource. `resource.id` is set when the client supplied an id.
    async fn create(&self, resource: ResourceObject) -> Result<ResourceObject, AdapterError>;

    async fn read(&self, id: &str) -> Result<Option<ResourceObject>, AdapterError>;

    /// Apply a partial update: attributes and relationships missing from `resource` keep their
    /// current values.
    async fn update(
        &self,
        id: &str,
        resource: ResourceObject,
    ) -> Result<ResourceObject, AdapterError>;

    async fn delete(&self, id: &str) -> Result<(), AdapterError>;

    async fn read_related(
        &self,
        id: &str,
        relationship: &str,
    ) -> Result<PrimaryData, AdapterError>;

    async fn read_relationship(
        &self,
        id: &str,
        relationship: &str,
    ) -> Result<RelationshipData, AdapterError>;

    async fn replace_relationship(
        &self,
        id: &str,
        relationship: &str,
        data: RelationshipData,
    ) -> Result<(), AdapterError>;

    async fn add_to_relationship(
        &self,
        id: &str,
        relationship: &str,
        members: Vec<ResourceIdentifier>,
    ) -> Result<(), AdapterError>;

    async fn remove_from_relationship(
        &self,
        id: &str,
        relationship: &str,
        members: Vec<ResourceIdentifier>,
    ) -> Result<(), AdapterError>;
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdapterError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Internal(String),
}
