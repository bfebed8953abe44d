// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! A schemaless, in-memory store with one [`MemoryAdapter`] per resource type
//!
//! All adapters created from the same [`MemoryStore`] share it, so relationship linkage can
//! point across resource types. Relationships exist once a resource has been created or updated
//! with them.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use indexmap::IndexMap;

use jsonapi_model::document::{
    PrimaryData, Relationship, RelationshipData, ResourceIdentifier, ResourceObject,
};

use crate::adapter::{AdapterError, ResourceAdapter};

#[derive(Default)]
struct Collection {
    // Insertion order is the listing order
    resources: IndexMap<String, ResourceObject>,
    last_id: u64,
}

impl Collection {
    fn generate_id(&mut self) -> String {
        loop {
            self.last_id += 1;
            let id = self.last_id.to_string();
            if !self.resources.contains_key(&id) {
                return id;
            }
        }
    }
}

type Collections = HashMap<String, Collection>;

#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// The adapter serving `resource_type` from this store
    pub fn adapter(self: &Arc<Self>, resource_type: &str) -> MemoryAdapter {
        self.write().entry(resource_type.to_string()).or_default();

        MemoryAdapter {
            resource_type: resource_type.to_string(),
            store: self.clone(),
        }
    }

    // A panic while holding the lock cannot leave a collection half-updated (every mutation is a
    // single insert/remove/extend), so a poisoned lock is still safe to use
    fn read(&self) -> RwLockReadGuard<'_, Collections> {
        self.collections
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Collections> {
        self.collections
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

pub struct MemoryAdapter {
    resource_type: String,
    store: Arc<MemoryStore>,
}

fn lookup(collections: &Collections, identifier: &ResourceIdentifier) -> Option<ResourceObject> {
    collections
        .get(&identifier.resource_type)
        .and_then(|collection| collection.resources.get(&identifier.id))
        .cloned()
}

fn check_linkage<'a>(
    collections: &Collections,
    identifiers: impl IntoIterator<Item = &'a ResourceIdentifier>,
) -> Result<(), AdapterError> {
    for identifier in identifiers {
        if lookup(collections, identifier).is_none() {
            return Err(AdapterError::NotFound(format!(
                "Related resource {}/{} does not exist",
                identifier.resource_type, identifier.id
            )));
        }
    }
    Ok(())
}

/// A stored relationship keeps its cardinality: to-one linkage cannot replace to-many or vice versa
fn check_cardinality(
    existing: Option<&Relationship>,
    relationship: &str,
    data: &RelationshipData,
) -> Result<(), AdapterError> {
    match existing {
        Some(existing) if existing.data.is_to_many() != data.is_to_many() => {
            let cardinality = if existing.data.is_to_many() {
                "to-many"
            } else {
                "to-one"
            };
            Err(AdapterError::BadRequest(format!(
                "Relationship {relationship} is {cardinality}"
            )))
        }
        _ => Ok(()),
    }
}

fn relationship_identifiers(resource: &ResourceObject) -> Vec<&ResourceIdentifier> {
    resource
        .relationships
        .values()
        .flat_map(|relationship| relationship.data.identifiers())
        .collect()
}

impl MemoryAdapter {
    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    fn not_found(&self, id: &str) -> AdapterError {
        AdapterError::NotFound(format!("Resource {}/{} not found", self.resource_type, id))
    }

    fn relationship_not_found(&self, id: &str, relationship: &str) -> AdapterError {
        AdapterError::NotFound(format!(
            "Relationship {} not found on {}/{}",
            relationship, self.resource_type, id
        ))
    }

    fn resource<'a>(
        &self,
        collections: &'a Collections,
        id: &str,
    ) -> Result<&'a ResourceObject, AdapterError> {
        collections
            .get(&self.resource_type)
            .and_then(|collection| collection.resources.get(id))
            .ok_or_else(|| self.not_found(id))
    }

    fn resource_mut<'a>(
        &self,
        collections: &'a mut Collections,
        id: &str,
    ) -> Result<&'a mut ResourceObject, AdapterError> {
        collections
            .get_mut(&self.resource_type)
            .and_then(|collection| collection.resources.get_mut(id))
            .ok_or_else(|| self.not_found(id))
    }

    fn linkage(
        &self,
        collections: &Collections,
        id: &str,
        relationship: &str,
    ) -> Result<RelationshipData, AdapterError> {
        self.resource(collections, id)?
            .relationships
            .get(relationship)
            .map(|relationship| relationship.data.clone())
            .ok_or_else(|| self.relationship_not_found(id, relationship))
    }

    fn to_many_members<'a>(
        &self,
        resource: &'a mut ResourceObject,
        id: &str,
        relationship: &str,
    ) -> Result<&'a mut Vec<ResourceIdentifier>, AdapterError> {
        match resource.relationships.get_mut(relationship) {
            Some(Relationship {
                data: RelationshipData::ToMany(members),
            }) => Ok(members),
            Some(_) => Err(AdapterError::Forbidden(format!(
                "Relationship {relationship} is to-one; members can only be replaced"
            ))),
            None => Err(self.relationship_not_found(id, relationship)),
        }
    }
}

#[async_trait]
impl ResourceAdapter for MemoryAdapter {
    async fn query(&self) -> Result<Vec<ResourceObject>, AdapterError> {
        let collections = self.store.read();

        Ok(collections
            .get(&self.resource_type)
            .map(|collection| collection.resources.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn create(&self, mut resource: ResourceObject) -> Result<ResourceObject, AdapterError> {
        let mut collections = self.store.write();
        check_linkage(&collections, relationship_identifiers(&resource))?;

        let collection = collections.entry(self.resource_type.clone()).or_default();

        let id = match resource.id.take() {
            Some(id) if collection.resources.contains_key(&id) => {
                return Err(AdapterError::Conflict(format!(
                    "Resource {}/{} already exists",
                    self.resource_type, id
                )));
            }
            Some(id) => id,
            None => collection.generate_id(),
        };

        resource.resource_type = self.resource_type.clone();
        resource.id = Some(id.clone());
        collection.resources.insert(id, resource.clone());

        tracing::debug!("Created {}/{:?}", self.resource_type, resource.id);

        Ok(resource)
    }

    async fn read(&self, id: &str) -> Result<Option<ResourceObject>, AdapterError> {
        let collections = self.store.read();

        match self.resource(&collections, id) {
            Ok(resource) => Ok(Some(resource.clone())),
            Err(AdapterError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn update(
        &self,
        id: &str,
        resource: ResourceObject,
    ) -> Result<ResourceObject, AdapterError> {
        let mut collections = self.store.write();
        check_linkage(&collections, relationship_identifiers(&resource))?;

        let existing = self.resource_mut(&mut collections, id)?;
        for (name, relationship) in &resource.relationships {
            check_cardinality(existing.relationships.get(name), name, &relationship.data)?;
        }

        existing.attributes.extend(resource.attributes);
        existing.relationships.extend(resource.relationships);

        Ok(existing.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), AdapterError> {
        let mut collections = self.store.write();

        collections
            .get_mut(&self.resource_type)
            .and_then(|collection| collection.resources.shift_remove(id))
            .map(|_| ())
            .ok_or_else(|| self.not_found(id))
    }

    async fn read_related(
        &self,
        id: &str,
        relationship: &str,
    ) -> Result<PrimaryData, AdapterError> {
        let collections = self.store.read();

        // Dangling linkage (the related resource was deleted) reads as empty
        Ok(match self.linkage(&collections, id, relationship)? {
            RelationshipData::ToOne(None) => PrimaryData::Null,
            RelationshipData::ToOne(Some(identifier)) => lookup(&collections, &identifier)
                .map(|resource| PrimaryData::Resource(Box::new(resource)))
                .unwrap_or(PrimaryData::Null),
            RelationshipData::ToMany(identifiers) => PrimaryData::Resources(
                identifiers
                    .iter()
                    .filter_map(|identifier| lookup(&collections, identifier))
                    .collect(),
            ),
        })
    }

    async fn read_relationship(
        &self,
        id: &str,
        relationship: &str,
    ) -> Result<RelationshipData, AdapterError> {
        let collections = self.store.read();
        self.linkage(&collections, id, relationship)
    }

    async fn replace_relationship(
        &self,
        id: &str,
        relationship: &str,
        data: RelationshipData,
    ) -> Result<(), AdapterError> {
        let mut collections = self.store.write();
        check_linkage(&collections, data.identifiers())?;

        let resource = self.resource_mut(&mut collections, id)?;

        check_cardinality(resource.relationships.get(relationship), relationship, &data)?;
        resource
            .relationships
            .insert(relationship.to_string(), Relationship { data });

        Ok(())
    }

    async fn add_to_relationship(
        &self,
        id: &str,
        relationship: &str,
        members: Vec<ResourceIdentifier>,
    ) -> Result<(), AdapterError> {
        let mut collections = self.store.write();
        check_linkage(&collections, members.iter())?;

        let resource = self.resource_mut(&mut collections, id)?;
        let existing = self.to_many_members(resource, id, relationship)?;

        for member in members {
            if !existing.contains(&member) {
                existing.push(member);
            }
        }

        Ok(())
    }

    async fn remove_from_relationship(
        &self,
        id: &str,
        relationship: &str,
        members: Vec<ResourceIdentifier>,
    ) -> Result<(), AdapterError> {
        let mut collections = self.store.write();

        let resource = self.resource_mut(&mut collections, id)?;
        let existing = self.to_many_members(resource, id, relationship)?;
        existing.retain(|member| !members.contains(member));

        Ok(())
    }
}
