// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use http::StatusCode;
use serde_json::Value;

use common::http::{RequestPayload, ResponsePayload};
use common::router::Router;
use jsonapi_model::document::{
    Document, DocumentError, PrimaryData, RelationshipData, RelationshipDocument,
    ResourceDocument, ResourceIdentifier, ResourceObject,
};
use jsonapi_model::{InboundRequestDescriptor, Method, OperationKind};

use crate::adapter::ResourceAdapter;
use crate::config::JsonApiRouterConfig;
use crate::error::{JsonApiError, document_response};
use crate::negotiation;
use crate::path::{PathMatch, ResourcePath};

/// Serves JSON:API resources under a path prefix, one [`ResourceAdapter`] per resource type
pub struct JsonApiRouter {
    config: JsonApiRouterConfig,
    adapters: HashMap<String, Arc<dyn ResourceAdapter>>,
}

/// Everything the router needs from the request head, extracted before the body is taken
struct RequestParts {
    method: http::Method,
    accept: Vec<String>,
    content_type: Option<String>,
}

impl JsonApiRouter {
    pub fn new(
        config: JsonApiRouterConfig,
        adapters: Vec<(String, Arc<dyn ResourceAdapter>)>,
    ) -> Self {
        Self {
            config,
            adapters: adapters.into_iter().collect(),
        }
    }

    pub fn resource_types(&self) -> impl Iterator<Item = &str> {
        self.adapters.keys().map(|resource_type| resource_type.as_str())
    }

    async fn resolve(
        &self,
        resource_path: ResourcePath,
        parts: RequestParts,
        request: &mut (dyn RequestPayload + Send),
    ) -> Result<ResponsePayload, JsonApiError> {
        let method =
            Method::try_from(&parts.method).map_err(|e| JsonApiError::MethodNotAllowed {
                method: e.0,
                allow: allowed_methods(&resource_path),
            })?;

        let descriptor = resource_path.to_descriptor(method);
        let kind = classify(&descriptor, &resource_path)?;

        tracing::debug!(
            "Classified {} {}/{:?}/{:?} (relationships: {}) as {}",
            method,
            descriptor.resource_type(),
            descriptor.resource_id(),
            descriptor.relationship_name(),
            descriptor.has_relationships_keyword(),
            kind
        );

        let adapter = self
            .adapters
            .get(descriptor.resource_type())
            .ok_or_else(|| {
                JsonApiError::NotFound(format!(
                    "Unknown resource type {}",
                    descriptor.resource_type()
                ))
            })?;

        if self.config.strict_content_negotiation {
            negotiation::check_accept(&parts.accept)?;
            if kind.expects_document() {
                negotiation::check_content_type(parts.content_type.as_deref())?;
            }
        }

        // Decoded only after negotiation, and only for kinds that carry a document
        let body = if kind.expects_document() {
            request.take_body().map_err(DocumentError::from)?
        } else {
            Value::Null
        };

        self.dispatch(kind, &descriptor, adapter.as_ref(), body).await
    }

    async fn dispatch(
        &self,
        kind: OperationKind,
        descriptor: &InboundRequestDescriptor,
        adapter: &dyn ResourceAdapter,
        body: Value,
    ) -> Result<ResponsePayload, JsonApiError> {
        let resource_type = descriptor.resource_type();

        match kind {
            OperationKind::Index => {
                let resources = adapter.query().await?;
                Ok(ok(PrimaryData::Resources(resources)))
            }
            OperationKind::CreateResource => {
                let mut resource = ResourceDocument::from_value(body)?.data;
                check_type(&resource, resource_type)?;
                // An empty client id is no id: leave it to the adapter to generate one
                if resource.id.as_deref() == Some("") {
                    resource.id = None;
                }

                let created = adapter.create(resource).await?;
                let mut response = document_response(
                    StatusCode::CREATED,
                    &Document::data(PrimaryData::Resource(Box::new(created.clone()))),
                );
                if let Some(id) = &created.id {
                    response.headers.insert(
                        http::header::LOCATION.to_string(),
                        format!(
                            "{}/{}/{}",
                            self.config.path_prefix,
                            resource_type,
                            urlencoding::encode(id)
                        ),
                    );
                }
                Ok(response)
            }
            OperationKind::ReadResource => {
                let id = require_id(descriptor)?;
                match adapter.read(id).await? {
                    Some(resource) => Ok(ok(PrimaryData::Resource(Box::new(resource)))),
                    None => Err(JsonApiError::NotFound(format!(
                        "Resource {resource_type}/{id} not found"
                    ))),
                }
            }
            OperationKind::UpdateResource => {
                let id = require_id(descriptor)?;
                let resource = ResourceDocument::from_value(body)?.data;
                check_type(&resource, resource_type)?;
                match resource.id.as_deref() {
                    Some(body_id) if body_id == id => {}
                    Some(body_id) => {
                        return Err(JsonApiError::Conflict(format!(
                            "Resource id {body_id} does not match the URL id {id}"
                        )));
                    }
                    None => {
                        return Err(JsonApiError::BadRequest(
                            "Resource id is required for updates".to_string(),
                        ));
                    }
                }

                let updated = adapter.update(id, resource).await?;
                Ok(ok(PrimaryData::Resource(Box::new(updated))))
            }
            OperationKind::DeleteResource => {
                let id = require_id(descriptor)?;
                adapter.delete(id).await?;
                Ok(ResponsePayload::empty(StatusCode::NO_CONTENT))
            }
            OperationKind::ReadRelatedResource => {
                let (id, relationship) = require_relationship(descriptor)?;
                Ok(ok(adapter.read_related(id, relationship).await?))
            }
            OperationKind::ReadRelationship => {
                let (id, relationship) = require_relationship(descriptor)?;
                let linkage = adapter.read_relationship(id, relationship).await?;
                Ok(ok(PrimaryData::Linkage(linkage)))
            }
            OperationKind::ReplaceRelationship => {
                let (id, relationship) = require_relationship(descriptor)?;
                let data = RelationshipDocument::from_value(body)?.data;
                adapter.replace_relationship(id, relationship, data).await?;
                Ok(ResponsePayload::empty(StatusCode::NO_CONTENT))
            }
            OperationKind::AddToRelationship => {
                let (id, relationship) = require_relationship(descriptor)?;
                let members = to_many_members(RelationshipDocument::from_value(body)?.data)?;
                adapter
                    .add_to_relationship(id, relationship, members)
                    .await?;
                Ok(ResponsePayload::empty(StatusCode::NO_CONTENT))
            }
            OperationKind::RemoveFromRelationship => {
                let (id, relationship) = require_relationship(descriptor)?;
                let members = to_many_members(RelationshipDocument::from_value(body)?.data)?;
                adapter
                    .remove_from_relationship(id, relationship, members)
                    .await?;
                Ok(ResponsePayload::empty(StatusCode::NO_CONTENT))
            }
        }
    }
}

#[async_trait]
impl Router for JsonApiRouter {
    async fn route(&self, request: &mut (dyn RequestPayload + Send)) -> Option<ResponsePayload> {
        let (path, parts) = {
            let head = request.get_head();
            (
                head.get_path(),
                RequestParts {
                    method: head.get_method(),
                    accept: head.get_headers(http::header::ACCEPT.as_str()),
                    content_type: head.get_header(http::header::CONTENT_TYPE.as_str()),
                },
            )
        };

        let resource_path = match ResourcePath::parse(&path, &self.config.path_prefix) {
            PathMatch::OutsidePrefix => return None,
            PathMatch::Malformed => {
                return Some(
                    JsonApiError::NotFound(format!("{path} is not a JSON:API URL")).into_response(),
                );
            }
            PathMatch::Resource(resource_path) => resource_path,
        };

        let response = match self.resolve(resource_path, parts, request).await {
            Ok(response) => response,
            Err(e) => e.into_response(),
        };

        Some(response)
    }
}

/// Classify, rejecting the method/URL combinations no JSON:API operation accepts
fn classify(
    descriptor: &InboundRequestDescriptor,
    resource_path: &ResourcePath,
) -> Result<OperationKind, JsonApiError> {
    allowed_kind(descriptor).ok_or_else(|| JsonApiError::MethodNotAllowed {
        method: descriptor.method().to_string(),
        allow: allowed_methods(resource_path),
    })
}

fn allowed_kind(descriptor: &InboundRequestDescriptor) -> Option<OperationKind> {
    match descriptor.operation_kind() {
        // Related resource URLs classify for any method, but can only be read
        Some(OperationKind::ReadRelatedResource) if descriptor.method() != Method::Get => None,
        kind => kind,
    }
}

/// The methods that make a valid operation on this URL (for the `Allow` header)
fn allowed_methods(resource_path: &ResourcePath) -> Vec<Method> {
    Method::ALL
        .into_iter()
        .filter(|method| allowed_kind(&resource_path.to_descriptor(*method)).is_some())
        .collect()
}

fn ok(data: PrimaryData) -> ResponsePayload {
    document_response(StatusCode::OK, &Document::data(data))
}

// Relationship kinds classify without an id; such requests address nothing
fn require_id(descriptor: &InboundRequestDescriptor) -> Result<&str, JsonApiError> {
    descriptor.resource_id().ok_or_else(|| {
        JsonApiError::NotFound(format!(
            "No {} resource id in the URL",
            descriptor.resource_type()
        ))
    })
}

fn require_relationship(
    descriptor: &InboundRequestDescriptor,
) -> Result<(&str, &str), JsonApiError> {
    let id = require_id(descriptor)?;
    let relationship = descriptor.relationship_name().ok_or_else(|| {
        JsonApiError::NotFound("No relationship name in the URL".to_string())
    })?;
    Ok((id, relationship))
}

fn check_type(resource: &ResourceObject, resource_type: &str) -> Result<(), JsonApiError> {
    if resource.resource_type == resource_type {
        Ok(())
    } else {
        Err(JsonApiError::Conflict(format!(
            "Resource type {} does not match the URL type {}",
            resource.resource_type, resource_type
        )))
    }
}

fn to_many_members(data: RelationshipData) -> Result<Vec<ResourceIdentifier>, JsonApiError> {
    match data {
        RelationshipData::ToMany(members) => Ok(members),
        RelationshipData::ToOne(_) => Err(JsonApiError::BadRequest(
            "Expected an array of resource identifiers".to_string(),
        )),
    }
}
