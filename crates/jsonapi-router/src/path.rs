// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use jsonapi_model::{InboundRequestDescriptor, Method};

const RELATIONSHIPS_KEYWORD: &str = "relationships";

/// The resource-addressing part of a JSON:API URL
///
/// - `/{type}`
/// - `/{type}/{id}`
/// - `/{type}/{id}/{relationship}` (related resource)
/// - `/{type}/{id}/relationships/{relationship}` (relationship)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePath {
    pub resource_type: String,
    pub resource_id: Option<String>,
    pub relationship_name: Option<String>,
    pub has_relationships_keyword: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathMatch {
    /// The path is not under the API prefix; another router may want it
    OutsidePrefix,
    /// Under the prefix, but not a JSON:API URL shape
    Malformed,
    Resource(ResourcePath),
}

impl ResourcePath {
    /// Decompose `path` relative to `prefix` (which must not end with `/`).
    ///
    /// Trailing slashes are ignored and segments are percent-decoded.
    pub fn parse(path: &str, prefix: &str) -> PathMatch {
        let Some(rest) = path.strip_prefix(prefix) else {
            return PathMatch::OutsidePrefix;
        };

        // Guard against "/api/v10/posts" matching the "/api/v1" prefix
        let rest = match rest.strip_prefix('/') {
            Some(rest) => rest.trim_end_matches('/'),
            None if rest.is_empty() => return PathMatch::Malformed,
            None => return PathMatch::OutsidePrefix,
        };

        let segments: Result<Vec<String>, _> = rest
            .split('/')
            .map(|segment| urlencoding::decode(segment).map(|decoded| decoded.into_owned()))
            .collect();

        let Ok(segments) = segments else {
            return PathMatch::Malformed;
        };

        if segments.iter().any(|segment| segment.is_empty()) {
            return PathMatch::Malformed;
        }

        let resource_path = match segments.as_slice() {
            [resource_type] => ResourcePath {
                resource_type: resource_type.clone(),
                resource_id: None,
                relationship_name: None,
                has_relationships_keyword: false,
            },
            [resource_type, resource_id] => ResourcePath {
                resource_type: resource_type.clone(),
                resource_id: Some(resource_id.clone()),
                relationship_name: None,
                has_relationships_keyword: false,
            },
            // `/posts/1/relationships` names no relationship
            [_, _, relationship_name] if relationship_name == RELATIONSHIPS_KEYWORD => {
                return PathMatch::Malformed;
            }
            [resource_type, resource_id, relationship_name] => ResourcePath {
                resource_type: resource_type.clone(),
                resource_id: Some(resource_id.clone()),
                relationship_name: Some(relationship_name.clone()),
                has_relationships_keyword: false,
            },
            [resource_type, resource_id, keyword, relationship_name]
                if keyword == RELATIONSHIPS_KEYWORD =>
            {
                ResourcePath {
                    resource_type: resource_type.clone(),
                    resource_id: Some(resource_id.clone()),
                    relationship_name: Some(relationship_name.clone()),
                    has_relationships_keyword: true,
                }
            }
            _ => return PathMatch::Malformed,
        };

        PathMatch::Resource(resource_path)
    }

    pub fn to_descriptor(&self, method: Method) -> InboundRequestDescriptor {
        let descriptor = InboundRequestDescriptor::new(method, &self.resource_type);

        let descriptor = match &self.resource_id {
            Some(resource_id) => descriptor.with_resource_id(resource_id),
            None => descriptor,
        };

        match (&self.relationship_name, self.has_relationships_keyword) {
            (Some(name), true) => descriptor.with_relationship(name),
            (Some(name), false) => descriptor.with_related(name),
            (None, _) => descriptor,
        }
    }
}
