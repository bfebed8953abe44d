// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use serde::Serialize;

use crate::method::{Method, UnsupportedMethod};
use crate::operation::OperationKind;

/// What an inbound request addresses, as decomposed from its method and URL
///
/// Built once per request and never mutated. Empty ids and relationship names are stored as
/// absent, so `/posts//comments`-style inputs behave the same as a missing segment.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct InboundRequestDescriptor {
    method: Method,
    resource_type: String,
    resource_id: Option<String>,
    relationship_name: Option<String>,
    has_relationships_keyword: bool,
}

impl InboundRequestDescriptor {
    pub fn new(method: Method, resource_type: impl Into<String>) -> Self {
        Self {
            method,
            resource_type: resource_type.into(),
            resource_id: None,
            relationship_name: None,
            has_relationships_keyword: false,
        }
    }

    /// Build a descriptor from raw router output, normalizing the method name
    pub fn parse(
        method: &str,
        resource_type: &str,
        resource_id: Option<&str>,
        relationship_name: Option<&str>,
        has_relationships_keyword: bool,
    ) -> Result<Self, UnsupportedMethod> {
        let relationship_name = non_empty(relationship_name);

        Ok(Self {
            method: method.parse()?,
            resource_type: resource_type.to_string(),
            resource_id: non_empty(resource_id),
            // The keyword only means something together with a relationship name
            has_relationships_keyword: has_relationships_keyword && relationship_name.is_some(),
            relationship_name,
        })
    }

    pub fn with_resource_id(mut self, resource_id: impl Into<String>) -> Self {
        let resource_id: String = resource_id.into();
        self.resource_id = non_empty(Some(resource_id.as_str()));
        self
    }

    /// Address a related resource (`/posts/1/comments`)
    pub fn with_related(mut self, relationship_name: impl Into<String>) -> Self {
        let relationship_name: String = relationship_name.into();
        self.relationship_name = non_empty(Some(relationship_name.as_str()));
        self.has_relationships_keyword = false;
        self
    }

    /// Address a relationship itself (`/posts/1/relationships/comments`)
    pub fn with_relationship(mut self, relationship_name: impl Into<String>) -> Self {
        let relationship_name: String = relationship_name.into();
        self.relationship_name = non_empty(Some(relationship_name.as_str()));
        self.has_relationships_keyword = self.relationship_name.is_some();
        self
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    pub fn resource_id(&self) -> Option<&str> {
        self.resource_id.as_deref()
    }

    pub fn relationship_name(&self) -> Option<&str> {
        self.relationship_name.as_deref()
    }

    pub fn has_relationships_keyword(&self) -> bool {
        self.has_relationships_keyword
    }

    pub fn is_resource(&self) -> bool {
        self.resource_id.is_some()
    }

    pub fn is_relationship(&self) -> bool {
        self.relationship_name.is_some()
    }

    pub fn operation_kind(&self) -> Option<OperationKind> {
        OperationKind::classify(
            self.method,
            self.resource_id(),
            self.relationship_name(),
            self.has_relationships_keyword,
        )
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(|v| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use multiplatform_test::multiplatform_test;

    #[multiplatform_test]
    fn builder_and_parse_agree() {
        let built = InboundRequestDescriptor::new(Method::Patch, "posts")
            .with_resource_id("1")
            .with_relationship("comments");
        let parsed =
            InboundRequestDescriptor::parse("patch", "posts", Some("1"), Some("comments"), true)
                .unwrap();

        assert_eq!(built, parsed);
        assert_eq!(
            built.operation_kind(),
            Some(OperationKind::ReplaceRelationship)
        );
    }

    #[multiplatform_test]
    fn empty_segments_are_absent() {
        let descriptor =
            InboundRequestDescriptor::parse("GET", "posts", Some(""), Some(""), false).unwrap();

        assert!(!descriptor.is_resource());
        assert!(!descriptor.is_relationship());
        assert_eq!(descriptor.resource_id(), None);
        assert_eq!(descriptor.operation_kind(), Some(OperationKind::Index));

        let descriptor = InboundRequestDescriptor::new(Method::Get, "posts")
            .with_resource_id("")
            .with_relationship("");
        assert!(!descriptor.has_relationships_keyword());
        assert_eq!(descriptor.operation_kind(), Some(OperationKind::Index));
    }

    #[multiplatform_test]
    fn keyword_requires_relationship_name() {
        let descriptor =
            InboundRequestDescriptor::parse("GET", "posts", Some("1"), Some(""), true).unwrap();
        assert_eq!(descriptor.relationship_name(), None);
        assert!(!descriptor.has_relationships_keyword());
        assert_eq!(descriptor.operation_kind(), Some(OperationKind::ReadResource));

        let descriptor =
            InboundRequestDescriptor::parse("GET", "posts", Some("1"), None, true).unwrap();
        assert!(!descriptor.has_relationships_keyword());

        let descriptor =
            InboundRequestDescriptor::parse("GET", "posts", Some("1"), Some("tags"), true)
                .unwrap();
        assert!(descriptor.has_relationships_keyword());
    }

    #[multiplatform_test]
    fn related_and_relationship_differ_only_by_keyword() {
        let related = InboundRequestDescriptor::new(Method::Get, "posts")
            .with_resource_id("1")
            .with_related("author");
        let relationship = related.clone().with_relationship("author");

        assert_eq!(
            related.operation_kind(),
            Some(OperationKind::ReadRelatedResource)
        );
        assert_eq!(
            relationship.operation_kind(),
            Some(OperationKind::ReadRelationship)
        );
        assert_eq!(related.resource_type(), relationship.resource_type());
    }

    #[multiplatform_test]
    fn parse_rejects_unsupported_method() {
        assert_eq!(
            InboundRequestDescriptor::parse("PUT", "posts", Some("1"), None, false),
            Err(UnsupportedMethod("PUT".to_string()))
        );
    }
}
