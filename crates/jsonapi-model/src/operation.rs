// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::method::Method;

/// The JSON:API operation an inbound request represents
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// `GET /posts`
    Index,
    /// `POST /posts`
    CreateResource,
    /// `GET /posts/1`
    ReadResource,
    /// `PATCH /posts/1`
    UpdateResource,
    /// `DELETE /posts/1`
    DeleteResource,
    /// `GET /posts/1/comments`
    ReadRelatedResource,
    /// `GET /posts/1/relationships/comments`
    ReadRelationship,
    /// `PATCH /posts/1/relationships/comments`
    ReplaceRelationship,
    /// `POST /posts/1/relationships/comments`
    AddToRelationship,
    /// `DELETE /posts/1/relationships/comments`
    RemoveFromRelationship,
}

impl OperationKind {
    pub const ALL: [OperationKind; 10] = [
        OperationKind::Index,
        OperationKind::CreateResource,
        OperationKind::ReadResource,
        OperationKind::UpdateResource,
        OperationKind::DeleteResource,
        OperationKind::ReadRelatedResource,
        OperationKind::ReadRelationship,
        OperationKind::ReplaceRelationship,
        OperationKind::AddToRelationship,
        OperationKind::RemoveFromRelationship,
    ];

    /// Classify a request from its method and decomposed URL.
    ///
    /// The rules are applied in order and the first match wins:
    ///
    /// | method | resource id | relationship | `relationships` keyword | kind |
    /// |--------|-------------|--------------|-------------------------|------|
    /// | GET    | absent      |              |                         | `Index` |
    /// | POST   | absent      |              |                         | `CreateResource` |
    /// | GET    | present     | absent       |                         | `ReadResource` |
    /// | PATCH  | present     | absent       |                         | `UpdateResource` |
    /// | DELETE | present     | absent       |                         | `DeleteResource` |
    /// | any    |             | present      | no                      | `ReadRelatedResource` |
    /// | GET    |             | present      | yes                     | `ReadRelationship` |
    /// | PATCH  |             | present      | yes                     | `ReplaceRelationship` |
    /// | POST   |             | present      | yes                     | `AddToRelationship` |
    /// | DELETE |             | present      | yes                     | `RemoveFromRelationship` |
    ///
    /// An empty id or relationship name counts as absent. The relationship rules only look at the
    /// relationship name and the keyword, so a descriptor without a resource id may still
    /// classify as a relationship operation.
    ///
    /// Returns `None` when no rule applies (for example `POST /posts/1` or `PATCH /posts`);
    /// callers answer those with `405 Method Not Allowed`.
    pub fn classify(
        method: Method,
        resource_id: Option<&str>,
        relationship_name: Option<&str>,
        has_relationships_keyword: bool,
    ) -> Option<OperationKind> {
        let is_resource = resource_id.is_some_and(|id| !id.is_empty());
        let is_relationship = relationship_name.is_some_and(|name| !name.is_empty());

        match (method, is_resource, is_relationship, has_relationships_keyword) {
            (Method::Get, false, _, _) => Some(OperationKind::Index),
            (Method::Post, false, _, _) => Some(OperationKind::CreateResource),
            (Method::Get, true, false, _) => Some(OperationKind::ReadResource),
            (Method::Patch, true, false, _) => Some(OperationKind::UpdateResource),
            (Method::Delete, true, false, _) => Some(OperationKind::DeleteResource),
            (_, _, true, false) => Some(OperationKind::ReadRelatedResource),
            (Method::Get, _, true, true) => Some(OperationKind::ReadRelationship),
            (Method::Patch, _, true, true) => Some(OperationKind::ReplaceRelationship),
            (Method::Post, _, true, true) => Some(OperationKind::AddToRelationship),
            (Method::Delete, _, true, true) => Some(OperationKind::RemoveFromRelationship),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Index => "index",
            OperationKind::CreateResource => "create-resource",
            OperationKind::ReadResource => "read-resource",
            OperationKind::UpdateResource => "update-resource",
            OperationKind::DeleteResource => "delete-resource",
            OperationKind::ReadRelatedResource => "read-related-resource",
            OperationKind::ReadRelationship => "read-relationship",
            OperationKind::ReplaceRelationship => "replace-relationship",
            OperationKind::AddToRelationship => "add-to-relationship",
            OperationKind::RemoveFromRelationship => "remove-from-relationship",
        }
    }

    /// Operations whose request must carry a JSON:API document
    pub fn expects_document(&self) -> bool {
        matches!(
            self,
            OperationKind::CreateResource
                | OperationKind::UpdateResource
                | OperationKind::ReplaceRelationship
                | OperationKind::AddToRelationship
                | OperationKind::RemoveFromRelationship
        )
    }
}

impl Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use multiplatform_test::multiplatform_test;

    fn classify(
        method: &str,
        resource_id: Option<&str>,
        relationship_name: Option<&str>,
        has_relationships_keyword: bool,
    ) -> Option<OperationKind> {
        OperationKind::classify(
            method.parse().unwrap(),
            resource_id,
            relationship_name,
            has_relationships_keyword,
        )
    }

    #[multiplatform_test]
    fn classify_standard_urls() {
        let cases = [
            (("GET", None, None, false), OperationKind::Index),
            (("POST", None, None, false), OperationKind::CreateResource),
            (("GET", Some("1"), None, false), OperationKind::ReadResource),
            (("PATCH", Some("1"), None, false), OperationKind::UpdateResource),
            (("DELETE", Some("1"), None, false), OperationKind::DeleteResource),
            (
                ("GET", Some("1"), Some("comments"), false),
                OperationKind::ReadRelatedResource,
            ),
            (
                ("GET", Some("1"), Some("comments"), true),
                OperationKind::ReadRelationship,
            ),
            (
                ("PATCH", Some("1"), Some("comments"), true),
                OperationKind::ReplaceRelationship,
            ),
            (
                ("POST", Some("1"), Some("comments"), true),
                OperationKind::AddToRelationship,
            ),
            (
                ("DELETE", Some("1"), Some("comments"), true),
                OperationKind::RemoveFromRelationship,
            ),
        ];

        for ((method, id, relationship, keyword), expected) in cases {
            assert_eq!(
                classify(method, id, relationship, keyword),
                Some(expected),
                "({method}, {id:?}, {relationship:?}, {keyword})"
            );
        }
    }

    #[multiplatform_test]
    fn lowercase_methods_classify_the_same() {
        assert_eq!(
            classify("patch", Some("1"), Some("comments"), true),
            Some(OperationKind::ReplaceRelationship)
        );
        assert_eq!(
            classify("get", None, None, false),
            Some(OperationKind::Index)
        );
    }

    #[multiplatform_test]
    fn empty_strings_are_treated_as_absent() {
        for method in Method::ALL {
            for keyword in [false, true] {
                for relationship in [None, Some("comments")] {
                    assert_eq!(
                        OperationKind::classify(method, Some(""), relationship, keyword),
                        OperationKind::classify(method, None, relationship, keyword),
                    );
                }
                for id in [None, Some("1")] {
                    assert_eq!(
                        OperationKind::classify(method, id, Some(""), keyword),
                        OperationKind::classify(method, id, None, keyword),
                    );
                }
            }
        }
    }

    #[multiplatform_test]
    fn relationship_rules_do_not_require_resource_id() {
        assert_eq!(
            classify("PATCH", None, Some("comments"), true),
            Some(OperationKind::ReplaceRelationship)
        );
        assert_eq!(
            classify("DELETE", None, Some("comments"), true),
            Some(OperationKind::RemoveFromRelationship)
        );
        assert_eq!(
            classify("PATCH", None, Some("comments"), false),
            Some(OperationKind::ReadRelatedResource)
        );
        // The plain resource rules come first
        assert_eq!(
            classify("GET", None, Some("comments"), true),
            Some(OperationKind::Index)
        );
        assert_eq!(
            classify("POST", None, Some("comments"), true),
            Some(OperationKind::CreateResource)
        );
    }

    #[multiplatform_test]
    fn unmatched_combinations() {
        assert_eq!(classify("POST", Some("1"), None, false), None);
        assert_eq!(classify("PATCH", None, None, false), None);
        assert_eq!(classify("DELETE", None, None, false), None);
        // The keyword alone does not make a relationship URL
        assert_eq!(classify("PATCH", None, None, true), None);
    }

    #[multiplatform_test]
    fn classification_is_deterministic() {
        for method in Method::ALL {
            for id in [None, Some("1")] {
                for relationship in [None, Some("comments")] {
                    for keyword in [false, true] {
                        let first = OperationKind::classify(method, id, relationship, keyword);
                        for _ in 0..3 {
                            assert_eq!(
                                OperationKind::classify(method, id, relationship, keyword),
                                first
                            );
                        }
                    }
                }
            }
        }
    }

    // Over well-formed URLs (the keyword only appears with a relationship, and relationship URLs
    // always include an id), every method/URL shape maps to at most one kind and each kind is
    // reachable from exactly one shape.
    #[multiplatform_test]
    fn well_formed_urls_cover_every_kind_once() {
        let shapes: [(Option<&str>, Option<&str>, bool); 4] = [
            (None, None, false),
            (Some("1"), None, false),
            (Some("1"), Some("comments"), false),
            (Some("1"), Some("comments"), true),
        ];

        let mut seen = vec![];
        for method in Method::ALL {
            for (id, relationship, keyword) in shapes {
                if let Some(kind) = OperationKind::classify(method, id, relationship, keyword) {
                    seen.push((kind, method, id, relationship, keyword));
                }
            }
        }

        for kind in OperationKind::ALL {
            assert!(
                seen.iter().any(|(k, ..)| *k == kind),
                "{kind} is not reachable"
            );
        }

        // Related resource URLs classify regardless of the method; everything else is unique
        let non_related: Vec<_> = seen
            .iter()
            .filter(|(k, ..)| *k != OperationKind::ReadRelatedResource)
            .collect();
        assert_eq!(non_related.len(), 9);
        for kind in OperationKind::ALL
            .iter()
            .filter(|k| **k != OperationKind::ReadRelatedResource)
        {
            assert_eq!(
                non_related.iter().filter(|(k, ..)| k == kind).count(),
                1,
                "{kind}"
            );
        }
    }

    #[multiplatform_test]
    fn modifying_kinds_expect_a_document() {
        assert!(OperationKind::CreateResource.expects_document());
        assert!(OperationKind::RemoveFromRelationship.expects_document());
        assert!(!OperationKind::DeleteResource.expects_document());
    }
}
