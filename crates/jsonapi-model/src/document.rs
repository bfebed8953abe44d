// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! The subset of the JSON:API document format needed to read and write resources and
//! relationships.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const JSON_API_MEDIA_TYPE: &str = "application/vnd.api+json";
pub const JSON_API_VERSION: &str = "1.0";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceIdentifier {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub id: String,
}

impl ResourceIdentifier {
    pub fn new(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ResourceObject {
    #[serde(rename = "type")]
    pub resource_type: String,
    // Absent only in create requests that leave id generation to the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub attributes: Map<String, Value>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub relationships: BTreeMap<String, Relationship>,
}

impl ResourceObject {
    pub fn new(resource_type: impl Into<String>, id: Option<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            id,
            attributes: Map::new(),
            relationships: BTreeMap::new(),
        }
    }

    pub fn identifier(&self) -> Option<ResourceIdentifier> {
        self.id
            .as_ref()
            .map(|id| ResourceIdentifier::new(&self.resource_type, id))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Relationship {
    pub data: RelationshipData,
}

/// Resource linkage
///
/// `null` and a single identifier are to-one linkage, an array is to-many linkage.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum RelationshipData {
    ToMany(Vec<ResourceIdentifier>),
    ToOne(Option<ResourceIdentifier>),
}

impl RelationshipData {
    pub fn identifiers(&self) -> Vec<&ResourceIdentifier> {
        match self {
            RelationshipData::ToMany(identifiers) => identifiers.iter().collect(),
            RelationshipData::ToOne(identifier) => identifier.iter().collect(),
        }
    }

    pub fn is_to_many(&self) -> bool {
        matches!(self, RelationshipData::ToMany(_))
    }
}

/// The `data` member of a response document
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum PrimaryData {
    Resource(Box<ResourceObject>),
    Resources(Vec<ResourceObject>),
    Linkage(RelationshipData),
    Null,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorObject {
    pub status: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct JsonApiObject {
    pub version: &'static str,
}

/// A top-level response document. Exactly one of `data` and `errors` is set.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Document {
    pub jsonapi: JsonApiObject,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<PrimaryData>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ErrorObject>,
}

impl Document {
    pub fn data(data: PrimaryData) -> Self {
        Self {
            jsonapi: JsonApiObject {
                version: JSON_API_VERSION,
            },
            data: Some(data),
            errors: vec![],
        }
    }

    pub fn errors(errors: Vec<ErrorObject>) -> Self {
        Self {
            jsonapi: JsonApiObject {
                version: JSON_API_VERSION,
            },
            data: None,
            errors,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("The request body must be a JSON:API document")]
    MissingBody,

    #[error("Invalid JSON:API document: {0}")]
    Invalid(#[from] serde_json::Error),
}

/// A request document whose primary data is a single resource object (create and update)
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ResourceDocument {
    pub data: ResourceObject,
}

impl ResourceDocument {
    pub fn from_value(value: Value) -> Result<Self, DocumentError> {
        if value.is_null() {
            return Err(DocumentError::MissingBody);
        }
        Ok(serde_json::from_value(value)?)
    }
}

/// A request document whose primary data is resource linkage (relationship modification)
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct RelationshipDocument {
    pub data: RelationshipData,
}

impl RelationshipDocument {
    pub fn from_value(value: Value) -> Result<Self, DocumentError> {
        match &value {
            Value::Null => Err(DocumentError::MissingBody),
            // `{"data": null}` is valid linkage, but a missing `data` member is not
            Value::Object(map) if !map.contains_key("data") => Err(DocumentError::Invalid(
                serde::de::Error::missing_field("data"),
            )),
            _ => Ok(serde_json::from_value(value)?),
        }
    }
}
