// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use http::StatusCode;
use thiserror::Error;

use common::http::{Headers, ResponseBody, ResponsePayload};
use jsonapi_model::Method;
use jsonapi_model::document::{Document, DocumentError, ErrorObject, JSON_API_MEDIA_TYPE};

use crate::adapter::AdapterError;
use crate::negotiation::NegotiationError;

/// A request the router refuses or could not complete, rendered as a JSON:API error document
#[derive(Error, Debug)]
pub enum JsonApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("Method {method} is not allowed for this URL")]
    MethodNotAllowed { method: String, allow: Vec<Method> },

    #[error(transparent)]
    Negotiation(#[from] NegotiationError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Adapter(#[from] AdapterError),
}

impl JsonApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            JsonApiError::NotFound(_) => StatusCode::NOT_FOUND,
            JsonApiError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            JsonApiError::Negotiation(NegotiationError::NotAcceptable) => {
                StatusCode::NOT_ACCEPTABLE
            }
            JsonApiError::Negotiation(NegotiationError::UnsupportedMediaType(_)) => {
                StatusCode::UNSUPPORTED_MEDIA_TYPE
            }
            JsonApiError::Document(_) | JsonApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            JsonApiError::Conflict(_) => StatusCode::CONFLICT,
            JsonApiError::Adapter(e) => match e {
                AdapterError::NotFound(_) => StatusCode::NOT_FOUND,
                AdapterError::Conflict(_) => StatusCode::CONFLICT,
                AdapterError::Forbidden(_) => StatusCode::FORBIDDEN,
                AdapterError::BadRequest(_) => StatusCode::BAD_REQUEST,
                AdapterError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    pub fn into_response(self) -> ResponsePayload {
        let status_code = self.status_code();

        // Internal details stay in the logs
        let detail = if status_code.is_server_error() {
            tracing::error!("Error handling JSON:API request: {}", self);
            None
        } else {
            tracing::warn!("Rejected JSON:API request ({}): {}", status_code, self);
            Some(self.to_string())
        };

        let error = ErrorObject {
            status: status_code.as_str().to_string(),
            title: status_code
                .canonical_reason()
                .unwrap_or("Error")
                .to_string(),
            detail,
        };

        let mut response = document_response(status_code, &Document::errors(vec![error]));

        if let JsonApiError::MethodNotAllowed { allow, .. } = &self {
            let allow = allow
                .iter()
                .map(|method| method.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            response
                .headers
                .insert(http::header::ALLOW.to_string(), allow);
        }

        response
    }
}

pub(crate) fn document_response(status_code: StatusCode, document: &Document) -> ResponsePayload {
    match serde_json::to_vec(document) {
        Ok(bytes) => {
            let mut headers = Headers::new();
            headers.insert(
                http::header::CONTENT_TYPE.to_string(),
                JSON_API_MEDIA_TYPE.to_string(),
            );
            ResponsePayload {
                body: ResponseBody::Bytes(bytes),
                headers,
                status_code,
            }
        }
        Err(e) => {
            tracing::error!("Unable to serialize JSON:API document: {}", e);
            ResponsePayload::empty(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
