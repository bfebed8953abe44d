// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! JSON:API content negotiation
//!
//! Clients must send documents as `application/vnd.api+json` without media type parameters, and
//! must be able to accept the plain media type whenever they list it in `Accept`.

use thiserror::Error;

use jsonapi_model::document::JSON_API_MEDIA_TYPE;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NegotiationError {
    #[error("The Accept header only lists application/vnd.api+json with media type parameters")]
    NotAcceptable,

    #[error("Expected Content-Type application/vnd.api+json without media type parameters, got {0}")]
    UnsupportedMediaType(String),
}

struct MediaRange<'a> {
    essence: &'a str,
    has_parameters: bool,
}

fn parse_media_range(value: &str) -> MediaRange<'_> {
    let mut parts = value.split(';');
    let essence = parts.next().unwrap_or_default().trim();
    // Quality values are not media type parameters
    let has_parameters = parts
        .map(|parameter| parameter.trim())
        .filter(|parameter| !parameter.is_empty())
        .any(|parameter| !parameter.to_ascii_lowercase().starts_with("q="));

    MediaRange {
        essence,
        has_parameters,
    }
}

/// Check the `Accept` header values of a request.
///
/// Fails only if the JSON:API media type is listed and every listing carries parameters.
pub fn check_accept(accept_headers: &[String]) -> Result<(), NegotiationError> {
    let json_api_ranges: Vec<_> = accept_headers
        .iter()
        .flat_map(|header| header.split(','))
        .map(parse_media_range)
        .filter(|range| range.essence.eq_ignore_ascii_case(JSON_API_MEDIA_TYPE))
        .collect();

    if !json_api_ranges.is_empty() && json_api_ranges.iter().all(|range| range.has_parameters) {
        Err(NegotiationError::NotAcceptable)
    } else {
        Ok(())
    }
}

/// Check the `Content-Type` of a request that carries a document.
pub fn check_content_type(content_type: Option<&str>) -> Result<(), NegotiationError> {
    match content_type {
        Some(content_type) => {
            let range = parse_media_range(content_type);
            if range.essence.eq_ignore_ascii_case(JSON_API_MEDIA_TYPE) && !range.has_parameters {
                Ok(())
            } else {
                Err(NegotiationError::UnsupportedMediaType(
                    content_type.to_string(),
                ))
            }
        }
        None => Err(NegotiationError::UnsupportedMediaType("none".to_string())),
    }
}
