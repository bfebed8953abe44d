// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use jsonapi_env::{EnvError, Environment};

pub const JSONAPI_HTTP_PATH: &str = "JSONAPI_HTTP_PATH";
pub const JSONAPI_SERVER_HOST: &str = "JSONAPI_SERVER_HOST";
pub const JSONAPI_SERVER_PORT: &str = "JSONAPI_SERVER_PORT";
pub const JSONAPI_RESOURCE_TYPES: &str = "JSONAPI_RESOURCE_TYPES";
pub const JSONAPI_STRICT_CONTENT_NEGOTIATION: &str = "JSONAPI_STRICT_CONTENT_NEGOTIATION";
pub const JSONAPI_LOG: &str = "JSONAPI_LOG";

const DEFAULT_HTTP_PATH: &str = "/api/v1";
const DEFAULT_SERVER_PORT: u16 = 9876;
const DEFAULT_RESOURCE_TYPES: [&str; 3] = ["posts", "comments", "people"];

/// The path prefix under which resources are served, without a trailing slash (`/` maps to "")
pub fn get_jsonapi_http_path(env: &dyn Environment) -> Result<String, EnvError> {
    let path = env.get_or_else(JSONAPI_HTTP_PATH, DEFAULT_HTTP_PATH);

    if !path.starts_with('/') {
        return Err(EnvError::InvalidEnum {
            env_key: JSONAPI_HTTP_PATH,
            env_value: path,
            message: "Must start with '/'".to_string(),
        });
    }

    Ok(path.trim_end_matches('/').to_string())
}

pub fn get_server_port(env: &dyn Environment) -> Result<u16, EnvError> {
    env.get_u16(JSONAPI_SERVER_PORT, DEFAULT_SERVER_PORT)
}

pub fn get_resource_types(env: &dyn Environment) -> Vec<String> {
    env.get_list(
        JSONAPI_RESOURCE_TYPES,
        DEFAULT_RESOURCE_TYPES
            .iter()
            .map(|resource_type| resource_type.to_string())
            .collect(),
    )
}

pub fn get_strict_content_negotiation(env: &dyn Environment) -> Result<bool, EnvError> {
    env.enabled(JSONAPI_STRICT_CONTENT_NEGOTIATION, true)
}
