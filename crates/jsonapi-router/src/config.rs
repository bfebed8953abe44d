// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use common::env_const::{get_jsonapi_http_path, get_strict_content_negotiation};
use jsonapi_env::{EnvError, Environment};

#[derive(Debug, Clone)]
pub struct JsonApiRouterConfig {
    /// Path prefix without a trailing slash (empty to serve from the root)
    pub path_prefix: String,
    /// Enforce `Accept`/`Content-Type` rules (406/415)
    pub strict_content_negotiation: bool,
}

impl JsonApiRouterConfig {
    pub fn new(path_prefix: &str) -> Self {
        Self {
            path_prefix: path_prefix.trim_end_matches('/').to_string(),
            strict_content_negotiation: true,
        }
    }

    pub fn from_env(env: &dyn Environment) -> Result<Self, EnvError> {
        Ok(Self {
            path_prefix: get_jsonapi_http_path(env)?,
            strict_content_negotiation: get_strict_content_negotiation(env)?,
        })
    }

    pub fn with_strict_content_negotiation(mut self, strict: bool) -> Self {
        self.strict_content_negotiation = strict;
        self
    }
}
