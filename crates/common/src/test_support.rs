// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

#![cfg(any(feature = "test-support", test))]

use http::Method;
use serde_json::Value;

use crate::http::{Headers, RequestHead, RequestPayload};

#[derive(Clone)]
pub enum Body {
    Json(Value),
    Raw(String),
}

/// An in-memory request for exercising routers without an HTTP server
#[derive(Clone)]
pub struct MockRequestPayload {
    pub method: Method,
    pub path: String,
    pub body: Option<Body>,
    pub headers: Headers,
}

impl MockRequestPayload {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            headers: Headers::new(),
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(Body::Json(body));
        self
    }

    /// A body sent as-is, which need not be JSON
    pub fn with_raw_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(Body::Raw(body.into()));
        self
    }
}

impl RequestPayload for MockRequestPayload {
    fn get_head(&self) -> &(dyn RequestHead + Send + Sync) {
        self
    }

    fn take_body(&mut self) -> Result<Value, serde_json::Error> {
        match self.body.take() {
            Some(Body::Json(body)) => Ok(body),
            Some(Body::Raw(body)) if !body.is_empty() => serde_json::from_str(&body),
            Some(Body::Raw(_)) | None => Ok(Value::Null),
        }
    }
}

impl RequestHead for MockRequestPayload {
    fn get_headers(&self, key: &str) -> Vec<String> {
        self.headers.get_all(key)
    }

    fn get_path(&self) -> String {
        self.path.clone()
    }

    fn get_method(&self) -> http::Method {
        self.method.clone()
    }
}
