// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use http::StatusCode;
use serde_json::Value;

pub trait RequestPayload {
    fn get_head(&self) -> &(dyn RequestHead + Send + Sync);

    /// Take the request body, decoding it as JSON (an empty body is `Value::Null`).
    ///
    /// Routers call this only once they have decided the request carries a document, so a
    /// malformed body never masks an earlier rejection.
    fn take_body(&mut self) -> Result<Value, serde_json::Error>;
}

#[derive(Debug, Clone, Default)]
pub struct Headers {
    inner: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self { inner: vec![] }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.inner
            .iter()
            .find(|(k, _)| k == &key.to_lowercase())
            .map(|(_, v)| v.clone())
    }

    pub fn get_all(&self, key: &str) -> Vec<String> {
        let key = key.to_lowercase();
        self.inner
            .iter()
            .filter(|(k, _)| k == &key)
            .map(|(_, v)| v.clone())
            .collect()
    }

    pub fn insert(&mut self, key: String, value: String) {
        self.inner.push((key.to_lowercase(), value));
    }
}

impl IntoIterator for Headers {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

pub struct ResponsePayload {
    pub body: ResponseBody,
    pub headers: Headers,
    pub status_code: StatusCode,
}

impl ResponsePayload {
    /// A response with no body (`204 No Content`, bare `404`, ...)
    pub fn empty(status_code: StatusCode) -> Self {
        Self {
            body: ResponseBody::None,
            headers: Headers::new(),
            status_code,
        }
    }
}

pub enum ResponseBody {
    Bytes(Vec<u8>),
    None,
}

/// Represents a HTTP request from which information can be extracted
pub trait RequestHead {
    // return all header values that have the following key
    fn get_headers(&self, key: &str) -> Vec<String>;

    // return the first header
    fn get_header(&self, key: &str) -> Option<String> {
        self.get_headers(&key.to_lowercase()).first().cloned()
    }

    fn get_path(&self) -> String;

    fn get_method(&self) -> http::Method;
}
