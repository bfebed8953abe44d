// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use http::StatusCode;
use serde_json::Value;

use common::http::{Headers, ResponseBody};
use common::router::Router;
use common::test_support::MockRequestPayload;
use jsonapi_model::document::JSON_API_MEDIA_TYPE;
use jsonapi_router::{JsonApiRouter, JsonApiRouterConfig, MemoryStore, ResourceAdapter};

pub const PREFIX: &str = "/api/v1";

pub struct TestResponse {
    pub status_code: StatusCode,
    pub headers: Headers,
    pub body: Value,
}

pub fn memory_router(config: JsonApiRouterConfig) -> JsonApiRouter {
    let store = MemoryStore::new();

    let adapters: Vec<(String, Arc<dyn ResourceAdapter>)> = ["posts", "comments", "people"]
        .into_iter()
        .map(|resource_type| {
            let adapter: Arc<dyn ResourceAdapter> = Arc::new(store.adapter(resource_type));
            (resource_type.to_string(), adapter)
        })
        .collect();

    JsonApiRouter::new(config, adapters)
}

/// A well-behaved JSON:API request (matching `Accept`, and `Content-Type` when there is a body)
pub fn request(method: http::Method, path: &str, body: Option<Value>) -> MockRequestPayload {
    let request =
        MockRequestPayload::new(method, path).with_header("accept", JSON_API_MEDIA_TYPE);

    match body {
        Some(body) => request
            .with_header("content-type", JSON_API_MEDIA_TYPE)
            .with_body(body),
        None => request,
    }
}

pub async fn send(router: &JsonApiRouter, mut request: MockRequestPayload) -> TestResponse {
    let response = router
        .route(&mut request)
        .await
        .expect("request under the API prefix should be routed");

    let body = match &response.body {
        ResponseBody::Bytes(bytes) => serde_json::from_slice(bytes).unwrap(),
        ResponseBody::None => Value::Null,
    };

    TestResponse {
        status_code: response.status_code,
        headers: response.headers,
        body,
    }
}

pub fn assert_error(response: &TestResponse, status_code: StatusCode) {
    assert_eq!(response.status_code, status_code, "body: {}", response.body);
    assert_eq!(
        response.body["errors"][0]["status"],
        Value::String(status_code.as_str().to_string())
    );
    assert_eq!(
        response.headers.get("content-type"),
        Some(JSON_API_MEDIA_TYPE.to_string())
    );
}
