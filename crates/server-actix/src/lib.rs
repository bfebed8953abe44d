// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

mod request;

use actix_web::{
    HttpRequest, HttpResponse,
    web::{self, ServiceConfig},
};
use http::StatusCode;
use serde_json::Value;

use common::http::{RequestHead, RequestPayload, ResponseBody, ResponsePayload};
use common::router::{CompositeRouter, Router};
use jsonapi_model::document::JSON_API_MEDIA_TYPE;
use request::ActixRequestHead;

macro_rules! error_msg {
    ($msg:literal) => {
        concat!("{\"errors\": [{\"status\":\"500\",\"title\":\"", $msg, "\"}]}").as_bytes()
    };
}

pub fn configure_router(router: web::Data<CompositeRouter>) -> impl FnOnce(&mut ServiceConfig) {
    move |app| {
        app.app_data(router).default_service(web::to(resolve));
    }
}

struct ActixRequestPayload {
    head: ActixRequestHead,
    body: web::Bytes,
}

impl RequestPayload for ActixRequestPayload {
    fn get_head(&self) -> &(dyn RequestHead + Send + Sync) {
        &self.head
    }

    fn take_body(&mut self) -> Result<Value, serde_json::Error> {
        let body = std::mem::take(&mut self.body);

        if body.is_empty() {
            Ok(Value::Null)
        } else {
            serde_json::from_slice(&body)
        }
    }
}

/// Resolve a JSON:API request
///
/// The body is handed over as raw bytes. The router decides whether the request needs a document
/// at all and checks its media type before decoding it.
async fn resolve(
    http_request: HttpRequest,
    body: web::Bytes,
    router: web::Data<CompositeRouter>,
) -> HttpResponse {
    let mut request = ActixRequestPayload {
        head: ActixRequestHead::from_request(&http_request),
        body,
    };

    match router.route(&mut request).await {
        Some(ResponsePayload {
            body,
            headers,
            status_code,
        }) => {
            let actix_status_code = match to_actix_status_code(status_code) {
                Ok(status_code) => status_code,
                Err(err) => {
                    tracing::error!("Invalid status code: {}", err);
                    return HttpResponse::InternalServerError()
                        .content_type(JSON_API_MEDIA_TYPE)
                        .body(error_msg!("Invalid status code"));
                }
            };

            let mut builder = HttpResponse::build(actix_status_code);

            for header in headers.into_iter() {
                builder.append_header(header);
            }

            match body {
                ResponseBody::Bytes(bytes) => builder.body(bytes),
                ResponseBody::None => builder.finish(),
            }
        }
        None => HttpResponse::InternalServerError()
            .content_type(JSON_API_MEDIA_TYPE)
            .body(error_msg!("Error resolving request")),
    }
}

fn to_actix_status_code(status_code: StatusCode) -> Result<actix_web::http::StatusCode, String> {
    actix_web::http::StatusCode::from_u16(status_code.as_u16())
        .map_err(|_| "Invalid status code".to_string())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, test};
    use jsonapi_router::{JsonApiRouter, JsonApiRouterConfig, MemoryStore, ResourceAdapter};

    use super::*;

    fn router() -> web::Data<CompositeRouter> {
        let store = MemoryStore::new();
        let posts: Arc<dyn ResourceAdapter> = Arc::new(store.adapter("posts"));

        let jsonapi_router = JsonApiRouter::new(
            JsonApiRouterConfig::new("/api/v1"),
            vec![("posts".to_string(), posts)],
        );

        web::Data::new(CompositeRouter::new(vec![Box::new(jsonapi_router)]))
    }

    #[actix_web::test]
    async fn create_and_read_over_http() {
        let app = test::init_service(App::new().configure(configure_router(router()))).await;

        let req = test::TestRequest::post()
            .uri("/api/v1/posts")
            .insert_header(("content-type", JSON_API_MEDIA_TYPE))
            .set_payload(r#"{"data": {"type": "posts", "attributes": {"title": "Hello"}}}"#)
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), actix_web::http::StatusCode::CREATED);
        assert_eq!(
            resp.headers()
                .get("location")
                .and_then(|v| v.to_str().ok()),
            Some("/api/v1/posts/1")
        );

        let req = test::TestRequest::get()
            .uri("/api/v1/posts/1")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::OK);
        assert_eq!(
            resp.headers()
                .get("content-type")
                .and_then(|v| v.to_str().ok()),
            Some(JSON_API_MEDIA_TYPE)
        );

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["attributes"]["title"], "Hello");
    }

    #[actix_web::test]
    async fn invalid_json_is_bad_request() {
        let app = test::init_service(App::new().configure(configure_router(router()))).await;

        let req = test::TestRequest::post()
            .uri("/api/v1/posts")
            .insert_header(("content-type", JSON_API_MEDIA_TYPE))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["errors"][0]["status"], "400");
    }

    #[actix_web::test]
    async fn media_type_is_checked_before_the_body_is_decoded() {
        let app = test::init_service(App::new().configure(configure_router(router()))).await;

        let req = test::TestRequest::post()
            .uri("/api/v1/posts")
            .insert_header(("content-type", "text/plain"))
            .set_payload("hello")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(
            resp.status(),
            actix_web::http::StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["errors"][0]["status"], "415");
    }

    #[actix_web::test]
    async fn body_is_ignored_when_no_document_is_expected() {
        let app = test::init_service(App::new().configure(configure_router(router()))).await;

        let req = test::TestRequest::get()
            .uri("/api/v1/posts")
            .set_payload("not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::OK);

        let req = test::TestRequest::get()
            .uri("/elsewhere")
            .set_payload("not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn unrouted_paths_are_not_found() {
        let app = test::init_service(App::new().configure(configure_router(router()))).await;

        let req = test::TestRequest::get()
            .uri("/graphql?query=%7B")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn unsupported_method_is_not_allowed() {
        let app = test::init_service(App::new().configure(configure_router(router()))).await;

        let req = test::TestRequest::put().uri("/api/v1/posts/1").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), actix_web::http::StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            resp.headers().get("allow").and_then(|v| v.to_str().ok()),
            Some("GET, PATCH, DELETE")
        );
    }
}
