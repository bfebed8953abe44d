// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use crate::http::{RequestPayload, ResponsePayload};
use async_trait::async_trait;
use http::StatusCode;

#[async_trait]
pub trait Router: Sync {
    /// Route a request.
    ///
    /// Returns `None` if the request is not meant for this router, so that the next router
    /// can take it.
    async fn route(&self, request: &mut (dyn RequestPayload + Send)) -> Option<ResponsePayload>;
}

pub struct CompositeRouter {
    routers: Vec<Box<dyn Router + Send + Sync>>,
}

impl CompositeRouter {
    pub fn new(routers: Vec<Box<dyn Router + Send + Sync>>) -> Self {
        Self { routers }
    }
}

#[async_trait]
impl Router for CompositeRouter {
    async fn route(&self, request: &mut (dyn RequestPayload + Send)) -> Option<ResponsePayload> {
        for router in self.routers.iter() {
            if let Some(response) = router.route(request).await {
                return Some(response);
            }
        }

        Some(ResponsePayload::empty(StatusCode::NOT_FOUND))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockRequestPayload;

    struct PrefixRouter {
        prefix: &'static str,
        status_code: StatusCode,
    }

    #[async_trait]
    impl Router for PrefixRouter {
        async fn route(
            &self,
            request: &mut (dyn RequestPayload + Send),
        ) -> Option<ResponsePayload> {
            request
                .get_head()
                .get_path()
                .starts_with(self.prefix)
                .then(|| ResponsePayload::empty(self.status_code))
        }
    }

    fn composite() -> CompositeRouter {
        CompositeRouter::new(vec![
            Box::new(PrefixRouter {
                prefix: "/api",
                status_code: StatusCode::OK,
            }),
            Box::new(PrefixRouter {
                prefix: "/",
                status_code: StatusCode::ACCEPTED,
            }),
        ])
    }

    #[tokio::test]
    async fn first_suitable_router_wins() {
        let router = composite();

        let mut request = MockRequestPayload::new(http::Method::GET, "/api/posts");
        let response = router.route(&mut request).await.unwrap();
        assert_eq!(response.status_code, StatusCode::OK);

        let mut request = MockRequestPayload::new(http::Method::GET, "/health");
        let response = router.route(&mut request).await.unwrap();
        assert_eq!(response.status_code, StatusCode::ACCEPTED);
    }

    #[tokio::test]
    async fn unrouted_request_is_not_found() {
        let router = CompositeRouter::new(vec![]);

        let mut request = MockRequestPayload::new(http::Method::GET, "/api/posts");
        let response = router.route(&mut request).await.unwrap();
        assert_eq!(response.status_code, StatusCode::NOT_FOUND);
    }
}
