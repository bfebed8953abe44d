// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use actix_web::{App, HttpServer, middleware, web};

use server_actix::configure_router;
use thiserror::Error;
use tracing_actix_web::TracingLogger;

use std::io::ErrorKind;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time;

use common::{
    env_const::{JSONAPI_SERVER_HOST, get_resource_types, get_server_port},
    logging_tracing::{self, LoggingError},
    router::CompositeRouter,
};
use jsonapi_env::{EnvError, Environment, SystemEnvironment};
use jsonapi_router::{JsonApiRouter, JsonApiRouterConfig, MemoryStore, ResourceAdapter};

#[derive(Error)]
enum ServerError {
    #[error("Port {0} is already in use. Check if there is another process running at that port.")]
    PortInUse(u16),
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    EnvError(#[from] EnvError),
    #[error("{0}")]
    Logging(#[from] LoggingError),
}

// A custom `Debug` implementation for `ServerError` (that delegate to the `Display` impl), so that
// we don't print the default `Debug` implementation's message when the server exits.
impl std::fmt::Debug for ServerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self}")
    }
}

/// Serve the configured resource types from an in-memory store
#[actix_web::main]
async fn main() -> Result<(), ServerError> {
    let start_time = time::SystemTime::now();

    logging_tracing::init()?;

    let env = SystemEnvironment;

    let config = JsonApiRouterConfig::from_env(&env)?;
    let path_prefix = config.path_prefix.clone();

    let store = MemoryStore::new();
    let adapters = get_resource_types(&env)
        .into_iter()
        .map(|resource_type| {
            let adapter: Arc<dyn ResourceAdapter> = Arc::new(store.adapter(&resource_type));
            (resource_type, adapter)
        })
        .collect::<Vec<_>>();

    let jsonapi_router = JsonApiRouter::new(config, adapters);
    let mut resource_types = jsonapi_router
        .resource_types()
        .map(str::to_string)
        .collect::<Vec<_>>();
    resource_types.sort();

    let system_router = web::Data::new(CompositeRouter::new(vec![Box::new(jsonapi_router)]));

    let server_port = get_server_port(&env)?;

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(middleware::NormalizePath::new(
                middleware::TrailingSlash::Trim,
            ))
            .configure(configure_router(system_router.clone()))
    });

    // Bind to all interfaces unless told otherwise, so the server is reachable from outside a
    // container.
    let server_host = env.get(JSONAPI_SERVER_HOST);
    let server = match server_host {
        Some(host) => server.bind((host, server_port)),
        None => server.bind(("0.0.0.0", server_port)),
    };

    match server {
        Ok(server) => {
            let pretty_addr = pretty_addr(&server.addrs());

            println!(
                "Started server on {} in {:.2} ms",
                pretty_addr,
                start_time
                    .elapsed()
                    .map(|elapsed| elapsed.as_micros() as f64 / 1000.0)
                    .unwrap_or_default()
            );
            println!("- JSON:API resources hosted at:");
            for resource_type in &resource_types {
                println!("\thttp://{pretty_addr}{path_prefix}/{resource_type}");
            }

            Ok(server.run().await?)
        }
        Err(e) => Err(if e.kind() == ErrorKind::AddrInUse {
            ServerError::PortInUse(server_port)
        } else {
            ServerError::Io(e)
        }),
    }
}

fn pretty_addr(addrs: &[SocketAddr]) -> String {
    let loopback_addr = addrs.iter().find(|addr| addr.ip().is_loopback());

    match loopback_addr {
        Some(addr) => format!("localhost:{}", addr.port()),
        None => match addrs {
            // Print single address without square brackets
            [addr] => format!("{addr}"),
            _ => {
                format!("{addrs:?}")
            }
        },
    }
}
