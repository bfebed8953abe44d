// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! # Tracing configuration setup.
//!
//! The server code is instrumented with Rust's `tracing` framework.
//!
//! Calling the `init` function will initialize a global tracing subscriber based on the values of
//! the `JSONAPI_LOG` environment variable which follows the same conventions as `RUST_LOG`. This
//! will provide console logging. Without `JSONAPI_LOG`, only warnings and errors are printed.
//!
//! For example, to see every classified request:
//!
//! ```shell
//! $ JSONAPI_LOG=jsonapi_router=debug jsonapi-server
//! ```

use thiserror::Error;
use tracing_subscriber::{EnvFilter, filter::LevelFilter, prelude::*};

use crate::env_const::JSONAPI_LOG;

/// Initialize the tracing subscriber.
///
/// Fails if a global subscriber has already been installed.
pub fn init() -> Result<(), LoggingError> {
    let fmt_layer = tracing_subscriber::fmt::layer().compact();
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .with_env_var(JSONAPI_LOG)
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("Unable to install the tracing subscriber: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),
}
