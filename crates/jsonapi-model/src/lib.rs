// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Request classification and document types for JSON:API endpoints.
//!
//! The central piece is [`OperationKind::classify`], which decides which of the ten JSON:API
//! operations an inbound request represents, given its method and the decomposed URL.

pub mod descriptor;
pub mod document;
pub mod method;
pub mod operation;

pub use descriptor::InboundRequestDescriptor;
pub use method::{Method, UnsupportedMethod};
pub use operation::OperationKind;
