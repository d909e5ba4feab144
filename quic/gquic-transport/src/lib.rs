// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Per-connection composition of the gQUIC packet protection and loss
//! recovery core, plus endpoint-wide loss aggregation.

pub mod aggregate;
pub mod connection;

pub use connection::{Config, Connection};
