// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

//! Keyed packet protection for gQUIC connections that completed the handshake.
//!
//! Key agreement happens in the handshake layer; this crate only consumes the
//! resulting key and IV.

pub mod aesgcm;
mod iv;

pub use aesgcm::AesGcm128;
pub use iv::{Iv, NONCE_LEN};
