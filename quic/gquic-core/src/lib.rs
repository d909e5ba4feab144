// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Packet protection and loss-recovery core for the gQUIC transport.
//!
//! The crate is split along the packet pipeline:
//!
//! * [`crypto`] seals and opens packet payloads
//! * [`frame`] holds the decoded frame model and the retransmission classifier
//! * [`recovery`] tracks sent packets and turns acknowledgments into acked/lost events

pub mod crypto;
pub mod endpoint;
pub mod frame;
pub mod packet;
pub mod recovery;
pub mod time;
pub mod transport;
pub mod version;

pub use version::Version;
