// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

pub mod congestion_controller;
pub mod loss;
mod manager;
mod sent_packets;
mod settings;
mod stats;

pub use congestion_controller::{CongestionController, Phase};
pub use manager::{AckOutcome, Manager};
pub use sent_packets::{SentPacketRecord, SentPackets, State};
pub use settings::{PacketThreshold, Settings, TimeThreshold, ValidationError, K_PACKET_THRESHOLD};
pub use stats::ConnectionStats;

#[cfg(any(test, feature = "testing"))]
pub mod testing {
    pub use super::congestion_controller::testing::MockCongestionController;
}
