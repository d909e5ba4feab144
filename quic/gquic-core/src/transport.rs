// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use crate::{frame::ack, packet::number::PacketNumber};

/// Protocol violations which must be surfaced to the connection and close it
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, thiserror::Error)]
pub enum Error {
    /// The peer sent a structurally invalid acknowledgment
    #[error("protocol violation: invalid ack frame: {0}")]
    InvalidAck(#[from] ack::ValidationError),
    /// A packet was recorded out of sequence
    #[error("protocol violation: packet {packet_number} sent after {largest_sent}")]
    PacketNumberRegression {
        packet_number: PacketNumber,
        largest_sent: PacketNumber,
    },
    /// The peer acknowledged a packet which was never sent
    #[error("protocol violation: ack for unsent packet {largest_acked}")]
    UnsentPacketAcked { largest_acked: PacketNumber },
}
