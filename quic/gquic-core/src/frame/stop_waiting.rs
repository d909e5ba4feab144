// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use crate::packet::number::{PacketNumber, PacketNumberLen};

/// The sender's declaration that it will not retransmit anything below `least_unacked`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct StopWaitingFrame {
    pub least_unacked: PacketNumber,
    /// Only governs the encoded width on the wire
    pub packet_number_len: PacketNumberLen,
}

impl StopWaitingFrame {
    #[inline]
    pub fn new(least_unacked: u64) -> Self {
        Self {
            least_unacked: PacketNumber::new(least_unacked),
            packet_number_len: PacketNumberLen::default(),
        }
    }
}
