// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use crate::{packet::ByteCount, recovery::congestion_controller::Phase};

/// Loss counters consumed by the congestion controller.
///
/// Only the sent packet ledger updates the counters and they never decrease
/// over the lifetime of a connection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ConnectionStats {
    pub slowstart_packets_lost: u64,
    pub slowstart_bytes_lost: ByteCount,
}

impl ConnectionStats {
    /// Accounts for a lost packet; losses outside of slow start are not counted
    #[inline]
    pub(crate) fn on_packet_lost(&mut self, sent_bytes: ByteCount, phase: Phase) {
        if phase.is_slow_start() {
            self.slowstart_packets_lost = self.slowstart_packets_lost.saturating_add(1);
            self.slowstart_bytes_lost = self.slowstart_bytes_lost.saturating_add(sent_bytes);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_slow_start_losses_are_counted() {
        let mut stats = ConnectionStats::default();

        stats.on_packet_lost(100, Phase::SlowStart);
        stats.on_packet_lost(200, Phase::SlowStart);
        stats.on_packet_lost(50, Phase::SlowStart);
        assert_eq!(stats.slowstart_packets_lost, 3);
        assert_eq!(stats.slowstart_bytes_lost, 350);

        stats.on_packet_lost(1000, Phase::CongestionAvoidance);
        stats.on_packet_lost(1000, Phase::Recovery);
        assert_eq!(stats.slowstart_packets_lost, 3);
        assert_eq!(stats.slowstart_bytes_lost, 350);
    }
}
