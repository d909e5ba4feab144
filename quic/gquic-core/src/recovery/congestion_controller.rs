// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use crate::{
    packet::ByteCount,
    recovery::SentPacketRecord,
    time::{Duration, Timestamp},
};

/// The congestion window growth phase a controller is currently in
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Phase {
    #[default]
    SlowStart,
    CongestionAvoidance,
    Recovery,
}

impl Phase {
    #[inline]
    pub fn is_slow_start(self) -> bool {
        matches!(self, Phase::SlowStart)
    }
}

/// The window-management policy which consumes the ledger's acked and lost events.
///
/// The ledger only queries [`CongestionController::phase`]; the remaining
/// callbacks are invoked by the connection after each ledger update.
pub trait CongestionController {
    /// Returns the phase the controller is in at the moment a loss is accounted
    fn phase(&self) -> Phase;

    #[inline]
    fn on_packet_sent(&mut self, _time_sent: Timestamp, _sent_bytes: ByteCount) {}

    #[inline]
    fn on_packets_acked(&mut self, _acked: &[SentPacketRecord], _rtt_sample: Option<Duration>) {}

    #[inline]
    fn on_packets_lost(&mut self, _lost: &[SentPacketRecord]) {}
}

impl<T: CongestionController> CongestionController for &mut T {
    #[inline]
    fn phase(&self) -> Phase {
        (**self).phase()
    }

    #[inline]
    fn on_packet_sent(&mut self, time_sent: Timestamp, sent_bytes: ByteCount) {
        (**self).on_packet_sent(time_sent, sent_bytes)
    }

    #[inline]
    fn on_packets_acked(&mut self, acked: &[SentPacketRecord], rtt_sample: Option<Duration>) {
        (**self).on_packets_acked(acked, rtt_sample)
    }

    #[inline]
    fn on_packets_lost(&mut self, lost: &[SentPacketRecord]) {
        (**self).on_packets_lost(lost)
    }
}

#[cfg(any(test, feature = "testing"))]
pub mod testing {
    use super::*;

    /// A controller with a fixed phase which records every callback
    #[derive(Clone, Debug, Default, PartialEq)]
    pub struct MockCongestionController {
        pub phase: Phase,
        pub bytes_sent: ByteCount,
        pub packets_acked: usize,
        pub packets_lost: usize,
        pub rtt_samples: Vec<Duration>,
    }

    impl MockCongestionController {
        pub fn new(phase: Phase) -> Self {
            Self {
                phase,
                ..Default::default()
            }
        }
    }

    impl CongestionController for MockCongestionController {
        fn phase(&self) -> Phase {
            self.phase
        }

        fn on_packet_sent(&mut self, _time_sent: Timestamp, sent_bytes: ByteCount) {
            self.bytes_sent += sent_bytes;
        }

        fn on_packets_acked(&mut self, acked: &[SentPacketRecord], rtt_sample: Option<Duration>) {
            self.packets_acked += acked.len();
            self.rtt_samples.extend(rtt_sample);
        }

        fn on_packets_lost(&mut self, lost: &[SentPacketRecord]) {
            self.packets_lost += lost.len();
        }
    }
}
