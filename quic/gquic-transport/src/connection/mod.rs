// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Composes packet protection and loss recovery for a single connection.
//!
//! A [`Connection`] is driven from one task. Everything it owns is mutated
//! through `&mut self`; the only state leaving the connection is the
//! [`LossEvent`](crate::aggregate::LossEvent) sent to the aggregator.

use crate::aggregate::{LossEvent, LossReporter};
use core::fmt;
use gquic_core::{
    crypto::{CryptoError, PacketProtection},
    frame::{self, Direction, Frame},
    packet::{number::PacketNumber, ByteCount},
    recovery::{self, AckOutcome, CongestionController, ConnectionStats, SentPacketRecord},
    time::Timestamp,
    transport,
};
use gquic_crypto::AesGcm128;
use std::collections::VecDeque;
use tracing::debug;

mod config;
mod protection;

pub use config::{Config, ValidationError};
pub use protection::Protection;

/// Identifies a connection within an endpoint
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(u64);

impl Id {
    #[inline]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    #[inline]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

#[derive(Debug)]
pub struct Connection<CC: CongestionController> {
    id: Id,
    config: Config,
    protection: Protection,
    recovery: recovery::Manager,
    congestion_controller: CC,
    // Frames from lost packets waiting to be written into new packets
    retransmission_queue: VecDeque<Frame>,
    loss_reporter: Option<LossReporter>,
}

impl<CC: CongestionController> Connection<CC> {
    pub fn new(id: Id, config: Config, congestion_controller: CC) -> Self {
        Self {
            id,
            config,
            protection: Protection::new(config.perspective(), config.version()),
            recovery: recovery::Manager::new(config.recovery_settings()),
            congestion_controller,
            retransmission_queue: VecDeque::new(),
            loss_reporter: None,
        }
    }

    /// Forwards loss events to an endpoint-wide aggregator
    pub fn with_loss_reporter(mut self, loss_reporter: LossReporter) -> Self {
        self.loss_reporter = Some(loss_reporter);
        self
    }

    /// Seals an outgoing packet payload with the current protection
    pub fn protect(
        &self,
        packet_number: PacketNumber,
        header: &[u8],
        payload: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        self.protection.protect(packet_number, header, payload)
    }

    /// Verifies an incoming packet in place and returns its payload
    pub fn unprotect<'a>(
        &self,
        packet_number: PacketNumber,
        header: &[u8],
        packet: &'a mut [u8],
    ) -> Result<&'a mut [u8], CryptoError> {
        self.protection
            .open(packet_number, header, packet)
            .map_err(|error| {
                debug!(connection = %self.id, %packet_number, %error, "dropping packet");
                error
            })
    }

    /// Installs the keys produced by the handshake. Packets protected by the
    /// null cipher are rejected from then on.
    pub fn on_handshake_keys(&mut self, sealer: AesGcm128, opener: AesGcm128) {
        self.protection.install_forward_secure_keys(sealer, opener);
        debug!(connection = %self.id, "forward secure protection installed");
    }

    pub fn on_packet_sent(
        &mut self,
        packet_number: PacketNumber,
        time_sent: Timestamp,
        sent_bytes: ByteCount,
        frames: Vec<Frame>,
    ) -> Result<(), transport::Error> {
        for frame in &frames {
            frame::log(frame, Direction::Sent);
        }

        self.recovery
            .on_packet_sent(packet_number, time_sent, sent_bytes, frames)?;
        self.congestion_controller
            .on_packet_sent(time_sent, sent_bytes);

        Ok(())
    }

    /// Dispatches a decoded frame to the recovery state it affects
    pub fn on_frame_received(&mut self, frame: &Frame, now: Timestamp) -> Result<(), transport::Error> {
        frame::log(frame, Direction::Received);

        match frame {
            Frame::Ack(ack) => {
                self.on_ack_received(ack, now)?;
            }
            Frame::StopWaiting(stop_waiting) => {
                self.on_stop_waiting(stop_waiting.least_unacked);
            }
            _ => {}
        }

        Ok(())
    }

    pub fn on_ack_received(
        &mut self,
        ack: &frame::AckFrame,
        now: Timestamp,
    ) -> Result<AckOutcome, transport::Error> {
        let outcome = self
            .recovery
            .on_ack_received(ack, now, &self.congestion_controller)
            .map_err(|error| {
                debug!(connection = %self.id, %error, "rejecting ack");
                error
            })?;

        if !outcome.acked.is_empty() {
            self.congestion_controller
                .on_packets_acked(&outcome.acked, outcome.rtt_sample);
        }

        self.on_packets_lost(&outcome.lost);

        Ok(outcome)
    }

    pub fn on_stop_waiting(&mut self, least_unacked: PacketNumber) -> Vec<SentPacketRecord> {
        let lost = self
            .recovery
            .on_stop_waiting(least_unacked, &self.congestion_controller);
        self.on_packets_lost(&lost);
        lost
    }

    fn on_packets_lost(&mut self, lost: &[SentPacketRecord]) {
        if lost.is_empty() {
            return;
        }

        let slow_start = self.congestion_controller.phase().is_slow_start();
        self.congestion_controller.on_packets_lost(lost);

        self.retransmission_queue.extend(
            lost.iter()
                .flat_map(|record| record.retransmittable_frames.iter().cloned()),
        );

        if let Some(reporter) = &self.loss_reporter {
            let event = LossEvent {
                connection: self.id,
                packets: lost.len() as u64,
                bytes: lost.iter().map(|record| record.sent_bytes).sum(),
                slow_start,
            };

            if reporter.report(event).is_err() {
                debug!(connection = %self.id, "loss aggregator closed");
                self.loss_reporter = None;
            }
        }
    }

    /// Removes the frames which need to be resent, oldest first
    pub fn take_retransmissions(&mut self) -> impl Iterator<Item = Frame> + '_ {
        self.retransmission_queue.drain(..)
    }

    pub fn has_retransmissions(&self) -> bool {
        !self.retransmission_queue.is_empty()
    }

    #[inline]
    pub fn stats_snapshot(&self) -> ConnectionStats {
        self.recovery.stats()
    }

    #[inline]
    pub fn id(&self) -> Id {
        self.id
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[inline]
    pub fn is_forward_secure(&self) -> bool {
        self.protection.is_forward_secure()
    }

    #[inline]
    pub fn recovery(&self) -> &recovery::Manager {
        &self.recovery
    }

    #[inline]
    pub fn congestion_controller(&self) -> &CC {
        &self.congestion_controller
    }

    #[inline]
    pub fn congestion_controller_mut(&mut self) -> &mut CC {
        &mut self.congestion_controller
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gquic_core::{
        endpoint,
        frame::{AckFrame, PingFrame, StopWaitingFrame, StreamFrame},
        recovery::{testing::MockCongestionController, Phase},
        time::Duration,
    };

    fn start() -> Timestamp {
        Timestamp::from_duration(Duration::from_secs(1))
    }

    fn connection(phase: Phase) -> Connection<MockCongestionController> {
        let config = Config::new(endpoint::Type::Client)
            .with_packet_threshold(1)
            .unwrap();
        Connection::new(Id::new(1), config, MockCongestionController::new(phase))
    }

    fn stream(stream_id: u32) -> Frame {
        StreamFrame {
            stream_id,
            ..Default::default()
        }
        .into()
    }

    #[test]
    fn lost_frames_are_queued_for_retransmission() {
        let mut connection = connection(Phase::SlowStart);

        for packet_number in 1..=3 {
            connection
                .on_packet_sent(
                    PacketNumber::new(packet_number),
                    start(),
                    100,
                    vec![
                        stream(packet_number as u32),
                        AckFrame::contiguous(0, 0).into(),
                    ],
                )
                .unwrap();
        }
        assert_eq!(connection.congestion_controller().bytes_sent, 300);

        let outcome = connection
            .on_ack_received(&AckFrame::contiguous(3, 3), start() + Duration::from_millis(10))
            .unwrap();
        assert_eq!(outcome.lost.len(), 2);
        assert_eq!(connection.congestion_controller().packets_acked, 1);
        assert_eq!(connection.congestion_controller().packets_lost, 2);
        assert_eq!(
            connection.congestion_controller().rtt_samples,
            [Duration::from_millis(10)]
        );

        assert!(connection.has_retransmissions());
        let frames: Vec<Frame> = connection.take_retransmissions().collect();
        assert_eq!(frames, [stream(1), stream(2)]);
        assert!(!connection.has_retransmissions());

        let stats = connection.stats_snapshot();
        assert_eq!(stats.slowstart_packets_lost, 2);
        assert_eq!(stats.slowstart_bytes_lost, 200);
    }

    #[test]
    fn received_frames_are_dispatched() {
        let mut connection = connection(Phase::CongestionAvoidance);
        for packet_number in 1..=4 {
            connection
                .on_packet_sent(
                    PacketNumber::new(packet_number),
                    start(),
                    10,
                    vec![PingFrame.into()],
                )
                .unwrap();
        }

        let stop_waiting: Frame = StopWaitingFrame::new(3).into();
        connection.on_frame_received(&stop_waiting, start()).unwrap();
        assert_eq!(connection.recovery().len(), 2);
        assert_eq!(connection.congestion_controller().packets_lost, 2);

        connection
            .on_frame_received(&AckFrame::contiguous(4, 4).into(), start())
            .unwrap();
        assert!(connection.recovery().is_empty());
        assert_eq!(connection.congestion_controller().packets_acked, 1);
        assert_eq!(connection.congestion_controller().packets_lost, 3);

        // losses outside of slow start are not counted
        assert_eq!(connection.stats_snapshot(), ConnectionStats::default());
        assert_eq!(connection.take_retransmissions().count(), 3);
    }

    #[test]
    fn invalid_ack_is_surfaced() {
        let mut connection = connection(Phase::SlowStart);
        connection
            .on_packet_sent(PacketNumber::new(1), start(), 10, vec![])
            .unwrap();

        let mut ack = AckFrame::contiguous(1, 1);
        ack.lowest_acked = PacketNumber::new(2);
        let frame: Frame = ack.into();
        assert!(matches!(
            connection.on_frame_received(&frame, start()),
            Err(transport::Error::InvalidAck(_))
        ));
        assert_eq!(connection.recovery().len(), 1);
    }

    #[test]
    fn display_id() {
        assert_eq!(Id::new(255).to_string(), "0xff");
    }
}
