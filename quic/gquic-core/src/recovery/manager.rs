// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use crate::{
    frame::{AckFrame, Frame},
    packet::{number::PacketNumber, ByteCount},
    recovery::{
        loss, sent_packets::State, CongestionController, ConnectionStats, SentPacketRecord,
        SentPackets, Settings,
    },
    time::{Duration, Timestamp},
    transport,
};
use tracing::{debug, trace};

/// The sent packet ledger.
///
/// Every packet is recorded as in flight when it is sent and leaves the ledger
/// exactly once, either acknowledged or lost. All calls for one connection must
/// be serialized by the caller.
#[derive(Debug, Default)]
pub struct Manager {
    settings: Settings,

    // Packets which have been sent and are neither acknowledged nor lost yet
    sent_packets: SentPackets,

    // The largest packet number recorded so far
    largest_sent: Option<PacketNumber>,

    // The largest packet number acknowledged so far
    largest_acked: Option<PacketNumber>,

    // The send time of the newest acknowledged packet, used by the time threshold
    largest_acked_time_sent: Option<Timestamp>,

    bytes_in_flight: ByteCount,

    stats: ConnectionStats,
}

/// The packets resolved by a single acknowledgment
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AckOutcome {
    /// Newly acknowledged packets, in increasing packet number order
    pub acked: Vec<SentPacketRecord>,
    /// Packets declared lost, in increasing packet number order
    pub lost: Vec<SentPacketRecord>,
    /// Round trip sample taken from the largest acknowledged packet, if it was newly acked
    pub rtt_sample: Option<Duration>,
}

impl AckOutcome {
    pub fn acked_packet_numbers(&self) -> impl Iterator<Item = PacketNumber> + '_ {
        self.acked.iter().map(|record| record.packet_number)
    }

    pub fn lost_packet_numbers(&self) -> impl Iterator<Item = PacketNumber> + '_ {
        self.lost.iter().map(|record| record.packet_number)
    }

    pub fn lost_bytes(&self) -> ByteCount {
        self.lost.iter().map(|record| record.sent_bytes).sum()
    }

    /// Returns the frames of the lost packets which need to be resent
    pub fn retransmittable_frames(&self) -> impl Iterator<Item = &Frame> + '_ {
        self.lost
            .iter()
            .flat_map(|record| record.retransmittable_frames.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.acked.is_empty() && self.lost.is_empty()
    }
}

impl Manager {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            ..Default::default()
        }
    }

    /// Records a newly sent packet as in flight.
    ///
    /// Packet numbers must be strictly increasing.
    pub fn on_packet_sent(
        &mut self,
        packet_number: PacketNumber,
        time_sent: Timestamp,
        sent_bytes: ByteCount,
        frames: Vec<Frame>,
    ) -> Result<(), transport::Error> {
        if let Some(largest_sent) = self.largest_sent {
            if packet_number <= largest_sent {
                return Err(transport::Error::PacketNumberRegression {
                    packet_number,
                    largest_sent,
                });
            }
        }

        let record = SentPacketRecord::new(packet_number, time_sent, sent_bytes, frames);

        trace!(
            %packet_number,
            sent_bytes,
            retransmittable = record.is_retransmittable(),
            "packet sent"
        );

        self.largest_sent = Some(packet_number);
        self.bytes_in_flight = self.bytes_in_flight.saturating_add(sent_bytes);
        self.sent_packets.insert(record);

        Ok(())
    }

    /// Applies an acknowledgment, returning the newly acked and lost packets.
    ///
    /// A malformed frame is rejected before any state changes.
    pub fn on_ack_received<CC: CongestionController + ?Sized>(
        &mut self,
        ack: &AckFrame,
        now: Timestamp,
        congestion_controller: &CC,
    ) -> Result<AckOutcome, transport::Error> {
        ack.validate()?;

        if self
            .largest_sent
            .map_or(true, |largest_sent| ack.largest_acked > largest_sent)
        {
            return Err(transport::Error::UnsentPacketAcked {
                largest_acked: ack.largest_acked,
            });
        }

        let mut newly_acked: Vec<PacketNumber> = Vec::new();
        for range in ack.ranges() {
            newly_acked.extend(
                self.sent_packets
                    .range(range)
                    .filter(|(_, record)| record.is_in_flight())
                    .map(|(packet_number, _)| *packet_number),
            );
        }
        newly_acked.sort_unstable();

        let mut acked = Vec::with_capacity(newly_acked.len());
        for packet_number in newly_acked {
            if let Some(mut record) = self.sent_packets.remove(packet_number) {
                record.state = State::Acked;
                self.bytes_in_flight = self.bytes_in_flight.saturating_sub(record.sent_bytes);
                acked.push(record);
            }
        }

        let mut rtt_sample = None;
        if let Some(largest_newly_acked) = acked
            .last()
            .filter(|record| record.packet_number == ack.largest_acked)
        {
            let latest_rtt = now - largest_newly_acked.time_sent;
            // the peer's delay is only subtracted when it leaves a positive sample
            rtt_sample = Some(if ack.delay_time < latest_rtt {
                latest_rtt - ack.delay_time
            } else {
                latest_rtt
            });

            if self
                .largest_acked
                .map_or(true, |largest_acked| ack.largest_acked >= largest_acked)
            {
                self.largest_acked_time_sent = Some(largest_newly_acked.time_sent);
            }
        }

        self.largest_acked = Some(
            self.largest_acked
                .map_or(ack.largest_acked, |largest_acked| {
                    largest_acked.max(ack.largest_acked)
                }),
        );

        let lost = self.detect_lost_packets(ack.lowest_acked, congestion_controller);

        debug!(
            largest_acked = %ack.largest_acked,
            acked = acked.len(),
            lost = lost.len(),
            ?rtt_sample,
            "ack received"
        );

        Ok(AckOutcome {
            acked,
            lost,
            rtt_sample,
        })
    }

    /// Resolves every in-flight packet below `least_unacked` as lost, since the
    /// peer will never acknowledge them.
    pub fn on_stop_waiting<CC: CongestionController + ?Sized>(
        &mut self,
        least_unacked: PacketNumber,
        congestion_controller: &CC,
    ) -> Vec<SentPacketRecord> {
        let abandoned: Vec<(PacketNumber, loss::Reason)> = self
            .sent_packets
            .before(least_unacked)
            .filter(|(_, record)| record.is_in_flight())
            .map(|(packet_number, _)| (*packet_number, loss::Reason::StopWaiting))
            .collect();

        self.declare_lost(abandoned, congestion_controller)
    }

    fn detect_lost_packets<CC: CongestionController + ?Sized>(
        &mut self,
        lowest_acked: PacketNumber,
        congestion_controller: &CC,
    ) -> Vec<SentPacketRecord> {
        let Some(largest_acked) = self.largest_acked else {
            return Vec::new();
        };

        let lost: Vec<(PacketNumber, loss::Reason)> = self
            .sent_packets
            .before(lowest_acked)
            .filter(|(_, record)| record.is_in_flight())
            .filter_map(|(packet_number, record)| {
                match loss::detect(
                    &self.settings,
                    record.time_sent,
                    *packet_number,
                    largest_acked,
                    self.largest_acked_time_sent,
                ) {
                    loss::Outcome::Lost(reason) => Some((*packet_number, reason)),
                    loss::Outcome::NotLostYet => None,
                }
            })
            .collect();

        self.declare_lost(lost, congestion_controller)
    }

    fn declare_lost<CC: CongestionController + ?Sized>(
        &mut self,
        lost: Vec<(PacketNumber, loss::Reason)>,
        congestion_controller: &CC,
    ) -> Vec<SentPacketRecord> {
        let mut records = Vec::with_capacity(lost.len());

        for (packet_number, reason) in lost {
            let Some(mut record) = self.sent_packets.remove(packet_number) else {
                continue;
            };

            let phase = congestion_controller.phase();
            record.state = State::Lost;
            self.bytes_in_flight = self.bytes_in_flight.saturating_sub(record.sent_bytes);
            self.stats.on_packet_lost(record.sent_bytes, phase);

            debug!(
                %packet_number,
                sent_bytes = record.sent_bytes,
                ?reason,
                ?phase,
                "packet lost"
            );

            records.push(record);
        }

        records
    }

    #[inline]
    pub fn stats(&self) -> ConnectionStats {
        self.stats
    }

    #[inline]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[inline]
    pub fn largest_sent(&self) -> Option<PacketNumber> {
        self.largest_sent
    }

    #[inline]
    pub fn largest_acked(&self) -> Option<PacketNumber> {
        self.largest_acked
    }

    #[inline]
    pub fn bytes_in_flight(&self) -> ByteCount {
        self.bytes_in_flight
    }

    /// Returns the record of a packet which is still in flight
    pub fn get(&self, packet_number: PacketNumber) -> Option<&SentPacketRecord> {
        self.sent_packets.get(packet_number)
    }

    /// Iterates over the in-flight packets in increasing packet number order
    pub fn iter(&self) -> impl Iterator<Item = &SentPacketRecord> + '_ {
        self.sent_packets.iter().map(|(_, record)| record)
    }

    pub fn len(&self) -> usize {
        self.sent_packets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sent_packets.is_empty()
    }
}
