// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use crate::{
    frame::Frame,
    packet::{
        number::{PacketNumber, PacketNumberRange},
        ByteCount,
    },
    time::Timestamp,
};
use std::collections::{
    btree_map::{Iter, Range},
    BTreeMap,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum State {
    #[default]
    InFlight,
    Acked,
    Lost,
}

/// Bookkeeping for a single sent packet
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SentPacketRecord {
    pub packet_number: PacketNumber,
    /// The time the packet was sent
    pub time_sent: Timestamp,
    /// The number of bytes sent in the packet, including gQUIC framing overhead
    pub sent_bytes: ByteCount,
    /// Frames which must be resent if the packet is lost
    pub retransmittable_frames: Vec<Frame>,
    pub state: State,
}

impl SentPacketRecord {
    /// Creates an in-flight record, keeping only the retransmittable frames
    pub fn new(
        packet_number: PacketNumber,
        time_sent: Timestamp,
        sent_bytes: ByteCount,
        frames: Vec<Frame>,
    ) -> Self {
        Self {
            packet_number,
            time_sent,
            sent_bytes,
            retransmittable_frames: crate::frame::retain_retransmittable(frames),
            state: State::InFlight,
        }
    }

    #[inline]
    pub fn is_in_flight(&self) -> bool {
        self.state == State::InFlight
    }

    #[inline]
    pub fn is_retransmittable(&self) -> bool {
        !self.retransmittable_frames.is_empty()
    }
}

/// Sent packet records ordered by packet number
#[derive(Clone, Debug, Default)]
pub struct SentPackets {
    sent_packets: BTreeMap<PacketNumber, SentPacketRecord>,
}

impl SentPackets {
    /// Inserts the given record, returning the one it replaced, if any
    pub fn insert(&mut self, record: SentPacketRecord) -> Option<SentPacketRecord> {
        self.sent_packets.insert(record.packet_number, record)
    }

    pub fn get(&self, packet_number: PacketNumber) -> Option<&SentPacketRecord> {
        self.sent_packets.get(&packet_number)
    }

    /// Constructs a double-ended iterator over a sub-range of packet numbers
    pub fn range(&self, range: PacketNumberRange) -> Range<'_, PacketNumber, SentPacketRecord> {
        self.sent_packets.range(range.start()..=range.end())
    }

    /// Iterates over the records with packet numbers strictly below `packet_number`
    pub fn before(&self, packet_number: PacketNumber) -> Range<'_, PacketNumber, SentPacketRecord> {
        self.sent_packets.range(..packet_number)
    }

    pub fn remove(&mut self, packet_number: PacketNumber) -> Option<SentPacketRecord> {
        self.sent_packets.remove(&packet_number)
    }

    /// Gets an iterator over the records, sorted by packet number
    pub fn iter(&self) -> Iter<'_, PacketNumber, SentPacketRecord> {
        self.sent_packets.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.sent_packets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sent_packets.len()
    }
}
