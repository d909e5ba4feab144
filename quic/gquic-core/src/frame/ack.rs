// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use crate::{
    packet::number::{PacketNumber, PacketNumberRange},
    time::Duration,
};
use core::fmt;

/// An inclusive range of acknowledged packet numbers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AckRange {
    pub first: PacketNumber,
    pub last: PacketNumber,
}

impl AckRange {
    #[inline]
    pub const fn new(first: u64, last: u64) -> Self {
        Self {
            first: PacketNumber::new(first),
            last: PacketNumber::new(last),
        }
    }
}

impl fmt::Display for AckRange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{{:#x}, {:#x}}}", self.first, self.last)
    }
}

/// A decoded ACK frame.
///
/// `ack_ranges` are ordered from the highest packet numbers down. A frame
/// without any ranges acknowledges everything between `lowest_acked` and
/// `largest_acked`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AckFrame {
    pub largest_acked: PacketNumber,
    pub lowest_acked: PacketNumber,
    pub ack_ranges: Vec<AckRange>,
    /// Time the peer held the largest acked packet before sending this frame
    pub delay_time: Duration,
}

/// Reasons an ACK frame can be structurally invalid
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, thiserror::Error)]
pub enum ValidationError {
    #[error("lowest acked packet is above the largest acked packet")]
    InvertedBounds,
    #[error("ack range starts after it ends")]
    InvertedRange,
    #[error("ack ranges are not in decreasing order")]
    NotDecreasing,
    #[error("ack ranges overlap")]
    Overlapping,
    #[error("largest acked does not match the first ack range")]
    LargestAckedMismatch,
    #[error("lowest acked does not match the last ack range")]
    LowestAckedMismatch,
}

impl AckFrame {
    /// Creates a frame acknowledging a single contiguous range
    pub fn contiguous(lowest: u64, largest: u64) -> Self {
        Self {
            largest_acked: PacketNumber::new(largest),
            lowest_acked: PacketNumber::new(lowest),
            ack_ranges: Vec::new(),
            delay_time: Duration::ZERO,
        }
    }

    /// Creates a frame from ranges in decreasing order, deriving the bounds from them
    pub fn from_ranges(ack_ranges: Vec<AckRange>) -> Self {
        let largest_acked = ack_ranges.first().map(|r| r.last).unwrap_or_default();
        let lowest_acked = ack_ranges.last().map(|r| r.first).unwrap_or_default();
        Self {
            largest_acked,
            lowest_acked,
            ack_ranges,
            delay_time: Duration::ZERO,
        }
    }

    #[inline]
    pub fn with_delay_time(mut self, delay_time: Duration) -> Self {
        self.delay_time = delay_time;
        self
    }

    /// Checks the structural invariants of the frame
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.lowest_acked > self.largest_acked {
            return Err(ValidationError::InvertedBounds);
        }

        let (first, last) = match (self.ack_ranges.first(), self.ack_ranges.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Ok(()),
        };

        if first.last != self.largest_acked {
            return Err(ValidationError::LargestAckedMismatch);
        }

        if last.first != self.lowest_acked {
            return Err(ValidationError::LowestAckedMismatch);
        }

        for range in &self.ack_ranges {
            if range.first > range.last {
                return Err(ValidationError::InvertedRange);
            }
        }

        for pair in self.ack_ranges.windows(2) {
            let (higher, lower) = (&pair[0], &pair[1]);

            if lower.first > higher.last {
                return Err(ValidationError::NotDecreasing);
            }

            if lower.last >= higher.first {
                return Err(ValidationError::Overlapping);
            }
        }

        Ok(())
    }

    /// Iterates over the acknowledged ranges, highest first.
    ///
    /// Inverted bounds describe no packets and are skipped; call
    /// [`Self::validate`] to reject such frames.
    pub fn ranges(&self) -> impl Iterator<Item = PacketNumberRange> + '_ {
        let implicit = self.ack_ranges.is_empty().then_some(AckRange {
            first: self.lowest_acked,
            last: self.largest_acked,
        });

        implicit
            .into_iter()
            .chain(self.ack_ranges.iter().copied())
            .filter(|range| range.first <= range.last)
            .map(|range| PacketNumberRange::new(range.first, range.last))
    }
}
