// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use core::fmt;

/// A fully-decoded packet number.
///
/// Packet numbers are assigned monotonically by the sender and are unique
/// within one direction of a connection.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PacketNumber(u64);

impl PacketNumber {
    #[inline]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    #[inline]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Returns the next packet number, or `None` if the value would overflow
    #[inline]
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }

    /// Returns the previous packet number, or `None` if `self` is zero
    #[inline]
    pub fn prev(self) -> Option<Self> {
        self.0.checked_sub(1).map(Self)
    }

    /// Computes the distance between this packet number and the given packet number,
    /// returning `None` if overflow occurred.
    #[inline]
    pub fn checked_distance(self, rhs: Self) -> Option<u64> {
        self.0.checked_sub(rhs.0)
    }
}

impl From<u64> for PacketNumber {
    #[inline]
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Debug for PacketNumber {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "PacketNumber({})", self.0)
    }
}

impl fmt::Display for PacketNumber {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::LowerHex for PacketNumber {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

/// An inclusive range of `PacketNumber`s
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PacketNumberRange {
    start: PacketNumber,
    end: PacketNumber,
    exhausted: bool,
}

impl PacketNumberRange {
    /// Creates a new packet number range.
    ///
    /// Callers are expected to have validated `start <= end`; an inverted range is empty.
    #[inline]
    pub fn new(start: PacketNumber, end: PacketNumber) -> Self {
        debug_assert!(start <= end, "start must be less than or equal to end");
        Self {
            start,
            end,
            exhausted: start > end,
        }
    }

    /// Returns the lower bound of the range (inclusive).
    #[inline]
    pub fn start(&self) -> PacketNumber {
        self.start
    }

    /// Returns the upper bound of the range (inclusive).
    #[inline]
    pub fn end(&self) -> PacketNumber {
        self.end
    }
}

impl Iterator for PacketNumberRange {
    type Item = PacketNumber;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted || self.start > self.end {
            self.exhausted = true;
            return None;
        }

        let current = self.start;
        match current.next() {
            Some(next) if next <= self.end => self.start = next,
            _ => self.exhausted = true,
        }
        Some(current)
    }
}

impl DoubleEndedIterator for PacketNumberRange {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.exhausted || self.start > self.end {
            self.exhausted = true;
            return None;
        }

        let current = self.end;
        match current.prev() {
            Some(prev) if prev >= self.start => self.end = prev,
            _ => self.exhausted = true,
        }
        Some(current)
    }
}

/// The number of bytes used to encode a packet number on the wire
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum PacketNumberLen {
    One = 1,
    Two = 2,
    #[default]
    Four = 4,
    Six = 6,
}

impl PacketNumberLen {
    /// Returns the bytesize required for encoding the given `PacketNumberLen`
    #[inline]
    pub const fn bytesize(self) -> usize {
        self as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pn(value: u64) -> PacketNumber {
        PacketNumber::new(value)
    }

    #[test]
    fn iterator() {
        let mut counter = 1;
        let range = PacketNumberRange::new(pn(1), pn(10));
        assert_eq!(pn(1), range.start());
        assert_eq!(pn(10), range.end());

        for packet_number in range {
            assert_eq!(counter, packet_number.as_u64());
            counter += 1;
        }

        assert_eq!(counter, 11);
    }

    #[test]
    fn double_ended_iterator_zero() {
        let mut items = vec![];
        let mut range = PacketNumberRange::new(pn(0), pn(9));

        while let Some(packet_number) = range.next_back() {
            items.push(packet_number.as_u64());
        }

        items.reverse();
        assert_eq!(items, (0..=9).collect::<Vec<_>>());
    }

    #[test]
    fn start_equals_end() {
        let mut range = PacketNumberRange::new(pn(1), pn(1));
        assert_eq!(Some(pn(1)), range.next_back());
        assert_eq!(None, range.next());
    }

    #[test]
    fn end_is_max_packet_number() {
        assert_eq!(2, PacketNumberRange::new(pn(u64::MAX - 1), pn(u64::MAX)).count());
    }

    #[test]
    fn distance() {
        assert_eq!(Some(3), pn(10).checked_distance(pn(7)));
        assert_eq!(None, pn(7).checked_distance(pn(10)));
    }
}
