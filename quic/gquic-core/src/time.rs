// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

pub use core::time::Duration;
use core::{fmt, ops};

/// An absolute point in time.
///
/// The absolute value of a `Timestamp` is only meaningful relative to other
/// timestamps taken from the same clock, which is owned by the connection layer.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(Duration);

impl Timestamp {
    /// Creates a `Timestamp` from a `Duration` since the clock's epoch
    #[inline]
    pub const fn from_duration(duration: Duration) -> Self {
        Self(duration)
    }

    /// Returns the `Duration` since the clock's epoch
    #[inline]
    pub const fn as_duration(self) -> Duration {
        self.0
    }

    /// Returns the amount of time elapsed since `earlier`, or zero if `earlier` is later
    #[inline]
    pub fn saturating_duration_since(self, earlier: Self) -> Duration {
        self.0.saturating_sub(earlier.0)
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Timestamp({:?})", self.0)
    }
}

impl ops::Add<Duration> for Timestamp {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Duration) -> Self {
        Self(self.0 + rhs)
    }
}

impl ops::Sub for Timestamp {
    type Output = Duration;

    #[inline]
    fn sub(self, rhs: Self) -> Duration {
        self.saturating_duration_since(rhs)
    }
}

#[cfg(any(test, feature = "testing"))]
pub mod testing {
    use super::*;

    /// Returns a fixed, non-zero timestamp for tests
    pub fn now() -> Timestamp {
        Timestamp::from_duration(Duration::from_secs(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic() {
        let start = testing::now();
        let later = start + Duration::from_millis(25);
        assert_eq!(later - start, Duration::from_millis(25));
        assert_eq!(start - later, Duration::ZERO);
    }
}
