// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use crate::time::Duration;
use core::num::NonZeroU64;

/// The RECOMMENDED packet reordering threshold, based on TCP fast retransmit
pub const K_PACKET_THRESHOLD: u64 = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("packet threshold must be at least 1")]
    ZeroPacketThreshold,
    #[error("time threshold must be non-zero")]
    ZeroTimeThreshold,
}

/// Number of newer acknowledged packets after which an unacknowledged one is lost
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PacketThreshold(NonZeroU64);

impl PacketThreshold {
    pub const RECOMMENDED: Self = Self(match NonZeroU64::new(K_PACKET_THRESHOLD) {
        Some(value) => value,
        None => NonZeroU64::MIN,
    });

    #[inline]
    pub const fn as_u64(self) -> u64 {
        self.0.get()
    }
}

impl TryFrom<u64> for PacketThreshold {
    type Error = ValidationError;

    #[inline]
    fn try_from(value: u64) -> Result<Self, Self::Error> {
        NonZeroU64::new(value)
            .map(Self)
            .ok_or(ValidationError::ZeroPacketThreshold)
    }
}

/// Send-time distance to the newest acknowledged packet after which an
/// unacknowledged one is lost
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeThreshold(Duration);

impl TimeThreshold {
    #[inline]
    pub const fn as_duration(self) -> Duration {
        self.0
    }
}

impl TryFrom<Duration> for TimeThreshold {
    type Error = ValidationError;

    #[inline]
    fn try_from(value: Duration) -> Result<Self, Self::Error> {
        if value.is_zero() {
            return Err(ValidationError::ZeroTimeThreshold);
        }
        Ok(Self(value))
    }
}

/// Loss detection policy applied by the sent packet ledger.
///
/// The thresholds belong to the congestion controller's policy; the ledger
/// only applies them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settings {
    pub(crate) packet_threshold: PacketThreshold,
    pub(crate) time_threshold: Option<TimeThreshold>,
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

macro_rules! setter {
    ($name:ident, $field:ident, $inner:ty) => {
        pub fn $name(mut self, value: $inner) -> Result<Self, ValidationError> {
            self.$field = value.try_into()?;
            Ok(self)
        }
    };
    ($name:ident, $field:ident, $inner:ty, optional) => {
        pub fn $name(mut self, value: $inner) -> Result<Self, ValidationError> {
            self.$field = Some(value.try_into()?);
            Ok(self)
        }
    };
}

impl Settings {
    pub const RECOMMENDED: Self = Self {
        packet_threshold: PacketThreshold::RECOMMENDED,
        time_threshold: None,
    };

    pub const fn new() -> Self {
        Self::RECOMMENDED
    }

    setter!(with_packet_threshold, packet_threshold, u64);
    setter!(with_time_threshold, time_threshold, Duration, optional);

    #[inline]
    pub const fn packet_threshold(&self) -> u64 {
        self.packet_threshold.as_u64()
    }

    #[inline]
    pub fn time_threshold(&self) -> Option<Duration> {
        self.time_threshold.map(TimeThreshold::as_duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = Settings::default();
        assert_eq!(settings.packet_threshold(), K_PACKET_THRESHOLD);
        assert_eq!(settings.time_threshold(), None);
    }

    #[test]
    fn setters_validate() {
        assert_eq!(
            Settings::new().with_packet_threshold(0),
            Err(ValidationError::ZeroPacketThreshold)
        );
        assert_eq!(
            Settings::new().with_time_threshold(Duration::ZERO),
            Err(ValidationError::ZeroTimeThreshold)
        );

        let settings = Settings::new()
            .with_packet_threshold(1)
            .and_then(|s| s.with_time_threshold(Duration::from_millis(10)))
            .unwrap();
        assert_eq!(settings.packet_threshold(), 1);
        assert_eq!(settings.time_threshold(), Some(Duration::from_millis(10)));
    }
}
