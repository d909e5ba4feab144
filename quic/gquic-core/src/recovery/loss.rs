// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use crate::{packet::number::PacketNumber, recovery::Settings, time::Timestamp};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The packet may still be acknowledged
    NotLostYet,
    /// The packet is lost
    Lost(Reason),
}

/// The policy which declared a packet lost
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Reason {
    /// Enough packets sent after it were acknowledged
    PacketThreshold,
    /// It was sent long enough before the newest acknowledged packet
    TimeThreshold,
    /// The peer declared it will never acknowledge the packet
    StopWaiting,
}

/// Detect if the given packet number is lost based on how far from the largest
/// acked packet number it is and how much earlier it was sent than the packet
/// which was acknowledged last.
///
/// Callers only pass packets which precede the acknowledged ranges.
pub fn detect(
    settings: &Settings,
    time_sent: Timestamp,
    packet_number: PacketNumber,
    largest_acked_packet_number: PacketNumber,
    largest_acked_time_sent: Option<Timestamp>,
) -> Outcome {
    let packet_number_threshold_exceeded = largest_acked_packet_number
        .checked_distance(packet_number)
        .map_or(false, |distance| distance >= settings.packet_threshold());

    if packet_number_threshold_exceeded {
        return Outcome::Lost(Reason::PacketThreshold);
    }

    let time_threshold_exceeded = match (settings.time_threshold(), largest_acked_time_sent) {
        (Some(threshold), Some(largest_acked_time_sent)) => {
            largest_acked_time_sent.saturating_duration_since(time_sent) >= threshold
        }
        _ => false,
    };

    if time_threshold_exceeded {
        return Outcome::Lost(Reason::TimeThreshold);
    }

    Outcome::NotLostYet
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::{testing::now, Duration};

    fn pn(value: u64) -> PacketNumber {
        PacketNumber::new(value)
    }

    #[test]
    fn packet_number_threshold() {
        let settings = Settings::new();
        let time_sent = now();

        assert_eq!(
            detect(&settings, time_sent, pn(1), pn(4), None),
            Outcome::Lost(Reason::PacketThreshold)
        );
        assert_eq!(
            detect(&settings, time_sent, pn(1), pn(3), None),
            Outcome::NotLostYet
        );

        let settings = Settings::new().with_packet_threshold(1).unwrap();
        assert_eq!(
            detect(&settings, time_sent, pn(6), pn(7), None),
            Outcome::Lost(Reason::PacketThreshold)
        );
    }

    #[test]
    fn time_threshold() {
        let settings = Settings::new()
            .with_packet_threshold(100)
            .and_then(|s| s.with_time_threshold(Duration::from_millis(50)))
            .unwrap();
        let time_sent = now();

        assert_eq!(
            detect(
                &settings,
                time_sent,
                pn(1),
                pn(2),
                Some(time_sent + Duration::from_millis(50))
            ),
            Outcome::Lost(Reason::TimeThreshold)
        );
        assert_eq!(
            detect(
                &settings,
                time_sent,
                pn(1),
                pn(2),
                Some(time_sent + Duration::from_millis(49))
            ),
            Outcome::NotLostYet
        );
    }

    #[test]
    fn time_threshold_disabled() {
        let settings = Settings::new().with_packet_threshold(100).unwrap();
        let time_sent = now();

        assert_eq!(
            detect(
                &settings,
                time_sent,
                pn(1),
                pn(2),
                Some(time_sent + Duration::from_secs(60))
            ),
            Outcome::NotLostYet
        );
    }
}
