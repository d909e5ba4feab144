// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Endpoint-wide loss statistics.
//!
//! Connections never share recovery state. Each one holds a [`LossReporter`]
//! and sends a [`LossEvent`] whenever its ledger declares packets lost; a
//! single [`Aggregator`] task owns the totals.

use crate::connection;
use core::{future::poll_fn, pin::Pin};
use futures_channel::mpsc;
use futures_core::Stream;
use gquic_core::packet::ByteCount;
use hashbrown::HashSet;

/// Packets a connection declared lost in one ledger update
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LossEvent {
    pub connection: connection::Id,
    pub packets: u64,
    pub bytes: ByteCount,
    /// The congestion controller was in slow start when the loss was accounted
    pub slow_start: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GlobalLossStats {
    pub events: u64,
    pub packets_lost: u64,
    pub bytes_lost: ByteCount,
    pub slowstart_packets_lost: u64,
    pub slowstart_bytes_lost: ByteCount,
    /// Number of distinct connections which reported a loss
    pub connections: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("the loss aggregator has shut down")]
pub struct AggregatorClosed;

/// Held by connections. Used to submit loss events to the aggregator.
#[derive(Clone, Debug)]
pub struct LossReporter {
    sender: mpsc::UnboundedSender<LossEvent>,
}

impl LossReporter {
    pub fn report(&self, event: LossEvent) -> Result<(), AggregatorClosed> {
        self.sender
            .unbounded_send(event)
            .map_err(|_| AggregatorClosed)
    }
}

/// Owns the endpoint-wide totals
#[derive(Debug)]
pub struct Aggregator {
    receiver: mpsc::UnboundedReceiver<LossEvent>,
    stats: GlobalLossStats,
    connections: HashSet<connection::Id>,
}

/// Creates a connected reporter/aggregator pair. The reporter may be cloned
/// for each connection.
pub fn channel() -> (LossReporter, Aggregator) {
    let (sender, receiver) = mpsc::unbounded();
    let aggregator = Aggregator {
        receiver,
        stats: GlobalLossStats::default(),
        connections: HashSet::new(),
    };
    (LossReporter { sender }, aggregator)
}

impl Aggregator {
    /// Consumes events until every reporter has been dropped
    pub async fn run(mut self) -> GlobalLossStats {
        while let Some(event) = self.next_event().await {
            self.on_loss_event(event);
        }

        tracing::debug!(stats = ?self.stats, "loss aggregator finished");

        self.stats
    }

    /// Applies the events already queued without waiting for more
    pub fn drain_pending(&mut self) -> GlobalLossStats {
        while let Ok(Some(event)) = self.receiver.try_next() {
            self.on_loss_event(event);
        }
        self.stats
    }

    #[inline]
    pub fn stats(&self) -> GlobalLossStats {
        self.stats
    }

    async fn next_event(&mut self) -> Option<LossEvent> {
        poll_fn(|cx| Pin::new(&mut self.receiver).poll_next(cx)).await
    }

    fn on_loss_event(&mut self, event: LossEvent) {
        let stats = &mut self.stats;
        stats.events += 1;
        stats.packets_lost += event.packets;
        stats.bytes_lost += event.bytes;

        if event.slow_start {
            stats.slowstart_packets_lost += event.packets;
            stats.slowstart_bytes_lost += event.bytes;
        }

        if self.connections.insert(event.connection) {
            stats.connections = self.connections.len();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    fn event(id: u64, packets: u64, bytes: ByteCount, slow_start: bool) -> LossEvent {
        LossEvent {
            connection: connection::Id::new(id),
            packets,
            bytes,
            slow_start,
        }
    }

    #[test]
    fn run_until_reporters_drop() {
        let (reporter, aggregator) = channel();
        let other = reporter.clone();

        reporter.report(event(1, 2, 300, true)).unwrap();
        other.report(event(2, 1, 100, false)).unwrap();
        reporter.report(event(1, 1, 50, true)).unwrap();
        drop(reporter);
        drop(other);

        let stats = block_on(aggregator.run());
        assert_eq!(
            stats,
            GlobalLossStats {
                events: 3,
                packets_lost: 4,
                bytes_lost: 450,
                slowstart_packets_lost: 3,
                slowstart_bytes_lost: 350,
                connections: 2,
            }
        );
    }

    #[test]
    fn drain_pending() {
        let (reporter, mut aggregator) = channel();
        assert_eq!(aggregator.drain_pending(), GlobalLossStats::default());

        reporter.report(event(7, 1, 10, false)).unwrap();
        let stats = aggregator.drain_pending();
        assert_eq!(stats.events, 1);
        assert_eq!(stats.connections, 1);
        assert_eq!(aggregator.stats(), stats);
    }

    #[test]
    fn report_after_shutdown() {
        let (reporter, aggregator) = channel();
        drop(aggregator);
        assert_eq!(reporter.report(event(1, 1, 1, false)), Err(AggregatorClosed));
    }
}
