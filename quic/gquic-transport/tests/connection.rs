// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use futures::executor::block_on;
use gquic_core::{
    crypto::{CryptoError, NullAead, PacketProtection},
    endpoint,
    frame::{AckFrame, AckRange, Frame, StreamFrame},
    packet::number::PacketNumber,
    recovery::{testing::MockCongestionController, Phase},
    time::{Duration, Timestamp},
    Version,
};
use gquic_crypto::AesGcm128;
use gquic_transport::{
    aggregate::{self, GlobalLossStats},
    connection::Id,
    Config, Connection,
};
use std::thread;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn start() -> Timestamp {
    Timestamp::from_duration(Duration::from_secs(100))
}

fn stream(stream_id: u32, offset: u64) -> Frame {
    StreamFrame {
        stream_id,
        fin: false,
        offset,
        data: vec![0u8; 64].into(),
    }
    .into()
}

#[test]
fn handshake_switches_protection() {
    init_tracing();

    let mut client = Connection::new(
        Id::new(1),
        Config::new(endpoint::Type::Client),
        MockCongestionController::default(),
    );
    let mut server = Connection::new(
        Id::new(1),
        Config::new(endpoint::Type::Server),
        MockCongestionController::default(),
    );

    let header = [0x0c, 0x01];
    let pn = PacketNumber::new(1);

    let mut packet = client.protect(pn, &header, b"CHLO").unwrap();
    assert_eq!(server.unprotect(pn, &header, &mut packet).unwrap(), b"CHLO");

    let client_key = ([0x01; 16], [0x02; 12]);
    let server_key = ([0x03; 16], [0x04; 12]);
    let keys = |local: ([u8; 16], [u8; 12]), remote: ([u8; 16], [u8; 12])| {
        (
            AesGcm128::new(&local.0, local.1).unwrap(),
            AesGcm128::new(&remote.0, remote.1).unwrap(),
        )
    };

    let (sealer, opener) = keys(client_key, server_key);
    client.on_handshake_keys(sealer, opener);
    let (sealer, opener) = keys(server_key, client_key);
    server.on_handshake_keys(sealer, opener);
    assert!(client.is_forward_secure() && server.is_forward_secure());

    let pn = PacketNumber::new(2);
    let mut packet = client.protect(pn, &header, b"GET /").unwrap();
    assert_eq!(server.unprotect(pn, &header, &mut packet).unwrap(), b"GET /");

    let mut packet = server.protect(pn, &header, b"200").unwrap();
    assert_eq!(client.unprotect(pn, &header, &mut packet).unwrap(), b"200");

    // the peer can no longer downgrade to the null cipher
    let null = NullAead::new(endpoint::Type::Client, Version::Q037);
    let mut packet = null.protect(pn, &header, b"downgrade").unwrap();
    assert_eq!(
        server.unprotect(pn, &header, &mut packet),
        Err(CryptoError::Authentication)
    );
}

#[test]
fn connections_report_losses_to_the_aggregator() {
    init_tracing();

    let (reporter, aggregator) = aggregate::channel();

    let workers: Vec<_> = (0..4u64)
        .map(|id| {
            let reporter = reporter.clone();
            thread::spawn(move || {
                let config = Config::new(endpoint::Type::Server)
                    .with_packet_threshold(1)
                    .unwrap();
                let mut connection = Connection::new(
                    Id::new(id),
                    config,
                    MockCongestionController::new(Phase::SlowStart),
                )
                .with_loss_reporter(reporter);

                for packet_number in 1..=10 {
                    connection
                        .on_packet_sent(
                            PacketNumber::new(packet_number),
                            start() + Duration::from_millis(packet_number),
                            100,
                            vec![stream(4, packet_number * 64)],
                        )
                        .unwrap();
                }

                let ack = AckFrame::from_ranges(vec![AckRange::new(8, 10), AckRange::new(1, 5)]);
                let outcome = connection
                    .on_frame_received(&ack.into(), start() + Duration::from_millis(40))
                    .map(|_| connection.recovery().len());
                assert_eq!(outcome, Ok(2));

                connection
                    .on_packet_sent(PacketNumber::new(11), start(), 100, vec![])
                    .unwrap();
                connection
                    .on_frame_received(
                        &AckFrame::contiguous(11, 11).into(),
                        start() + Duration::from_millis(50),
                    )
                    .unwrap();

                let retransmissions: Vec<Frame> = connection.take_retransmissions().collect();
                assert_eq!(retransmissions, [stream(4, 6 * 64), stream(4, 7 * 64)]);

                connection.stats_snapshot()
            })
        })
        .collect();
    drop(reporter);

    for worker in workers {
        let stats = worker.join().unwrap();
        assert_eq!(stats.slowstart_packets_lost, 2);
        assert_eq!(stats.slowstart_bytes_lost, 200);
    }

    let stats = block_on(aggregator.run());
    assert_eq!(
        stats,
        GlobalLossStats {
            events: 4,
            packets_lost: 8,
            bytes_lost: 800,
            slowstart_packets_lost: 8,
            slowstart_bytes_lost: 800,
            connections: 4,
        }
    );
}
