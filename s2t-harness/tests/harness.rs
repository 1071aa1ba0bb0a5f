//! End-to-end harness runs over synthetic streams

use proptest::prelude::*;

use s2t_harness::{run_protocol_harness, Harness, HarnessConfig, ProtocolTestStats};
use s2t_protocol::contract::{MSG_B2S_HEARTBEAT, MSG_B2S_MOTION_SETPOINT, MSG_S2B_STATE_REPORT};
use s2t_protocol::{
    encode_packet_to_vec, Header, ProtocolConfig, ProtocolVersion, VersionPolicy, HEADER_SIZE,
};

fn packet(msg_type: u8, seq: u16, payload: &[u8]) -> Vec<u8> {
    let header = Header::new(msg_type, 0x00, 0x01, seq, 0);
    encode_packet_to_vec(&header, payload).unwrap().to_vec()
}

/// Valid, corrupted and garbage traffic mixed together
fn mixed_stream() -> Vec<u8> {
    let mut stream = vec![0xFF, 0x00, 0x32];
    stream.extend(packet(MSG_B2S_HEARTBEAT, 1, &[]));
    stream.extend([0x12, 0x34]);
    stream.extend(packet(MSG_B2S_MOTION_SETPOINT, 2, &[0x10, 0x20, 0x30, 0x40]));

    // Payload corrupted in transit: header still valid, so it is extracted
    let mut corrupted = packet(MSG_S2B_STATE_REPORT, 3, &[0x01, 0x02]);
    corrupted[HEADER_SIZE] ^= 0x40;
    stream.extend(corrupted);

    stream.extend(packet(MSG_B2S_HEARTBEAT, 4, &[]));
    stream
}

#[test]
fn test_reference_heartbeat_counted_once() {
    let stream = packet(MSG_B2S_HEARTBEAT, 1, &[]);
    let stats = run_protocol_harness(&stream, &HarnessConfig::default());

    assert_eq!(
        stats,
        ProtocolTestStats {
            frames_extracted: 1,
            packets_valid: 1,
            ..Default::default()
        }
    );
}

#[test]
fn test_mixed_stream_outcomes() {
    let stats = run_protocol_harness(&mixed_stream(), &HarnessConfig::default());

    assert_eq!(stats.frames_extracted, 4);
    assert_eq!(stats.packets_valid, 3);
    assert_eq!(stats.packets_invalid, 1);
    assert_eq!(stats.rejections.payload_crc_mismatch, 1);
    // 0xFF 0x00 0x32 up front, 0x12 0x34 between packets
    assert_eq!(stats.sync_losses, 5);
}

#[test]
fn test_chunk_size_does_not_change_outcome() {
    let stream = mixed_stream();
    let whole = run_protocol_harness(&stream, &HarnessConfig::default());

    for chunk_size in [1, 2, 3, 7, 18, 64] {
        let config = HarnessConfig {
            chunk_size,
            ..Default::default()
        };
        assert_eq!(run_protocol_harness(&stream, &config), whole, "chunk {}", chunk_size);
    }
}

#[test]
fn test_incremental_feed() {
    let stream = mixed_stream();
    let mut harness = Harness::new(HarnessConfig::default());

    let (first, second) = stream.split_at(25);
    let mut extracted = harness.feed(first);
    assert!(harness.pending_bytes() > 0);
    extracted += harness.feed(second);

    assert_eq!(extracted, 4);
    assert_eq!(harness.pending_bytes(), 0);
    assert_eq!(
        harness.stats(),
        run_protocol_harness(&stream, &HarnessConfig::default())
    );
}

#[test]
fn test_version_policy_from_config() {
    let mut header = Header::new(MSG_B2S_HEARTBEAT, 0, 1, 1, 0);
    header.proto_minor = 1;
    let old_edition = encode_packet_to_vec(&header, &[]).unwrap().to_vec();

    let strict = run_protocol_harness(&old_edition, &HarnessConfig::default());
    assert_eq!(strict.frames_extracted, 0);
    assert!(strict.sync_losses > 0);

    let text = r#"
        [protocol]
        policy = "minor_at_most"
    "#;
    let lenient_config = HarnessConfig::from_toml_str(text).unwrap();
    assert_eq!(
        lenient_config.protocol,
        ProtocolConfig::new(ProtocolVersion::CURRENT, VersionPolicy::MinorAtMost)
    );

    let lenient = run_protocol_harness(&old_edition, &lenient_config);
    assert_eq!(lenient.frames_extracted, 1);
    assert_eq!(lenient.packets_valid, 1);
}

#[test]
fn test_empty_input() {
    let stats = run_protocol_harness(&[], &HarnessConfig::default());
    assert_eq!(stats, ProtocolTestStats::default());
}

proptest! {
    #[test]
    fn chunking_never_changes_stats(
        noise in prop::collection::vec(any::<u8>(), 0..200),
        positions in prop::collection::vec(any::<prop::sample::Index>(), 0..4),
        chunk_size in 1usize..40,
    ) {
        // Splice valid packets into random noise
        let mut stream = noise.clone();
        for (i, position) in positions.iter().enumerate() {
            let at = position.index(stream.len() + 1);
            let pkt = packet(MSG_S2B_STATE_REPORT, i as u16, &[i as u8; 6]);
            stream.splice(at..at, pkt);
        }

        let whole = run_protocol_harness(&stream, &HarnessConfig::default());
        let chunked = run_protocol_harness(&stream, &HarnessConfig {
            chunk_size,
            ..Default::default()
        });

        prop_assert_eq!(whole, chunked);
        prop_assert_eq!(whole.frames_extracted, whole.packets_valid + whole.packets_invalid);
        prop_assert_eq!(whole.rejections.total(), whole.packets_invalid);
    }
}
