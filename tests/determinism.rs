//! Fingerprint determinism and self-distance properties.

mod common;

use std::sync::Arc;

use histmatch::{
    EngineConfig, FingerprintConfig, MatchEngine, MemoryStore, QueryOutcome, RasterDecoder,
    RegisterOutcome, channel_distances, fingerprint_image, to_hsv,
};
use histmatch::decode::ImageDecoder;

use common::{solid_png, two_tone_png};

fn fingerprint_of(bytes: &[u8]) -> histmatch::Fingerprint {
    let grid = RasterDecoder.decode(bytes).expect("decode");
    let hsv = to_hsv(&grid).expect("convert");
    fingerprint_image(&hsv, &FingerprintConfig::default())
}

#[test]
fn same_bytes_produce_bit_identical_fingerprints() {
    let bytes = two_tone_png(32, 32, 12, [200, 30, 30], [20, 60, 220]);
    assert_eq!(fingerprint_of(&bytes), fingerprint_of(&bytes));
}

#[test]
fn self_distance_is_zero_on_all_channels() {
    let bytes = two_tone_png(16, 16, 8, [0, 128, 255], [255, 128, 0]);
    let fp = fingerprint_of(&bytes);
    let d = channel_distances(&fp, &fp.clone()).expect("compare");
    for channel in d {
        assert!(channel.abs() < 1e-12, "self distance {channel} != 0");
    }
}

#[test]
fn query_right_after_register_matches_with_near_zero_score() {
    let engine = MatchEngine::open(EngineConfig::default(), Arc::new(MemoryStore::new()))
        .expect("engine");
    let bytes = solid_png(24, 24, [90, 180, 40]);

    let registered = engine.register(&bytes).expect("register");
    assert!(matches!(registered, RegisterOutcome::Registered { id: 1 }));

    match engine.query(&bytes).expect("query") {
        QueryOutcome::Match { id, score } => {
            assert_eq!(id, 1);
            assert!(score.abs() < 1e-9, "expected score ~0, got {score}");
        }
        QueryOutcome::NoMatch => panic!("identical bytes must match"),
    }
}

#[test]
fn clearly_different_images_do_not_match() {
    let engine = MatchEngine::open(EngineConfig::default(), Arc::new(MemoryStore::new()))
        .expect("engine");
    engine
        .register(&solid_png(24, 24, [255, 0, 0]))
        .expect("register");

    let outcome = engine.query(&solid_png(24, 24, [0, 0, 255])).expect("query");
    assert_eq!(outcome, QueryOutcome::NoMatch);
}
