//! End-to-end scenarios: assembled models priced on concrete profile pairs.
//!
//! Run: cargo test -p medfst-model --test model_scenarios

use medfst_core::{Combination, ModelConfig};
use medfst_fst::VectorFst;
use medfst_model::distance::score_profiles;
use medfst_model::{
    Alphabet, ModelParts, build_model, build_model_parts, detect_wgd, med_distance,
    pairwise_distances,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn config(combination: Combination, enable_wgd: bool) -> ModelConfig {
    ModelConfig {
        max_cn: 4,
        separator: Some('X'),
        enable_wgd,
        wgd_x2: true,
        combination,
        max_pre_wgd_losses: 4,
        ..ModelConfig::default()
    }
}

/// Route model-building logs to the test harness; `RUST_LOG=debug` shows them.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn build(combination: Combination, enable_wgd: bool) -> (ModelParts, Alphabet) {
    init_tracing();
    let config = config(combination, enable_wgd);
    let parts = build_model_parts(&config).unwrap();
    let alphabet = Alphabet::new(config.max_cn, config.separator).unwrap();
    (parts, alphabet)
}

fn distance(model: &VectorFst, alphabet: &Alphabet, a: &str, b: &str) -> f32 {
    score_profiles(model, alphabet, a, b).unwrap().value()
}

// ---------------------------------------------------------------------------
// Elementary pricing through the assembled parts
// ---------------------------------------------------------------------------

#[test]
fn parts_price_single_events() {
    let (parts, alphabet) = build(Combination::Exact, true);
    assert_eq!(distance(&parts.loss, &alphabet, "2", "1"), 1.0);
    assert_eq!(distance(&parts.gain, &alphabet, "1", "2"), 1.0);
    assert_eq!(distance(&parts.loh, &alphabet, "321", "000"), 3.0);
    let wgd = parts.wgd.as_ref().unwrap();
    assert_eq!(distance(wgd, &alphabet, "111", "222"), 1.0);
    assert_eq!(distance(wgd, &alphabet, "111111", "222222"), 1.0);
}

#[test]
fn gain_mirrors_loss() {
    let (parts, alphabet) = build(Combination::Exact, false);
    for (a, b) in [("3", "2"), ("33", "11"), ("4321", "3221"), ("2X2", "1X1")] {
        assert_eq!(
            distance(&parts.gain, &alphabet, b, a),
            distance(&parts.loss, &alphabet, a, b),
            "{a} -> {b}"
        );
    }
}

// ---------------------------------------------------------------------------
// Full models
// ---------------------------------------------------------------------------

#[test]
fn identical_profiles_have_zero_distance() {
    for combination in [Combination::Exact, Combination::ExactWgd, Combination::Legacy] {
        for enable_wgd in [true, false] {
            let (parts, alphabet) = build(combination, enable_wgd);
            for profile in ["0", "1234", "01X43X2", "1-1X-"] {
                assert_eq!(
                    distance(&parts.model, &alphabet, profile, profile),
                    0.0,
                    "{combination} wgd={enable_wgd} {profile}"
                );
            }
        }
    }
}

#[test]
fn default_config_under_every_combination() {
    init_tracing();
    let alphabet = Alphabet::new(8, Some('X')).unwrap();
    for combination in [Combination::Exact, Combination::ExactWgd, Combination::Legacy] {
        let config = ModelConfig {
            combination,
            ..ModelConfig::default()
        };
        let model = build_model(&config).unwrap();
        for profile in ["2", "12345678X87654321", "0-1X2"] {
            assert_eq!(distance(&model, &alphabet, profile, profile), 0.0, "{combination}");
        }
        // one additive doubling across both chromosomes
        assert_eq!(distance(&model, &alphabet, "12X12", "23X23"), 1.0, "{combination}");
        assert_eq!(distance(&model, &alphabet, "1-1", "2-2"), 1.0, "{combination}");
    }
}

#[test]
fn doubling_detected_against_diploid() {
    let config = config(Combination::Exact, true);
    let alphabet = Alphabet::new(config.max_cn, config.separator).unwrap();
    assert!(detect_wgd(&config, &alphabet, "2222X2222").unwrap());
    assert!(!detect_wgd(&config, &alphabet, "1121X1111").unwrap());
}

#[test]
fn exact_beats_legacy_on_losses_reaching_zero() {
    for enable_wgd in [true, false] {
        let (exact, alphabet) = build(Combination::Exact, enable_wgd);
        let (legacy, _) = build(Combination::Legacy, enable_wgd);
        let exact_d = distance(&exact.model, &alphabet, "212", "101");
        let legacy_d = distance(&legacy.model, &alphabet, "212", "101");
        assert_eq!(exact_d, 1.0);
        assert_eq!(legacy_d, 2.0);
    }
}

#[test]
fn doubling_then_loss() {
    let (parts, alphabet) = build(Combination::Exact, true);
    assert_eq!(distance(&parts.model, &alphabet, "1212", "2424"), 1.0);
    assert_eq!(distance(&parts.model, &alphabet, "1212", "2414"), 2.0);
}

#[test]
fn disabling_wgd_raises_distance_of_doubled_profile() {
    let (with_wgd, alphabet) = build(Combination::Exact, true);
    let (without_wgd, _) = build(Combination::Exact, false);
    assert_eq!(distance(&with_wgd.model, &alphabet, "1212", "2424"), 1.0);
    assert_eq!(distance(&without_wgd.model, &alphabet, "1212", "2424"), 3.0);
}

#[test]
fn separators_end_runs() {
    let (parts, alphabet) = build(Combination::Exact, false);
    assert_eq!(distance(&parts.model, &alphabet, "22", "11"), 1.0);
    assert_eq!(distance(&parts.model, &alphabet, "2X2", "1X1"), 2.0);
}

#[test]
fn gains_cannot_start_from_zero() {
    let (parts, alphabet) = build(Combination::Exact, false);
    assert!(distance(&parts.model, &alphabet, "0", "1").is_infinite());
}

#[test]
fn config_loaded_from_json() {
    init_tracing();
    let json = r#"{
        "max_cn": 4,
        "separator": "X",
        "wgd_x2": true,
        "combination": "legacy",
        "max_pre_wgd_losses": 4
    }"#;
    let config: ModelConfig = serde_json::from_str(json).unwrap();
    assert_eq!(config, self::config(Combination::Legacy, true));
    let parts = build_model_parts(&config).unwrap();
    let alphabet = Alphabet::new(config.max_cn, config.separator).unwrap();
    assert_eq!(distance(&parts.model, &alphabet, "212", "101"), 2.0);
}

#[test]
fn binary_round_trip_preserves_distances() {
    let (parts, alphabet) = build(Combination::Exact, true);
    let loaded = VectorFst::from_bytes(&parts.model.to_bytes().unwrap()).unwrap();
    assert_eq!(loaded.num_states(), parts.model.num_states());
    for (a, b) in [("1212", "2414"), ("212", "101"), ("33X1", "11X2")] {
        assert_eq!(
            distance(&loaded, &alphabet, a, b),
            distance(&parts.model, &alphabet, a, b)
        );
    }
}

#[test]
fn pairwise_matrix_over_exact_model() {
    let (parts, alphabet) = build(Combination::Exact, true);
    let profiles = [("normal", "2222X22"), ("t1", "2112X22"), ("t2", "4224X44")];
    let matrix = pairwise_distances(&parts.model, &alphabet, &profiles).unwrap();
    assert_eq!(matrix.labels(), ["normal", "t1", "t2"]);
    assert_eq!(matrix.get_by_label("normal", "t1"), Some(1.0));
    assert_eq!(matrix.get_by_label("t1", "normal"), Some(1.0));
    assert_eq!(
        matrix.get_by_label("normal", "t1"),
        Some(med_distance(&parts.model, &alphabet, "2222X22", "2112X22").unwrap())
    );
}
