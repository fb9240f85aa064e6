use std::sync::OnceLock;

use medfst_core::{Combination, LossWeights, ModelConfig};
use medfst_fst::VectorFst;
use medfst_fst::ops::invert;
use medfst_model::distance::score_profiles;
use medfst_model::elementary::bounded_loss;
use medfst_model::{Alphabet, SimulationParams, build_model, expand, med_distance, simulate};
use proptest::prelude::*;

const MAX_CN: u8 = 3;
const PRE_WGD_LOSSES: u32 = 4;

fn alphabet() -> &'static Alphabet {
    static ALPHABET: OnceLock<Alphabet> = OnceLock::new();
    ALPHABET.get_or_init(|| Alphabet::new(MAX_CN, Some('X')).unwrap())
}

/// Exact model without doubling: losses (zero allowed) then gains.
fn loss_gain_model() -> &'static VectorFst {
    static MODEL: OnceLock<VectorFst> = OnceLock::new();
    MODEL.get_or_init(|| {
        build_model(&ModelConfig {
            max_cn: MAX_CN,
            enable_wgd: false,
            combination: Combination::Exact,
            max_pre_wgd_losses: PRE_WGD_LOSSES,
            ..ModelConfig::default()
        })
        .unwrap()
    })
}

fn loss() -> &'static VectorFst {
    static LOSS: OnceLock<VectorFst> = OnceLock::new();
    LOSS.get_or_init(|| bounded_loss(alphabet(), true, LossWeights::default()).unwrap())
}

fn profile(len: usize) -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(vec!['0', '1', '2', '3', '-', 'X']), len)
        .prop_map(|chars| chars.into_iter().collect())
}

fn profile_pair() -> impl Strategy<Value = (String, String)> {
    (1usize..6).prop_flat_map(|len| (profile(len), profile(len)))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn identical_profiles_are_free(p in (1usize..8).prop_flat_map(profile)) {
        let d = score_profiles(loss_gain_model(), alphabet(), &p, &p).unwrap();
        prop_assert_eq!(d.value(), 0.0);
    }

    #[test]
    fn inverted_loss_prices_reversed_pairs((a, b) in profile_pair()) {
        let gain = invert(loss());
        prop_assert_eq!(
            score_profiles(&gain, alphabet(), &b, &a).unwrap(),
            score_profiles(loss(), alphabet(), &a, &b).unwrap()
        );
    }

    #[test]
    fn more_steps_never_cost_more((a, b) in profile_pair(), n in 1u32..3) {
        let fewer = expand(n - 1, loss()).unwrap();
        let more = expand(n, loss()).unwrap();
        let before = score_profiles(&fewer, alphabet(), &a, &b).unwrap();
        let after = score_profiles(&more, alphabet(), &a, &b).unwrap();
        prop_assert!(after.value() <= before.value(), "{} > {}", after, before);
    }

    #[test]
    fn shortening_preserves_distance((a, b) in profile_pair()) {
        let full = score_profiles(loss_gain_model(), alphabet(), &a, &b).unwrap();
        let short = med_distance(loss_gain_model(), alphabet(), &a, &b).unwrap();
        prop_assert_eq!(full.value(), short);
    }

    #[test]
    fn simulated_losses_bound_distance(start in profile(8), seed in any::<u64>()) {
        let params = SimulationParams {
            mu: 2.0,
            p_gain: 0.0,
            p_wgd: 0.0,
            min_cn: 0,
            max_cn: MAX_CN,
            seed: Some(seed),
            ..SimulationParams::default()
        };
        let result = simulate(alphabet(), &start, &params).unwrap();
        prop_assume!(result.losses <= PRE_WGD_LOSSES);
        let d = score_profiles(loss_gain_model(), alphabet(), &start, &result.profile).unwrap();
        prop_assert!(
            d.value() <= result.losses as f32,
            "{} -> {}: {} > {}", start, result.profile, d, result.losses
        );
    }
}
