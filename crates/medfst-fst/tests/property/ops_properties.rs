use medfst_fst::ops::{
    arc_sort, compose, connect, determinize, encode_determinize_minimize, invert, minimize,
    rm_epsilon, score, union,
};
use medfst_fst::{Label, SortKey, Transition, TropicalWeight, VectorFst};
use proptest::prelude::*;

/// Acyclic transducer over labels `1..=3` with integral weights: every
/// transition moves to a higher state, so determinization always terminates.
fn acyclic_fst() -> impl Strategy<Value = VectorFst> {
    (2usize..6).prop_flat_map(|n| {
        let arcs = prop::collection::vec((0..n, 1u32..4, 1u32..4, 0u8..4, 1..n), 1..12);
        let finals = prop::collection::vec(prop::option::of(0u8..3), n);
        (Just(n), arcs, finals).prop_map(|(n, arcs, finals)| {
            let mut fst = VectorFst::new();
            fst.add_states(n);
            fst.set_start(0).unwrap();
            for (q, f) in finals.into_iter().enumerate() {
                if let Some(w) = f {
                    fst.set_final(q as u32, f32::from(w)).unwrap();
                }
            }
            for (from, i, o, w, to) in arcs {
                if to > from {
                    fst.add_transition(from as u32, Transition::new(i, o, f32::from(w), to as u32))
                        .unwrap();
                }
            }
            fst
        })
    })
}

fn word() -> impl Strategy<Value = Vec<Label>> {
    prop::collection::vec(1u32..4, 0..4)
}

fn weight(fst: &VectorFst, input: &[Label], output: &[Label]) -> TropicalWeight {
    score(
        fst,
        &VectorFst::linear_acceptor(input, None),
        &VectorFst::linear_acceptor(output, None),
    )
    .unwrap()
}

proptest! {
    #[test]
    fn determinize_preserves_weights(fst in acyclic_fst(), x in word(), y in word()) {
        let det = determinize(&fst).unwrap();
        prop_assert_eq!(weight(&det, &x, &y), weight(&fst, &x, &y));
    }

    #[test]
    fn minimize_preserves_weights(fst in acyclic_fst(), x in word(), y in word()) {
        let min = minimize(&fst).unwrap();
        prop_assert!(weight(&min, &x, &y).approx_eq(weight(&fst, &x, &y), 1e-3));
    }

    #[test]
    fn canonicalization_is_idempotent(fst in acyclic_fst()) {
        let once = encode_determinize_minimize(&fst).unwrap();
        let twice = encode_determinize_minimize(&once).unwrap();
        prop_assert_eq!(once.num_states(), twice.num_states());
        prop_assert_eq!(once.num_transitions(), twice.num_transitions());
    }

    #[test]
    fn invert_swaps_pairs(fst in acyclic_fst(), x in word(), y in word()) {
        prop_assert_eq!(weight(&invert(&fst), &y, &x), weight(&fst, &x, &y));
    }

    #[test]
    fn union_takes_minimum(a in acyclic_fst(), b in acyclic_fst(), x in word(), y in word()) {
        let u = rm_epsilon(&union(&a, &b).unwrap());
        prop_assert!(!u.has_epsilons());
        let expected = weight(&a, &x, &y).plus(weight(&b, &x, &y));
        prop_assert_eq!(weight(&u, &x, &y), expected);
    }

    #[test]
    fn connect_is_idempotent(fst in acyclic_fst()) {
        let once = connect(&fst);
        let twice = connect(&once);
        prop_assert_eq!(once.num_states(), twice.num_states());
        prop_assert_eq!(once.num_transitions(), twice.num_transitions());
    }

    #[test]
    fn compose_with_identity_is_neutral(fst in acyclic_fst(), x in word(), y in word()) {
        let mut identity = VectorFst::new();
        let s = identity.add_state();
        identity.set_start(s).unwrap();
        identity.set_final(s, 0.0).unwrap();
        for label in 1..4 {
            identity.add_transition(s, Transition::new(label, label, 0.0, s)).unwrap();
        }
        let composed = compose(&arc_sort(&fst, SortKey::Output), &identity).unwrap();
        prop_assert_eq!(weight(&composed, &x, &y), weight(&fst, &x, &y));
    }

    #[test]
    fn binary_round_trip(fst in acyclic_fst(), x in word(), y in word()) {
        let loaded = VectorFst::from_bytes(&fst.to_bytes().unwrap()).unwrap();
        prop_assert_eq!(loaded.num_states(), fst.num_states());
        prop_assert_eq!(weight(&loaded, &x, &y), weight(&fst, &x, &y));
    }
}
