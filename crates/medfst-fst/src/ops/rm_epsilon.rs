// Epsilon removal.

use std::collections::BTreeMap;

use super::connect;
use super::shortest_distance::dijkstra;
use crate::fst::VectorFst;
use crate::transition::Transition;
use crate::{Label, StateId, TropicalWeight};

/// Remove every transition labelled epsilon on both sides.
///
/// Each state inherits the non-epsilon transitions and final weights of its
/// epsilon closure, weighted by the closure distance. Transitions that end up
/// with the same labels and target are merged at their minimum weight. The
/// result is connected. Weights must be non-negative.
pub fn rm_epsilon(fst: &VectorFst) -> VectorFst {
    if !fst.has_epsilons() {
        return connect(fst);
    }

    let n = fst.num_states();
    let epsilon_adjacency: Vec<Vec<(StateId, TropicalWeight)>> = fst
        .states()
        .map(|q| {
            fst.transitions(q)
                .iter()
                .filter(|t| t.is_epsilon())
                .map(|t| (t.target_state, t.weight))
                .collect()
        })
        .collect();

    let mut out = VectorFst::new();
    out.set_symbols(fst.symbols().cloned());
    out.add_states(n);
    if let Some(start) = fst.start() {
        out.set_start_unchecked(start);
    }

    for q in fst.states() {
        let closure: Vec<(StateId, TropicalWeight)> = if epsilon_adjacency[q as usize].is_empty() {
            vec![(q, TropicalWeight::ONE)]
        } else {
            let mut init = vec![TropicalWeight::ZERO; n];
            init[q as usize] = TropicalWeight::ONE;
            dijkstra(&epsilon_adjacency, init)
                .into_iter()
                .enumerate()
                .filter(|(_, d)| !d.is_zero())
                .map(|(p, d)| (p as StateId, d))
                .collect()
        };

        let mut final_weight = TropicalWeight::ZERO;
        let mut merged: BTreeMap<(Label, Label, StateId), TropicalWeight> = BTreeMap::new();
        for &(p, d) in &closure {
            final_weight = final_weight.plus(d.times(fst.final_weight(p)));
            for t in fst.transitions(p).iter().filter(|t| !t.is_epsilon()) {
                let weight = d.times(t.weight);
                merged
                    .entry((t.sym_in, t.sym_out, t.target_state))
                    .and_modify(|w| *w = w.plus(weight))
                    .or_insert(weight);
            }
        }

        *out.final_weight_mut(q) = final_weight;
        out.transitions_mut(q).extend(
            merged
                .into_iter()
                .map(|((sym_in, sym_out, target), weight)| {
                    Transition::new(sym_in, sym_out, weight, target)
                }),
        );
    }

    connect(&out)
}
