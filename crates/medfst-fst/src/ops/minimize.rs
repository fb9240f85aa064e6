// Weight pushing and minimization by partition refinement.

use std::collections::VecDeque;

use hashbrown::HashMap;

use super::{connect, determinize, shortest_distance_reverse};
use crate::fst::VectorFst;
use crate::transition::Transition;
use crate::{FstError, Label, StateId, TropicalWeight};

/// Push weights towards the start state.
///
/// Each transition `q -> t` of weight `w` is reweighted to
/// `w + d(t) - d(q)` and each final weight `f` to `f - d(q)`, where `d` is
/// the reverse shortest distance. The total weight `d(start)` is then put
/// back on the start state, so every path keeps its weight. If the start
/// state has incoming transitions a fresh start state is added for this.
///
/// The result is connected.
pub fn push_weights(fst: &VectorFst) -> VectorFst {
    let mut out = connect(fst);
    let Some(start) = out.start() else {
        return out;
    };
    let potential = shortest_distance_reverse(&out);

    for q in out.states() {
        let dq = potential[q as usize];
        for t in out.transitions_mut(q) {
            t.weight = reweight(t.weight.times(potential[t.target_state as usize]), dq);
        }
        let final_weight = out.final_weight_mut(q);
        *final_weight = reweight(*final_weight, dq);
    }

    let total = potential[start as usize];
    if total == TropicalWeight::ONE {
        return out;
    }

    let has_incoming = out
        .states()
        .any(|q| out.transitions(q).iter().any(|t| t.target_state == start));
    let head = if has_incoming {
        let head = out.add_state();
        let copied: Vec<Transition> = out.transitions(start).to_vec();
        *out.transitions_mut(head) = copied;
        let start_final = out.final_weight(start);
        *out.final_weight_mut(head) = start_final;
        out.set_start_unchecked(head);
        head
    } else {
        start
    };

    for t in out.transitions_mut(head) {
        t.weight = total.times(t.weight);
    }
    let final_weight = out.final_weight_mut(head);
    *final_weight = total.times(*final_weight);
    out
}

/// `weight - potential`, clamped at one against rounding below zero.
fn reweight(weight: TropicalWeight, potential: TropicalWeight) -> TropicalWeight {
    if weight.is_zero() {
        return TropicalWeight::ZERO;
    }
    let divided = weight.divide(potential);
    if divided.value() < 0.0 {
        TropicalWeight::ONE
    } else {
        divided
    }
}

/// Outgoing behaviour of a state relative to a partition.
type Signature = (u32, Vec<(Label, Label, i64, u32)>);

fn signature(fst: &VectorFst, q: StateId, class: &[u32]) -> Signature {
    let mut moves: Vec<(Label, Label, i64, u32)> = fst
        .transitions(q)
        .iter()
        .map(|t| {
            (
                t.sym_in,
                t.sym_out,
                t.weight.quantize(),
                class[t.target_state as usize],
            )
        })
        .collect();
    moves.sort_unstable();
    moves.dedup();
    (class[q as usize], moves)
}

/// Minimize `fst`, treating each `(input, output)` label pair as a single
/// symbol.
///
/// The transducer is connected and weight-pushed, then states with the same
/// final weight and the same transitions into the same classes are merged
/// until the partition is stable. Weights are compared after quantization
/// to [`crate::weight::DELTA`]. States of the result are numbered in
/// breadth-first order from the start state, so equivalent inputs give
/// identical outputs.
pub fn minimize(fst: &VectorFst) -> Result<VectorFst, FstError> {
    let pushed = push_weights(fst);
    let mut out = VectorFst::new();
    out.set_symbols(pushed.symbols().cloned());
    let Some(start) = pushed.start() else {
        return Ok(out);
    };

    // Initial partition by final weight
    let mut class = Vec::with_capacity(pushed.num_states());
    let mut by_final: HashMap<i64, u32> = HashMap::new();
    for q in pushed.states() {
        let next = by_final.len() as u32;
        class.push(*by_final.entry(pushed.final_weight(q).quantize()).or_insert(next));
    }
    let mut num_classes = by_final.len();

    loop {
        let mut ids: HashMap<Signature, u32> = HashMap::new();
        let refined: Vec<u32> = pushed
            .states()
            .map(|q| {
                let next = ids.len() as u32;
                *ids.entry(signature(&pushed, q, &class)).or_insert(next)
            })
            .collect();
        class = refined;
        if ids.len() == num_classes {
            break;
        }
        num_classes = ids.len();
    }

    // One representative per class
    let mut representative: Vec<Option<StateId>> = vec![None; num_classes];
    for q in pushed.states() {
        representative[class[q as usize] as usize].get_or_insert(q);
    }

    // Number classes breadth-first from the start class
    let mut number: Vec<Option<StateId>> = vec![None; num_classes];
    let mut queue = VecDeque::new();
    let start_class = class[start as usize];
    number[start_class as usize] = Some(out.add_state());
    out.set_start_unchecked(0);
    queue.push_back(start_class);

    while let Some(c) = queue.pop_front() {
        let Some(rep) = representative[c as usize] else {
            continue;
        };
        let Some(id) = number[c as usize] else {
            continue;
        };
        *out.final_weight_mut(id) = pushed.final_weight(rep);

        let mut moves: Vec<(Label, Label, i64, u32, TropicalWeight)> = pushed
            .transitions(rep)
            .iter()
            .map(|t| {
                (
                    t.sym_in,
                    t.sym_out,
                    t.weight.quantize(),
                    class[t.target_state as usize],
                    t.weight,
                )
            })
            .collect();
        moves.sort_by(|a, b| (a.0, a.1, a.2, a.3).cmp(&(b.0, b.1, b.2, b.3)));
        moves.dedup_by(|a, b| (a.0, a.1, a.2, a.3) == (b.0, b.1, b.2, b.3));

        for (sym_in, sym_out, _, target_class, weight) in moves {
            let target = match number[target_class as usize] {
                Some(existing) => existing,
                None => {
                    let new_id = out.add_state();
                    number[target_class as usize] = Some(new_id);
                    queue.push_back(target_class);
                    new_id
                }
            };
            out.transitions_mut(id)
                .push(Transition::new(sym_in, sym_out, weight, target));
        }
    }

    tracing::trace!(
        from_states = fst.num_states(),
        to_states = out.num_states(),
        "minimized"
    );
    Ok(out)
}

/// Determinize then minimize over label pairs. The standard canonical form
/// for the transducers built by this workspace.
pub fn encode_determinize_minimize(fst: &VectorFst) -> Result<VectorFst, FstError> {
    minimize(&determinize(fst)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::{score, total_weight};

    fn pair_weight(fst: &VectorFst, input: &[Label], output: &[Label]) -> TropicalWeight {
        score(
            fst,
            &VectorFst::linear_acceptor(input, None),
            &VectorFst::linear_acceptor(output, None),
        )
        .unwrap()
    }

    /// Two parallel branches with identical suffixes.
    fn redundant() -> VectorFst {
        let mut fst = VectorFst::new();
        fst.add_states(5);
        fst.set_start(0).unwrap();
        fst.set_final(4, 0.0).unwrap();
        fst.add_transition(0, Transition::new(1, 1, 1.0, 1)).unwrap();
        fst.add_transition(0, Transition::new(2, 2, 1.0, 2)).unwrap();
        fst.add_transition(1, Transition::new(3, 3, 2.0, 3)).unwrap();
        fst.add_transition(2, Transition::new(3, 3, 2.0, 3)).unwrap();
        fst.add_transition(3, Transition::new(4, 4, 0.0, 4)).unwrap();
        fst
    }

    #[test]
    fn push_keeps_path_weights() {
        let fst = redundant();
        let pushed = push_weights(&fst);
        assert_eq!(total_weight(&pushed), total_weight(&fst));
        assert_eq!(pair_weight(&pushed, &[1, 3, 4], &[1, 3, 4]), TropicalWeight::new(3.0));
    }

    #[test]
    fn push_moves_weight_to_start() {
        let pushed = push_weights(&redundant());
        let start = pushed.start().unwrap();
        for q in pushed.states().filter(|&q| q != start) {
            for t in pushed.transitions(q) {
                assert_eq!(t.weight, TropicalWeight::ONE);
            }
        }
    }

    #[test]
    fn push_with_start_loop_adds_fresh_start() {
        let mut fst = VectorFst::new();
        fst.add_states(1);
        fst.set_start(0).unwrap();
        fst.set_final(0, 2.0).unwrap();
        fst.add_transition(0, Transition::new(1, 1, 1.0, 0)).unwrap();
        let pushed = push_weights(&fst);
        assert_eq!(pushed.num_states(), 2);
        assert_eq!(pair_weight(&pushed, &[], &[]), TropicalWeight::new(2.0));
        assert_eq!(pair_weight(&pushed, &[1, 1], &[1, 1]), TropicalWeight::new(4.0));
    }

    #[test]
    fn merges_equivalent_states() {
        let min = minimize(&redundant()).unwrap();
        assert_eq!(min.num_states(), 4);
        assert_eq!(pair_weight(&min, &[2, 3, 4], &[2, 3, 4]), TropicalWeight::new(3.0));
        assert!(pair_weight(&min, &[1, 4], &[1, 4]).is_zero());
    }

    #[test]
    fn merges_parallel_self_loops() {
        let mut fst = VectorFst::new();
        fst.add_states(2);
        fst.set_start(0).unwrap();
        fst.set_final(0, 0.0).unwrap();
        fst.set_final(1, 0.0).unwrap();
        fst.add_transition(0, Transition::new(1, 1, 0.0, 1)).unwrap();
        fst.add_transition(1, Transition::new(1, 1, 0.0, 1)).unwrap();
        fst.add_transition(0, Transition::new(1, 1, 0.0, 0)).unwrap();
        let min = minimize(&fst).unwrap();
        assert_eq!(min.num_states(), 1);
        assert_eq!(min.num_transitions(), 1);
    }

    #[test]
    fn encode_determinize_minimize_is_idempotent() {
        let once = encode_determinize_minimize(&redundant()).unwrap();
        let twice = encode_determinize_minimize(&once).unwrap();
        assert_eq!(once.num_states(), twice.num_states());
        assert_eq!(once.num_transitions(), twice.num_transitions());
    }

    #[test]
    fn empty_language_minimizes_to_empty() {
        let mut fst = VectorFst::new();
        fst.add_states(2);
        fst.set_start(0).unwrap();
        fst.add_transition(0, Transition::new(1, 1, 0.0, 1)).unwrap();
        assert_eq!(minimize(&fst).unwrap().num_states(), 0);
    }
}
