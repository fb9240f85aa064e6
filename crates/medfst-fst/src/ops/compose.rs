// Composition of weighted transducers.

use std::collections::VecDeque;

use hashbrown::HashMap;

use super::{check_symbols, connect};
use crate::fst::{SortKey, VectorFst};
use crate::transition::Transition;
use crate::{EPSILON, FstError, Label, StateId};

/// Transitions of `transitions` reading `label`.
///
/// With `sorted` set the slice is ordered by input label and the search
/// starts at the first candidate; otherwise every transition is scanned.
fn matching(
    transitions: &[Transition],
    label: Label,
    sorted: bool,
) -> impl Iterator<Item = &Transition> {
    let first = if sorted {
        transitions.partition_point(|t| t.sym_in < label)
    } else {
        0
    };
    transitions[first..]
        .iter()
        .take_while(move |t| !sorted || t.sym_in <= label)
        .filter(move |t| t.sym_in == label)
}

/// Pair-state bookkeeping for the product construction.
struct PairStates {
    ids: HashMap<(StateId, StateId), StateId>,
    queue: VecDeque<(StateId, StateId)>,
}

impl PairStates {
    fn get_or_add(&mut self, pair: (StateId, StateId), out: &mut VectorFst) -> StateId {
        if let Some(&id) = self.ids.get(&pair) {
            return id;
        }
        let id = out.add_state();
        self.ids.insert(pair, id);
        self.queue.push_back(pair);
        id
    }
}

/// Compose `a` with `b`: the result maps `x` to `z` with weight
/// `min over y of a(x, y) + b(y, z)`.
///
/// Either `a` must be sorted by output label or `b` by input label
/// (see [`crate::ops::arc_sort`]); otherwise [`FstError::NotSorted`] is
/// returned. An output epsilon of `a` advances `a` alone and an input epsilon
/// of `b` advances `b` alone. The result is connected.
pub fn compose(a: &VectorFst, b: &VectorFst) -> Result<VectorFst, FstError> {
    check_symbols(a, b)?;
    let b_sorted = b.is_sorted(SortKey::Input);
    if !b_sorted && !a.is_sorted(SortKey::Output) {
        return Err(FstError::NotSorted);
    }

    let mut out = VectorFst::new();
    out.set_symbols(a.symbols().or(b.symbols()).cloned());
    let (Some(start_a), Some(start_b)) = (a.start(), b.start()) else {
        return Ok(out);
    };

    let mut pairs = PairStates {
        ids: HashMap::new(),
        queue: VecDeque::new(),
    };
    let start = pairs.get_or_add((start_a, start_b), &mut out);
    out.set_start(start)?;

    while let Some((qa, qb)) = pairs.queue.pop_front() {
        let q = pairs.ids[&(qa, qb)];
        let final_weight = a.final_weight(qa).times(b.final_weight(qb));
        if !final_weight.is_zero() {
            out.set_final(q, final_weight)?;
        }

        for ta in a.transitions(qa) {
            if ta.sym_out == EPSILON {
                let dest = pairs.get_or_add((ta.target_state, qb), &mut out);
                out.add_transition(q, Transition::new(ta.sym_in, EPSILON, ta.weight, dest))?;
                continue;
            }
            for tb in matching(b.transitions(qb), ta.sym_out, b_sorted) {
                let dest = pairs.get_or_add((ta.target_state, tb.target_state), &mut out);
                out.add_transition(
                    q,
                    Transition::new(ta.sym_in, tb.sym_out, ta.weight.times(tb.weight), dest),
                )?;
            }
        }

        for tb in b.transitions(qb).iter().filter(|t| t.sym_in == EPSILON) {
            let dest = pairs.get_or_add((qa, tb.target_state), &mut out);
            out.add_transition(q, Transition::new(EPSILON, tb.sym_out, tb.weight, dest))?;
        }
    }

    let composed = connect(&out);
    tracing::trace!(
        states = composed.num_states(),
        transitions = composed.num_transitions(),
        "composed"
    );
    Ok(composed)
}

/// Compose a chain of transducers left to right, sorting each accumulated
/// result by output label before the next step.
pub fn compose_all(fsts: &[&VectorFst]) -> Result<VectorFst, FstError> {
    let Some((first, rest)) = fsts.split_first() else {
        return Ok(VectorFst::new());
    };
    let mut acc = (*first).clone();
    for next in rest {
        let left = super::arc_sort(&acc, SortKey::Output);
        acc = compose(&left, next)?;
    }
    Ok(acc)
}
