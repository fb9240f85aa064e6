// Trimming: keep only states on some successful path.

use crate::fst::VectorFst;
use crate::transition::Transition;
use crate::StateId;

/// Remove every state that is not reachable from the start or cannot reach
/// a final state. Surviving states keep their relative order.
///
/// A transducer without a start state (or whose start cannot reach a final
/// state) becomes the empty transducer.
pub fn connect(fst: &VectorFst) -> VectorFst {
    let mut out = VectorFst::new();
    out.set_symbols(fst.symbols().cloned());
    let Some(start) = fst.start() else {
        return out;
    };

    let n = fst.num_states();

    // Forward reachability
    let mut accessible = vec![false; n];
    let mut stack = vec![start];
    accessible[start as usize] = true;
    while let Some(q) = stack.pop() {
        for t in fst.transitions(q) {
            let target = t.target_state as usize;
            if !accessible[target] {
                accessible[target] = true;
                stack.push(t.target_state);
            }
        }
    }

    // Backward reachability from final states
    let mut reverse: Vec<Vec<StateId>> = vec![Vec::new(); n];
    for q in fst.states() {
        for t in fst.transitions(q) {
            reverse[t.target_state as usize].push(q);
        }
    }
    let mut coaccessible = vec![false; n];
    for q in fst.states() {
        if fst.is_final(q) {
            coaccessible[q as usize] = true;
            stack.push(q);
        }
    }
    while let Some(q) = stack.pop() {
        for &p in &reverse[q as usize] {
            if !coaccessible[p as usize] {
                coaccessible[p as usize] = true;
                stack.push(p);
            }
        }
    }

    if !coaccessible[start as usize] {
        return out;
    }

    let mut new_id: Vec<Option<StateId>> = vec![None; n];
    for q in 0..n {
        if accessible[q] && coaccessible[q] {
            new_id[q] = Some(out.add_state());
        }
    }

    for q in fst.states() {
        let Some(nq) = new_id[q as usize] else {
            continue;
        };
        *out.final_weight_mut(nq) = fst.final_weight(q);
        let transitions = out.transitions_mut(nq);
        for t in fst.transitions(q) {
            if let Some(target) = new_id[t.target_state as usize] {
                transitions.push(Transition {
                    target_state: target,
                    ..*t
                });
            }
        }
    }
    if let Some(ns) = new_id[start as usize] {
        out.set_start_unchecked(ns);
    }
    out
}
