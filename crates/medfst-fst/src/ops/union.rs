// Union (alternation).

use super::check_symbols;
use crate::fst::VectorFst;
use crate::transition::Transition;
use crate::{EPSILON, FstError, StateId, TropicalWeight};

/// Accept every pair accepted by `a` or by `b`, each at its own weight.
///
/// A fresh start state reaches the start states of both operands through
/// epsilon transitions of weight one; follow with
/// [`crate::ops::rm_epsilon`] to obtain an epsilon-free result.
pub fn union(a: &VectorFst, b: &VectorFst) -> Result<VectorFst, FstError> {
    check_symbols(a, b)?;
    let mut out = VectorFst::new();
    out.set_symbols(a.symbols().or(b.symbols()).cloned());
    let start = out.add_state();
    out.set_start(start)?;

    for operand in [a, b] {
        let offset = out.num_states() as StateId;
        out.add_states(operand.num_states());
        for q in operand.states() {
            let final_weight = operand.final_weight(q);
            if !final_weight.is_zero() {
                out.set_final(q + offset, final_weight)?;
            }
            for t in operand.transitions(q) {
                out.add_transition(
                    q + offset,
                    Transition {
                        target_state: t.target_state + offset,
                        ..*t
                    },
                )?;
            }
        }
        if let Some(operand_start) = operand.start() {
            out.add_transition(
                start,
                Transition::new(EPSILON, EPSILON, TropicalWeight::ONE, operand_start + offset),
            )?;
        }
    }
    Ok(out)
}
