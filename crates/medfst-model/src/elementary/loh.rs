// Loss of heterozygosity: a run collapsing to zero copies in one event.

use medfst_fst::ops::encode_determinize_minimize;
use medfst_fst::{StateId, Transition, TropicalWeight, VectorFst};

use super::{add_passthrough_loops, log_built};
use crate::alphabet::Alphabet;
use crate::error::ModelError;

const NEUTRAL: StateId = 0;

/// Build the loss-of-heterozygosity transducer.
///
/// State `0` copies its input. State `k` is inside a run whose cost ceiling
/// is `k`: the first position of a run pays its full drop to zero and
/// enters the state of that magnitude, later drops up to the ceiling are
/// free, and a larger drop pays only its excess and raises the ceiling. An
/// unchanged copy number ends the run. A run is therefore priced at its
/// largest drop, not the sum of its drops. Gaps and separators are copied
/// in every state without ending a run. Every state is final.
///
/// The raw automaton is returned in encode-determinize-minimize form.
pub fn loss_of_heterozygosity(alphabet: &Alphabet) -> Result<VectorFst, ModelError> {
    let max_cn = alphabet.max_cn();
    let zero = alphabet.zero_label();

    let mut fst = VectorFst::with_symbols(alphabet.symbol_table());
    fst.add_states(usize::from(max_cn) + 1);
    fst.set_start(NEUTRAL)?;
    for q in fst.states() {
        fst.set_final(q, TropicalWeight::ONE)?;
        add_passthrough_loops(&mut fst, alphabet, q)?;
    }

    for (cn, label) in alphabet.copy_number_labels() {
        fst.add_transition(NEUTRAL, Transition::new(label, label, TropicalWeight::ONE, NEUTRAL))?;
        if cn > 0 {
            fst.add_transition(
                NEUTRAL,
                Transition::new(label, zero, f32::from(cn), StateId::from(cn)),
            )?;
        }
    }

    for ceiling in 1..=max_cn {
        let state = StateId::from(ceiling);
        for (cn, label) in alphabet.copy_number_labels() {
            let drop = if cn <= ceiling {
                Transition::new(label, zero, TropicalWeight::ONE, state)
            } else {
                Transition::new(label, zero, f32::from(cn - ceiling), StateId::from(cn))
            };
            fst.add_transition(state, drop)?;
            fst.add_transition(state, Transition::new(label, label, TropicalWeight::ONE, NEUTRAL))?;
        }
    }

    log_built("loh_raw", &fst);
    let canonical = encode_determinize_minimize(&fst)?;
    log_built("loh", &canonical);
    Ok(canonical)
}
