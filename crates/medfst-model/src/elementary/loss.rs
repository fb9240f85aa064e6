// Bounded loss: contiguous runs of single-copy losses, each priced on opening.

use medfst_core::LossWeights;
use medfst_fst::{Transition, TropicalWeight, VectorFst};

use super::{add_passthrough_loops, log_built, passthrough_labels};
use crate::alphabet::Alphabet;
use crate::error::ModelError;

const CLOSED: u32 = 0;
const OPEN: u32 = 1;

/// Build the bounded-loss transducer.
///
/// Two states. `Closed` copies its input. The first position losing one
/// copy moves to `Open` at `weights.open`; every further position losing
/// one copy stays in `Open` at `weights.extend`. Zero copy numbers inside an
/// open run neither close nor extend it. Any other unchanged copy number, a
/// gap or a separator closes the run. With `exclude_zero` no position may
/// drop to zero. Both states are final.
pub fn bounded_loss(
    alphabet: &Alphabet,
    exclude_zero: bool,
    weights: LossWeights,
) -> Result<VectorFst, ModelError> {
    let mut fst = VectorFst::with_symbols(alphabet.symbol_table());
    fst.add_states(2);
    fst.set_start(CLOSED)?;
    fst.set_final(CLOSED, TropicalWeight::ONE)?;
    fst.set_final(OPEN, TropicalWeight::ONE)?;

    let zero = alphabet.zero_label();
    for (cn, label) in alphabet.copy_number_labels() {
        fst.add_transition(CLOSED, Transition::new(label, label, weights.stay, CLOSED))?;
        if cn > 0 {
            fst.add_transition(OPEN, Transition::new(label, label, weights.stay, CLOSED))?;
        }

        let Some(lower) = cn.checked_sub(1).and_then(|t| alphabet.cn_label(t)) else {
            continue;
        };
        if exclude_zero && lower == zero {
            continue;
        }
        fst.add_transition(CLOSED, Transition::new(label, lower, weights.open, OPEN))?;
        fst.add_transition(OPEN, Transition::new(label, lower, weights.extend, OPEN))?;
    }
    fst.add_transition(OPEN, Transition::new(zero, zero, TropicalWeight::ONE, OPEN))?;

    add_passthrough_loops(&mut fst, alphabet, CLOSED)?;
    for label in passthrough_labels(alphabet) {
        fst.add_transition(OPEN, Transition::new(label, label, TropicalWeight::ONE, CLOSED))?;
    }

    log_built("bounded_loss", &fst);
    Ok(fst)
}
