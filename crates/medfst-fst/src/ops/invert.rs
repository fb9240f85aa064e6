// Inversion: exchange input and output labels.

use crate::fst::VectorFst;

/// Return a copy of `fst` with input and output labels exchanged on every
/// transition. Weights, states and finality are unchanged.
pub fn invert(fst: &VectorFst) -> VectorFst {
    let mut inverted = fst.clone();
    for state in inverted.states() {
        for t in inverted.transitions_mut(state).iter_mut() {
            std::mem::swap(&mut t.sym_in, &mut t.sym_out);
        }
    }
    inverted
}
