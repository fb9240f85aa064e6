// Transition sorting.

use crate::fst::{SortKey, VectorFst};

/// Return a copy of `fst` whose transitions are ordered by `key` in every
/// state. Ties keep their relative order.
pub fn arc_sort(fst: &VectorFst, key: SortKey) -> VectorFst {
    let mut sorted = fst.clone();
    for state in sorted.states() {
        let transitions = sorted.transitions_mut(state);
        match key {
            SortKey::Input => transitions.sort_by_key(|t| (t.sym_in, t.sym_out)),
            SortKey::Output => transitions.sort_by_key(|t| (t.sym_out, t.sym_in)),
        }
    }
    sorted
}
