// Transducer expansion engine: bounded closures by self-composition.

use medfst_fst::ops::{arc_sort, compose, encode_determinize_minimize};
use medfst_fst::{SortKey, VectorFst};

use crate::error::ModelError;

/// Compose `elementary` with itself `n` times.
///
/// The result relates every pair reachable by up to `n + 1` sequential
/// applications of the elementary operator; since every elementary
/// transducer copies its input for free, fewer applications are included.
/// `n = 0` returns the elementary transducer itself, in canonical form.
///
/// The elementary is sorted by input label once, the accumulated result is
/// canonicalized (encode-determinize-minimize) and sorted by output label
/// after every composition, so its size stays bounded by the alphabet
/// rather than growing with `n`.
pub fn expand(n: u32, elementary: &VectorFst) -> Result<VectorFst, ModelError> {
    let step = arc_sort(elementary, SortKey::Input);
    let mut acc = arc_sort(&encode_determinize_minimize(elementary)?, SortKey::Output);

    for i in 0..n {
        let composed = compose(&acc, &step)?;
        let canonical = encode_determinize_minimize(&composed)?;
        tracing::debug!(
            step = i + 1,
            composed_states = composed.num_states(),
            states = canonical.num_states(),
            transitions = canonical.num_transitions(),
            "expanded"
        );
        acc = arc_sort(&canonical, SortKey::Output);
    }
    Ok(acc)
}
