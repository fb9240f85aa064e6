// Elementary transducers: one mutational event each.
//
// Every builder returns a small transducer over the alphabet's shared symbol
// table. All of them accept every profile paired with itself at weight zero,
// gaps and separators included.
//
// Architecture:
//   - `loss`: contiguous runs losing one copy per position
//   - `loh`: runs collapsing to zero, each priced at its largest drop
//   - `wgd`: at most one genome-wide doubling

mod loh;
mod loss;
mod wgd;

pub use loh::loss_of_heterozygosity;
pub use loss::bounded_loss;
pub use wgd::whole_genome_doubling;

use medfst_fst::{FstError, Label, StateId, Transition, TropicalWeight, VectorFst};

use crate::alphabet::Alphabet;

/// Labels every event copies unchanged: the gap, then the separator if the
/// alphabet has one.
fn passthrough_labels(alphabet: &Alphabet) -> impl Iterator<Item = Label> {
    std::iter::once(alphabet.gap_label()).chain(alphabet.separator_label())
}

/// Add zero-weight gap and separator self-loops to `state`.
fn add_passthrough_loops(
    fst: &mut VectorFst,
    alphabet: &Alphabet,
    state: StateId,
) -> Result<(), FstError> {
    for label in passthrough_labels(alphabet) {
        fst.add_transition(state, Transition::new(label, label, TropicalWeight::ONE, state))?;
    }
    Ok(())
}

fn log_built(name: &str, fst: &VectorFst) {
    tracing::debug!(
        transducer = name,
        states = fst.num_states(),
        transitions = fst.num_transitions(),
        "built elementary transducer"
    );
}
