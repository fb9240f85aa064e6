// Whole-genome doubling: one genome-wide event charged exactly once.

use medfst_core::WgdRatio;
use medfst_fst::{StateId, Transition, TropicalWeight, VectorFst};

use super::{add_passthrough_loops, log_built};
use crate::alphabet::Alphabet;
use crate::error::ModelError;

const UNDECIDED: StateId = 0;
const DOUBLING: StateId = 1;
const STABLE: StateId = 2;

/// Doubled value of `cn`, if it exists.
fn doubled(cn: u8, ratio: WgdRatio, total_cn: bool) -> Option<u8> {
    match ratio {
        WgdRatio::Times2 => cn.checked_mul(2),
        WgdRatio::PlusOne => cn.checked_add(if total_cn { 2 } else { 1 }),
    }
}

/// Build the whole-genome-doubling transducer.
///
/// `Undecided` skips zero copy numbers until the first non-zero one, which
/// either doubles (paying `wgd_cost` and entering `Doubling`) or stays
/// (entering `Stable`). `Doubling` doubles every later non-zero copy number
/// for free; `Stable` copies its input. A doubled value beyond `max_cn`
/// cannot be produced. Gaps and separators are copied in every state and
/// every state is final.
pub fn whole_genome_doubling(
    alphabet: &Alphabet,
    wgd_cost: f32,
    ratio: WgdRatio,
    total_cn: bool,
) -> Result<VectorFst, ModelError> {
    let mut fst = VectorFst::with_symbols(alphabet.symbol_table());
    fst.add_states(3);
    fst.set_start(UNDECIDED)?;
    for q in [UNDECIDED, DOUBLING, STABLE] {
        fst.set_final(q, TropicalWeight::ONE)?;
        add_passthrough_loops(&mut fst, alphabet, q)?;
    }

    let zero = alphabet.zero_label();
    fst.add_transition(UNDECIDED, Transition::new(zero, zero, TropicalWeight::ONE, UNDECIDED))?;
    fst.add_transition(DOUBLING, Transition::new(zero, zero, TropicalWeight::ONE, DOUBLING))?;

    for (cn, label) in alphabet.copy_number_labels() {
        fst.add_transition(STABLE, Transition::new(label, label, TropicalWeight::ONE, STABLE))?;
        if cn == 0 {
            continue;
        }
        fst.add_transition(UNDECIDED, Transition::new(label, label, TropicalWeight::ONE, STABLE))?;
        let Some(target) = doubled(cn, ratio, total_cn).and_then(|t| alphabet.cn_label(t)) else {
            continue;
        };
        fst.add_transition(UNDECIDED, Transition::new(label, target, wgd_cost, DOUBLING))?;
        fst.add_transition(DOUBLING, Transition::new(label, target, TropicalWeight::ONE, DOUBLING))?;
    }

    log_built("wgd", &fst);
    Ok(fst)
}
