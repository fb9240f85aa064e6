// Weighted determinization over label pairs.

use std::borrow::Cow;
use std::collections::{BTreeMap, VecDeque};

use hashbrown::HashMap;

use super::rm_epsilon;
use crate::fst::VectorFst;
use crate::transition::Transition;
use crate::{FstError, Label, MAX_DETERMINIZED_STATES, StateId, TropicalWeight};

/// A determinized state: original states with their residual weights,
/// ordered by state id.
type Subset = Vec<(StateId, TropicalWeight)>;

fn subset_key(subset: &Subset) -> Vec<(StateId, i64)> {
    subset.iter().map(|&(q, w)| (q, w.quantize())).collect()
}

/// Determinize `fst`, treating each `(input, output)` label pair as a single
/// symbol.
///
/// The result has at most one transition per label pair leaving each state
/// and relates exactly the same pairs of strings at the same minimum
/// weights. Transitions labelled epsilon on both sides are removed first.
/// Weights must be non-negative.
///
/// Returns [`FstError::StateLimitExceeded`] if more than
/// [`MAX_DETERMINIZED_STATES`] states would be created.
pub fn determinize(fst: &VectorFst) -> Result<VectorFst, FstError> {
    let input: Cow<'_, VectorFst> = if fst.has_epsilons() {
        Cow::Owned(rm_epsilon(fst))
    } else {
        Cow::Borrowed(fst)
    };

    let mut out = VectorFst::new();
    out.set_symbols(input.symbols().cloned());
    let Some(start) = input.start() else {
        return Ok(out);
    };

    let mut subsets: Vec<Subset> = Vec::new();
    let mut ids: HashMap<Vec<(StateId, i64)>, StateId> = HashMap::new();
    let mut queue: VecDeque<StateId> = VecDeque::new();

    let initial: Subset = vec![(start, TropicalWeight::ONE)];
    ids.insert(subset_key(&initial), out.add_state());
    subsets.push(initial);
    out.set_start_unchecked(0);
    queue.push_back(0);

    while let Some(id) = queue.pop_front() {
        let subset = subsets[id as usize].clone();

        let mut final_weight = TropicalWeight::ZERO;
        let mut by_label: BTreeMap<(Label, Label), Vec<(StateId, TropicalWeight)>> =
            BTreeMap::new();
        for &(q, residual) in &subset {
            final_weight = final_weight.plus(residual.times(input.final_weight(q)));
            for t in input.transitions(q) {
                by_label
                    .entry((t.sym_in, t.sym_out))
                    .or_default()
                    .push((t.target_state, residual.times(t.weight)));
            }
        }
        *out.final_weight_mut(id) = final_weight;

        for ((sym_in, sym_out), targets) in by_label {
            let weight = targets
                .iter()
                .fold(TropicalWeight::ZERO, |acc, &(_, w)| acc.plus(w));
            if weight.is_zero() {
                continue;
            }

            let mut residuals: BTreeMap<StateId, TropicalWeight> = BTreeMap::new();
            for (target, w) in targets {
                let residual = w.divide(weight);
                residuals
                    .entry(target)
                    .and_modify(|r| *r = r.plus(residual))
                    .or_insert(residual);
            }
            let next: Subset = residuals.into_iter().collect();
            let key = subset_key(&next);

            let target_id = match ids.get(&key) {
                Some(&existing) => existing,
                None => {
                    if subsets.len() >= MAX_DETERMINIZED_STATES {
                        return Err(FstError::StateLimitExceeded {
                            limit: MAX_DETERMINIZED_STATES,
                        });
                    }
                    let new_id = out.add_state();
                    ids.insert(key, new_id);
                    subsets.push(next);
                    queue.push_back(new_id);
                    new_id
                }
            };
            out.transitions_mut(id)
                .push(Transition::new(sym_in, sym_out, weight, target_id));
        }
    }

    tracing::trace!(
        from_states = input.num_states(),
        to_states = out.num_states(),
        "determinized"
    );
    Ok(out)
}
