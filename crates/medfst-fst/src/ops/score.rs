// Scoring a pair of strings against a transducer.

use super::{arc_sort, compose, total_weight};
use crate::fst::{SortKey, VectorFst};
use crate::{FstError, TropicalWeight};

/// Weight of the best path of `model` relating the language of `input` to
/// the language of `output`: the total weight of
/// `input ∘ model ∘ output`.
///
/// [`TropicalWeight::ZERO`] if no path relates them. Operands that are not
/// sorted as composition requires are sorted on the fly.
pub fn score(
    model: &VectorFst,
    input: &VectorFst,
    output: &VectorFst,
) -> Result<TropicalWeight, FstError> {
    let left = if input.is_sorted(SortKey::Output) || model.is_sorted(SortKey::Input) {
        compose(input, model)?
    } else {
        compose(&arc_sort(input, SortKey::Output), model)?
    };
    let left = if left.is_sorted(SortKey::Output) || output.is_sorted(SortKey::Input) {
        left
    } else {
        arc_sort(&left, SortKey::Output)
    };
    Ok(total_weight(&compose(&left, output)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Transition;

    /// Single-state transducer: identity on 1 and 2 at weight zero, 1 -> 2 at
    /// weight one.
    fn rewriter() -> VectorFst {
        let mut fst = VectorFst::new();
        let s = fst.add_state();
        fst.set_start(s).unwrap();
        fst.set_final(s, 0.0).unwrap();
        fst.add_transition(s, Transition::new(2, 2, 0.0, s)).unwrap();
        fst.add_transition(s, Transition::new(1, 2, 1.0, s)).unwrap();
        fst.add_transition(s, Transition::new(1, 1, 0.0, s)).unwrap();
        fst
    }

    #[test]
    fn counts_rewrites() {
        let input = VectorFst::linear_acceptor(&[1, 1, 2], None);
        let output = VectorFst::linear_acceptor(&[2, 1, 2], None);
        assert_eq!(
            score(&rewriter(), &input, &output).unwrap(),
            TropicalWeight::new(1.0)
        );
    }

    #[test]
    fn unrelated_strings_score_zero() {
        let input = VectorFst::linear_acceptor(&[2], None);
        let output = VectorFst::linear_acceptor(&[1], None);
        assert!(score(&rewriter(), &input, &output).unwrap().is_zero());
    }

    #[test]
    fn length_mismatch_scores_zero() {
        let input = VectorFst::linear_acceptor(&[1, 1], None);
        let output = VectorFst::linear_acceptor(&[1], None);
        assert!(score(&rewriter(), &input, &output).unwrap().is_zero());
    }
}
