// Vector-backed mutable transducer.

use std::ops::Range;
use std::sync::Arc;

use crate::symbols::SymbolTable;
use crate::transition::Transition;
use crate::weight::TropicalWeight;
use crate::{EPSILON, FstError, Label, StateId};

/// Which label transitions are ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    Input,
    Output,
}

#[derive(Debug, Clone)]
struct State {
    final_weight: TropicalWeight,
    transitions: Vec<Transition>,
}

impl State {
    fn new() -> Self {
        Self {
            final_weight: TropicalWeight::ZERO,
            transitions: Vec::new(),
        }
    }
}

/// A weighted transducer stored as a vector of states, each owning its
/// outgoing transitions.
///
/// Built by its constructor and then treated as an immutable value: every
/// operation in [`crate::ops`] returns a new `VectorFst`. The symbol table is
/// shared by input and output labels.
#[derive(Debug, Clone, Default)]
pub struct VectorFst {
    states: Vec<State>,
    start: Option<StateId>,
    symbols: Option<Arc<SymbolTable>>,
}

impl VectorFst {
    /// Create an empty transducer without a symbol table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty transducer bound to `symbols`.
    pub fn with_symbols(symbols: Arc<SymbolTable>) -> Self {
        Self {
            symbols: Some(symbols),
            ..Self::default()
        }
    }

    /// Build a linear acceptor reading (and writing) `labels` in order,
    /// with a final weight of one on its last state.
    pub fn linear_acceptor(labels: &[Label], symbols: Option<Arc<SymbolTable>>) -> Self {
        let mut fst = Self {
            symbols,
            ..Self::default()
        };
        let mut prev = fst.add_state();
        fst.start = Some(prev);
        for &label in labels {
            let next = fst.add_state();
            fst.states[prev as usize]
                .transitions
                .push(Transition::new(label, label, TropicalWeight::ONE, next));
            prev = next;
        }
        fst.states[prev as usize].final_weight = TropicalWeight::ONE;
        fst
    }

    pub fn symbols(&self) -> Option<&Arc<SymbolTable>> {
        self.symbols.as_ref()
    }

    pub fn set_symbols(&mut self, symbols: Option<Arc<SymbolTable>>) {
        self.symbols = symbols;
    }

    pub fn add_state(&mut self) -> StateId {
        let id = self.states.len() as StateId;
        self.states.push(State::new());
        id
    }

    /// Add `n` states and return their ids.
    pub fn add_states(&mut self, n: usize) -> Range<StateId> {
        let first = self.states.len() as StateId;
        self.states.extend((0..n).map(|_| State::new()));
        first..first + n as StateId
    }

    pub fn set_start(&mut self, state: StateId) -> Result<(), FstError> {
        self.check_state(state)?;
        self.start = Some(state);
        Ok(())
    }

    pub fn start(&self) -> Option<StateId> {
        self.start
    }

    pub fn set_final(
        &mut self,
        state: StateId,
        weight: impl Into<TropicalWeight>,
    ) -> Result<(), FstError> {
        self.check_state(state)?;
        self.states[state as usize].final_weight = weight.into();
        Ok(())
    }

    /// Final weight of `state`; [`TropicalWeight::ZERO`] if it is not final
    /// or does not exist.
    pub fn final_weight(&self, state: StateId) -> TropicalWeight {
        self.states
            .get(state as usize)
            .map_or(TropicalWeight::ZERO, |s| s.final_weight)
    }

    pub fn is_final(&self, state: StateId) -> bool {
        !self.final_weight(state).is_zero()
    }

    /// Add a transition leaving `state`. Both `state` and the transition's
    /// target must already exist.
    pub fn add_transition(&mut self, state: StateId, transition: Transition) -> Result<(), FstError> {
        self.check_state(state)?;
        self.check_state(transition.target_state)?;
        self.states[state as usize].transitions.push(transition);
        Ok(())
    }

    pub fn add_transitions(
        &mut self,
        state: StateId,
        transitions: impl IntoIterator<Item = Transition>,
    ) -> Result<(), FstError> {
        for transition in transitions {
            self.add_transition(state, transition)?;
        }
        Ok(())
    }

    /// Outgoing transitions of `state`; empty if it does not exist.
    pub fn transitions(&self, state: StateId) -> &[Transition] {
        self.states
            .get(state as usize)
            .map_or(&[][..], |s| s.transitions.as_slice())
    }

    pub(crate) fn transitions_mut(&mut self, state: StateId) -> &mut Vec<Transition> {
        &mut self.states[state as usize].transitions
    }

    pub(crate) fn final_weight_mut(&mut self, state: StateId) -> &mut TropicalWeight {
        &mut self.states[state as usize].final_weight
    }

    /// Set the start without the existence check; callers inside the crate
    /// only pass states they created.
    pub(crate) fn set_start_unchecked(&mut self, state: StateId) {
        self.start = Some(state);
    }

    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    pub fn num_transitions(&self) -> usize {
        self.states.iter().map(|s| s.transitions.len()).sum()
    }

    pub fn states(&self) -> Range<StateId> {
        0..self.states.len() as StateId
    }

    /// Whether the transitions of every state are ordered by `key`.
    pub fn is_sorted(&self, key: SortKey) -> bool {
        self.states.iter().all(|s| match key {
            SortKey::Input => s.transitions.is_sorted_by_key(|t| t.sym_in),
            SortKey::Output => s.transitions.is_sorted_by_key(|t| t.sym_out),
        })
    }

    /// Every transition reads the label it writes.
    pub fn is_acceptor(&self) -> bool {
        self.states
            .iter()
            .all(|s| s.transitions.iter().all(|t| t.sym_in == t.sym_out))
    }

    /// Some transition is labelled epsilon on both sides.
    pub fn has_epsilons(&self) -> bool {
        self.states
            .iter()
            .any(|s| s.transitions.iter().any(Transition::is_epsilon))
    }

    /// Some transition reads epsilon.
    pub fn has_input_epsilons(&self) -> bool {
        self.states
            .iter()
            .any(|s| s.transitions.iter().any(|t| t.sym_in == EPSILON))
    }

    fn check_state(&self, state: StateId) -> Result<(), FstError> {
        if (state as usize) < self.states.len() {
            Ok(())
        } else {
            Err(FstError::NoSuchState {
                state,
                num_states: self.states.len(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_two_state_fst() {
        let mut fst = VectorFst::new();
        let states = fst.add_states(2);
        assert_eq!(states, 0..2);
        fst.set_start(0).unwrap();
        fst.set_final(1, 0.5).unwrap();
        fst.add_transition(0, Transition::new(1, 2, 1.0, 1)).unwrap();

        assert_eq!(fst.start(), Some(0));
        assert_eq!(fst.num_states(), 2);
        assert_eq!(fst.num_transitions(), 1);
        assert!(fst.is_final(1));
        assert!(!fst.is_final(0));
        assert_eq!(fst.final_weight(1), TropicalWeight::new(0.5));
        assert_eq!(fst.transitions(0)[0].sym_out, 2);
    }

    #[test]
    fn reject_transition_to_missing_state() {
        let mut fst = VectorFst::new();
        fst.add_state();
        let err = fst
            .add_transition(0, Transition::new(1, 1, 0.0, 5))
            .unwrap_err();
        assert_eq!(
            err,
            FstError::NoSuchState {
                state: 5,
                num_states: 1
            }
        );
        assert!(fst.add_transition(3, Transition::new(1, 1, 0.0, 0)).is_err());
        assert!(fst.set_start(1).is_err());
        assert!(fst.set_final(9, 0.0).is_err());
    }

    #[test]
    fn missing_state_queries_are_empty() {
        let fst = VectorFst::new();
        assert!(fst.transitions(3).is_empty());
        assert!(fst.final_weight(3).is_zero());
    }

    #[test]
    fn linear_acceptor_shape() {
        let fst = VectorFst::linear_acceptor(&[3, 4, 3], None);
        assert_eq!(fst.num_states(), 4);
        assert_eq!(fst.num_transitions(), 3);
        assert!(fst.is_acceptor());
        assert!(fst.is_final(3));
        assert!(fst.is_sorted(SortKey::Input));
        assert!(fst.is_sorted(SortKey::Output));
    }

    #[test]
    fn empty_linear_acceptor_accepts_empty_string() {
        let fst = VectorFst::linear_acceptor(&[], None);
        assert_eq!(fst.num_states(), 1);
        assert!(fst.is_final(0));
    }

    #[test]
    fn sortedness_checks() {
        let mut fst = VectorFst::new();
        fst.add_states(2);
        fst.add_transition(0, Transition::new(3, 1, 0.0, 1)).unwrap();
        fst.add_transition(0, Transition::new(2, 4, 0.0, 1)).unwrap();
        assert!(!fst.is_sorted(SortKey::Input));
        assert!(fst.is_sorted(SortKey::Output));
    }

    #[test]
    fn epsilon_queries() {
        let mut fst = VectorFst::new();
        fst.add_states(2);
        fst.add_transition(0, Transition::new(0, 2, 0.0, 1)).unwrap();
        assert!(fst.has_input_epsilons());
        assert!(!fst.has_epsilons());
        fst.add_transition(1, Transition::new(0, 0, 0.0, 0)).unwrap();
        assert!(fst.has_epsilons());
    }
}
