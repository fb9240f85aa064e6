// Transition structs: the in-memory arc and its fixed-size stored layout.

use bytemuck::{Pod, Zeroable};

use crate::weight::TropicalWeight;
use crate::{Label, StateId};

/// One arc of a transducer: reading `sym_in`, writing `sym_out`, paying
/// `weight` and moving to `target_state`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub sym_in: Label,
    pub sym_out: Label,
    pub weight: TropicalWeight,
    pub target_state: StateId,
}

impl Transition {
    #[inline]
    pub fn new(
        sym_in: Label,
        sym_out: Label,
        weight: impl Into<TropicalWeight>,
        target_state: StateId,
    ) -> Self {
        Self {
            sym_in,
            sym_out,
            weight: weight.into(),
            target_state,
        }
    }

    /// Both labels are epsilon.
    #[inline]
    pub fn is_epsilon(&self) -> bool {
        self.sym_in == crate::EPSILON && self.sym_out == crate::EPSILON
    }
}

/// Stored transition (16 bytes).
///
/// - `sym_in` (u32): input label
/// - `sym_out` (u32): output label
/// - `target_state` (u32): target state index
/// - `weight` (f32): tropical weight, `+inf` never stored
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct StoredTransition {
    pub sym_in: u32,
    pub sym_out: u32,
    pub target_state: u32,
    pub weight: f32,
}

/// Stored state (16 bytes).
///
/// - `first_transition` (u32): index of the state's first transition
/// - `transition_count` (u32): number of consecutive transitions
/// - `final_weight` (f32): `+inf` for non-final states
/// - `_reserved` (u32): padding
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct StoredState {
    pub first_transition: u32,
    pub transition_count: u32,
    pub final_weight: f32,
    pub _reserved: u32,
}

impl From<&Transition> for StoredTransition {
    fn from(t: &Transition) -> Self {
        Self {
            sym_in: t.sym_in,
            sym_out: t.sym_out,
            target_state: t.target_state,
            weight: t.weight.value(),
        }
    }
}

impl From<&StoredTransition> for Transition {
    fn from(t: &StoredTransition) -> Self {
        Transition::new(t.sym_in, t.sym_out, t.weight, t.target_state)
    }
}

const _: () = assert!(size_of::<StoredTransition>() == 16);
const _: () = assert!(size_of::<StoredState>() == 16);
