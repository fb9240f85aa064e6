// Single-source and reverse shortest distances over non-negative weights.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::fst::VectorFst;
use crate::{StateId, TropicalWeight};

/// Min-heap entry ordered by weight.
#[derive(Debug, Clone, Copy)]
struct HeapEntry {
    weight: f32,
    state: StateId,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap
        other
            .weight
            .total_cmp(&self.weight)
            .then_with(|| other.state.cmp(&self.state))
    }
}

/// Dijkstra over an adjacency list, starting from every state whose entry in
/// `init` is not [`TropicalWeight::ZERO`].
pub(crate) fn dijkstra(
    adjacency: &[Vec<(StateId, TropicalWeight)>],
    init: Vec<TropicalWeight>,
) -> Vec<TropicalWeight> {
    let mut distance = init;
    let mut done = vec![false; distance.len()];
    let mut heap = BinaryHeap::new();
    for (state, d) in distance.iter().enumerate() {
        if !d.is_zero() {
            heap.push(HeapEntry {
                weight: d.value(),
                state: state as StateId,
            });
        }
    }

    while let Some(HeapEntry { state, .. }) = heap.pop() {
        let q = state as usize;
        if done[q] {
            continue;
        }
        done[q] = true;
        let dq = distance[q];
        for &(target, weight) in &adjacency[q] {
            let candidate = dq.times(weight);
            let t = target as usize;
            if candidate.value() < distance[t].value() {
                distance[t] = candidate;
                heap.push(HeapEntry {
                    weight: candidate.value(),
                    state: target,
                });
            }
        }
    }
    distance
}

/// Shortest distance from the start state to every state.
///
/// Weights must be non-negative. Unreachable states get
/// [`TropicalWeight::ZERO`].
pub fn shortest_distance(fst: &VectorFst) -> Vec<TropicalWeight> {
    let n = fst.num_states();
    let mut init = vec![TropicalWeight::ZERO; n];
    let Some(start) = fst.start() else {
        return init;
    };
    init[start as usize] = TropicalWeight::ONE;

    let adjacency: Vec<Vec<(StateId, TropicalWeight)>> = fst
        .states()
        .map(|q| {
            fst.transitions(q)
                .iter()
                .map(|t| (t.target_state, t.weight))
                .collect()
        })
        .collect();
    dijkstra(&adjacency, init)
}

/// Shortest distance from every state to a final state, final weight
/// included.
///
/// Weights must be non-negative. States that cannot reach a final state get
/// [`TropicalWeight::ZERO`].
pub fn shortest_distance_reverse(fst: &VectorFst) -> Vec<TropicalWeight> {
    let n = fst.num_states();
    let mut reverse: Vec<Vec<(StateId, TropicalWeight)>> = vec![Vec::new(); n];
    for q in fst.states() {
        for t in fst.transitions(q) {
            reverse[t.target_state as usize].push((q, t.weight));
        }
    }
    let init = fst.states().map(|q| fst.final_weight(q)).collect();
    dijkstra(&reverse, init)
}

/// Weight of the best successful path: the minimum over final states of
/// distance times final weight. [`TropicalWeight::ZERO`] if nothing is
/// accepted.
pub fn total_weight(fst: &VectorFst) -> TropicalWeight {
    shortest_distance(fst)
        .into_iter()
        .enumerate()
        .fold(TropicalWeight::ZERO, |acc, (q, d)| {
            acc.plus(d.times(fst.final_weight(q as StateId)))
        })
}
