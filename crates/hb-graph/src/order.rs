//! Evaluation ordering and recycle detection.
//!
//! Units are ordered with Kahn's algorithm, ties broken by declaration order.
//! When only cyclic units remain, the lowest-declared unit whose predecessors
//! outside its own strongly connected component are all placed is released
//! next. Streams whose destination is evaluated no later than their source
//! are back edges; the solver iterates on them.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use hb_core::{StreamId, UnitId};
use petgraph::algo::tarjan_scc;
use petgraph::graphmap::DiGraphMap;

use crate::graph::Graph;

/// Deterministic evaluation plan for one graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationOrder {
    /// Units in evaluation order.
    pub order: Vec<UnitId>,
    /// Position of each unit in `order`, indexed by unit.
    pub position: Vec<usize>,
    /// Streams that feed a unit evaluated no later than their source.
    pub back_edges: Vec<StreamId>,
    /// Strongly connected components with a cycle, units in declaration order.
    pub cycles: Vec<Vec<UnitId>>,
}

impl EvaluationOrder {
    pub fn is_acyclic(&self) -> bool {
        self.back_edges.is_empty()
    }

    pub fn is_back_edge(&self, stream: StreamId) -> bool {
        self.back_edges.contains(&stream)
    }
}

/// Compute the evaluation order and back edges of `graph`.
pub fn evaluation_order(graph: &Graph) -> EvaluationOrder {
    let n = graph.units().len();
    let edges: Vec<(usize, usize, StreamId)> = graph
        .streams()
        .iter()
        .filter_map(|s| {
            let from = graph.source_unit(s.id)?.ix();
            let to = graph.dest_unit(s.id)?.ix();
            Some((from, to, s.id))
        })
        .collect();

    let mut digraph: DiGraphMap<usize, ()> = DiGraphMap::new();
    for u in 0..n {
        digraph.add_node(u);
    }
    for &(from, to, _) in &edges {
        digraph.add_edge(from, to, ());
    }

    let mut scc_of = vec![0usize; n];
    let mut cycles: Vec<Vec<UnitId>> = Vec::new();
    for (i, component) in tarjan_scc(&digraph).into_iter().enumerate() {
        for &u in &component {
            scc_of[u] = i;
        }
        let self_loop = component.len() == 1 && digraph.contains_edge(component[0], component[0]);
        if component.len() > 1 || self_loop {
            let mut members: Vec<UnitId> = component
                .iter()
                .map(|&u| UnitId::from_index(u as u32))
                .collect();
            members.sort();
            cycles.push(members);
        }
    }
    cycles.sort();

    // distinct predecessor units, self-loops excluded
    let mut preds: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut succs: Vec<Vec<usize>> = vec![Vec::new(); n];
    for &(from, to, _) in &edges {
        if from != to && !preds[to].contains(&from) {
            preds[to].push(from);
            succs[from].push(to);
        }
    }

    let mut indegree: Vec<usize> = preds.iter().map(Vec::len).collect();
    let mut queued = vec![false; n];
    let mut placed = vec![false; n];
    let mut heap = BinaryHeap::new();
    for u in 0..n {
        if indegree[u] == 0 {
            heap.push(Reverse(u));
            queued[u] = true;
        }
    }

    let mut order = Vec::with_capacity(n);
    while order.len() < n {
        let Some(Reverse(u)) = heap.pop() else {
            let release = (0..n)
                .find(|&u| {
                    !placed[u]
                        && preds[u]
                            .iter()
                            .all(|&p| placed[p] || scc_of[p] == scc_of[u])
                })
                .or_else(|| (0..n).find(|&u| !placed[u]));
            if let Some(u) = release {
                heap.push(Reverse(u));
                queued[u] = true;
            }
            continue;
        };

        placed[u] = true;
        order.push(UnitId::from_index(u as u32));
        for &v in &succs[u] {
            indegree[v] = indegree[v].saturating_sub(1);
            if indegree[v] == 0 && !queued[v] {
                heap.push(Reverse(v));
                queued[v] = true;
            }
        }
    }

    let mut position = vec![0usize; n];
    for (pos, unit) in order.iter().enumerate() {
        position[unit.ix()] = pos;
    }

    let back_edges = edges
        .iter()
        .filter(|&&(from, to, _)| position[to] <= position[from])
        .map(|&(_, _, s)| s)
        .collect();

    EvaluationOrder {
        order,
        position,
        back_edges,
        cycles,
    }
}
