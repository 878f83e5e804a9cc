//! The replicated adjacency structure.
//!
//! Built once from edge triples, optionally stripped of blocked vertices'
//! outgoing edges, then shared read-only by every worker for the rest of the
//! run. A blocked vertex keeps its incoming edges: it can still be reached
//! and assigned a distance, it just propagates nothing onward.

use smallvec::SmallVec;

/// A vertex identifier in `[0, vertices)`.
pub type Vertex = u32;

type Neighbors = SmallVec<[Vertex; 4]>;

#[derive(Clone, Debug)]
pub struct Graph {
    adjacency: Vec<Neighbors>,
}

impl Graph {
    /// An edgeless graph over `vertices` vertices.
    pub fn new(vertices: usize) -> Self {
        Graph { adjacency: vec![Neighbors::new(); vertices] }
    }

    /// Inserts an edge. An undirected edge is traversable both ways; a
    /// directed edge only from `u` to `v`.
    pub fn insert(&mut self, u: Vertex, v: Vertex, directed: bool) {
        self.adjacency[u as usize].push(v);
        if !directed {
            self.adjacency[v as usize].push(u);
        }
    }

    /// Clears the outgoing edges of `v`, turning it into a dead end.
    pub fn block(&mut self, v: Vertex) {
        self.adjacency[v as usize].clear();
    }

    pub fn vertices(&self) -> usize {
        self.adjacency.len()
    }

    pub fn neighbors(&self, v: Vertex) -> &[Vertex] {
        &self.adjacency[v as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undirected_edges_go_both_ways() {
        let mut graph = Graph::new(3);
        graph.insert(0, 1, false);
        assert_eq!(graph.neighbors(0), &[1]);
        assert_eq!(graph.neighbors(1), &[0]);
        assert_eq!(graph.neighbors(2), &[] as &[Vertex]);
    }

    #[test]
    fn directed_edges_go_one_way() {
        let mut graph = Graph::new(2);
        graph.insert(0, 1, true);
        assert_eq!(graph.neighbors(0), &[1]);
        assert_eq!(graph.neighbors(1), &[] as &[Vertex]);
    }

    #[test]
    fn blocking_clears_outgoing_but_not_incoming() {
        let mut graph = Graph::new(3);
        graph.insert(0, 1, false);
        graph.insert(1, 2, false);
        graph.block(1);
        assert_eq!(graph.neighbors(1), &[] as &[Vertex]);
        // 1 is still reachable from both sides
        assert_eq!(graph.neighbors(0), &[1]);
        assert_eq!(graph.neighbors(2), &[1]);
    }

    #[test]
    fn self_loops_are_allowed() {
        let mut graph = Graph::new(1);
        graph.insert(0, 0, true);
        assert_eq!(graph.neighbors(0), &[0]);
    }
}
