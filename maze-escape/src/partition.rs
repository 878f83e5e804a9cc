//! Static assignment of vertices to the workers that finalize them.

use crate::graph::Vertex;

/// Maps each vertex to the worker that owns it: the owner alone finalizes the
/// vertex's distance locally and holds it in its frontier. The assignment is
/// fixed for the whole run; it never reacts to load.
pub trait Partition {
    fn owner(&self, vertex: Vertex) -> usize;
}

/// Ownership by residue: vertex `v` belongs to worker `v mod workers`.
#[derive(Clone, Copy, Debug)]
pub struct ModuloPartition {
    workers: usize,
}

impl ModuloPartition {
    pub fn new(workers: usize) -> Self {
        assert!(workers > 0, "a partition needs at least one worker");
        ModuloPartition { workers }
    }
}

impl Partition for ModuloPartition {
    fn owner(&self, vertex: Vertex) -> usize {
        vertex as usize % self.workers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modulo_assignment() {
        let partition = ModuloPartition::new(3);
        assert_eq!(partition.owner(0), 0);
        assert_eq!(partition.owner(4), 1);
        assert_eq!(partition.owner(11), 2);
    }

    #[test]
    fn single_worker_owns_everything() {
        let partition = ModuloPartition::new(1);
        for v in 0..100 {
            assert_eq!(partition.owner(v), 0);
        }
    }
}
