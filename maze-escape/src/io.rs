//! Problem text parsing and result output.
//!
//! The input is a whitespace-separated token stream: vertex and edge counts,
//! the edge triples `u v directed`, the source vertex, the query list
//! (count-prefixed), and the blocked-vertex list (count-prefixed). All vertex
//! ids are validated against the vertex count here, so the rest of the crate
//! can index without checking.

use std::fs;
use std::path::Path;

use crate::error::Error;
use crate::graph::{Graph, Vertex};

/// A fully parsed problem instance, replicated verbatim to every worker.
#[derive(Clone, Debug)]
pub struct Problem {
    pub vertices: usize,
    pub edges: Vec<(Vertex, Vertex, bool)>,
    pub source: Vertex,
    pub queries: Vec<Vertex>,
    pub blocked: Vec<Vertex>,
}

impl Problem {
    /// Reads and parses a problem file.
    pub fn read(path: &Path) -> Result<Self, Error> {
        let text = fs::read_to_string(path)
            .map_err(|source| Error::Read { path: path.to_path_buf(), source })?;
        Self::parse(&text)
    }

    /// Parses problem text.
    pub fn parse(text: &str) -> Result<Self, Error> {
        let mut tokens = Tokens::new(text);
        let vertices = tokens.count("vertex count")?;
        let edge_count = tokens.count("edge count")?;
        let mut edges = Vec::with_capacity(edge_count);
        for _ in 0..edge_count {
            let u = tokens.vertex("edge tail", vertices)?;
            let v = tokens.vertex("edge head", vertices)?;
            let directed = match tokens.count("edge direction flag")? {
                0 => false,
                1 => true,
                other => {
                    return Err(Error::Parse(format!(
                        "edge direction flag must be 0 or 1, got {other}"
                    )))
                }
            };
            edges.push((u, v, directed));
        }
        let source = tokens.vertex("source vertex", vertices)?;
        let query_count = tokens.count("query count")?;
        let mut queries = Vec::with_capacity(query_count);
        for _ in 0..query_count {
            queries.push(tokens.vertex("query vertex", vertices)?);
        }
        let blocked_count = tokens.count("blocked-vertex count")?;
        let mut blocked = Vec::with_capacity(blocked_count);
        for _ in 0..blocked_count {
            blocked.push(tokens.vertex("blocked vertex", vertices)?);
        }
        Ok(Problem { vertices, edges, source, queries, blocked })
    }

    /// Builds the adjacency structure: all edges inserted, then the blocked
    /// vertices' outgoing edges cleared.
    pub fn graph(&self) -> Graph {
        let mut graph = Graph::new(self.vertices);
        for &(u, v, directed) in &self.edges {
            graph.insert(u, v, directed);
        }
        for &v in &self.blocked {
            graph.block(v);
        }
        graph
    }
}

/// Writes the query answers as a single space-separated line.
pub fn write_distances(path: &Path, distances: &[i64]) -> Result<(), Error> {
    let line: Vec<String> = distances.iter().map(ToString::to_string).collect();
    fs::write(path, line.join(" ") + "\n")
        .map_err(|source| Error::Write { path: path.to_path_buf(), source })
}

struct Tokens<'a> {
    inner: std::str::SplitAsciiWhitespace<'a>,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        Tokens { inner: text.split_ascii_whitespace() }
    }

    fn next(&mut self, what: &str) -> Result<&'a str, Error> {
        self.inner
            .next()
            .ok_or_else(|| Error::Parse(format!("missing {what}")))
    }

    fn count(&mut self, what: &str) -> Result<usize, Error> {
        let token = self.next(what)?;
        token
            .parse()
            .map_err(|_| Error::Parse(format!("{what} is not a number: {token:?}")))
    }

    fn vertex(&mut self, what: &str, bound: usize) -> Result<Vertex, Error> {
        let value = self.count(what)?;
        if value >= bound {
            return Err(Error::Parse(format!(
                "{what} {value} out of range (graph has {bound} vertices)"
            )));
        }
        Ok(value as Vertex)
    }
}
