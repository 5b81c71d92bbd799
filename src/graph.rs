// Copyright (C) 2025  The Software Heritage developers
// See the AUTHORS file at the top-level directory of this distribution
// License: GNU General Public License version 3, or any later version
// See top-level LICENSE file for more information

//! Compressed sparse row representation of a static graph.

/// Node identifier, an index in `0..graph.num_nodes()`.
pub type NodeId = usize;

/// An immutable directed graph in CSR form: an offsets array of length
/// `n + 1` and a flat successors array, built once and read-only from then
/// on.
///
/// ```
/// use pbfs::graph::Graph;
///
/// let graph = Graph::from_edges(3, &[(0, 1), (0, 2), (1, 2)]);
/// assert_eq!(graph.successors(0), &[1, 2]);
/// assert_eq!(graph.degree(2), 0);
/// ```
#[derive(Debug)]
pub struct Graph {
    /// `nodes[u]..nodes[u + 1]` delimits the successors of `u` in `edges`.
    nodes: Vec<usize>,
    edges: Vec<NodeId>,
}

impl Graph {
    /// Builds a graph from a sparse adjacency matrix in coordinate form.
    ///
    /// `ir` holds the row index of each nonzero and `jc` the per-column
    /// ranges into `ir` (`jc[i]..jc[i + 1]` are the nonzeros of column
    /// `i`), as in compressed sparse column matrix files. A nonzero at
    /// `(ir[t], i)` becomes the arc `ir[t] -> i`. The matrix must be
    /// square with `num_nodes` rows; the caller keeps ownership of the
    /// input arrays.
    ///
    /// Construction counts the out-degree of every node, prefix-sums the
    /// counts into offsets, then scatters the arcs into place.
    ///
    /// # Panics
    ///
    /// If `jc` does not hold `num_nodes + 1` monotone offsets into `ir`,
    /// or if any row index is out of bounds.
    pub fn from_coordinates(ir: &[NodeId], jc: &[usize], num_nodes: usize) -> Self {
        assert!(
            jc.len() == num_nodes + 1,
            "expected {} column offsets, got {}",
            num_nodes + 1,
            jc.len()
        );
        assert!(jc[0] == 0, "column offsets must start at 0");
        for w in jc.windows(2) {
            assert!(w[0] <= w[1], "column offsets must be monotone");
        }
        let num_edges = jc[num_nodes];
        assert!(
            num_edges <= ir.len(),
            "column offsets address {} nonzeros, row array holds {}",
            num_edges,
            ir.len()
        );

        let mut degrees = vec![0usize; num_nodes];
        for &row in &ir[..num_edges] {
            assert!(row < num_nodes, "row index {row} out of {num_nodes} nodes");
            degrees[row] += 1;
        }

        let mut nodes = Vec::with_capacity(num_nodes + 1);
        let mut offset = 0;
        for &degree in &degrees {
            nodes.push(offset);
            offset += degree;
        }
        nodes.push(offset);

        // Scatter, reusing the degree counts as write cursors.
        let mut cursors = nodes[..num_nodes].to_vec();
        let mut edges = vec![0; num_edges];
        for col in 0..num_nodes {
            for t in jc[col]..jc[col + 1] {
                edges[cursors[ir[t]]] = col;
                cursors[ir[t]] += 1;
            }
        }

        Graph { nodes, edges }
    }

    /// Builds a graph from a list of `(src, dst)` arcs, kept in input
    /// order within each source.
    ///
    /// # Panics
    ///
    /// If an arc endpoint is not below `num_nodes`.
    pub fn from_edges(num_nodes: usize, arcs: &[(NodeId, NodeId)]) -> Self {
        let mut degrees = vec![0usize; num_nodes];
        for &(src, dst) in arcs {
            assert!(
                src < num_nodes && dst < num_nodes,
                "arc {src} -> {dst} out of bounds for {num_nodes} nodes"
            );
            degrees[src] += 1;
        }

        let mut nodes = Vec::with_capacity(num_nodes + 1);
        let mut offset = 0;
        for &degree in &degrees {
            nodes.push(offset);
            offset += degree;
        }
        nodes.push(offset);

        let mut cursors = nodes[..num_nodes].to_vec();
        let mut edges = vec![0; arcs.len()];
        for &(src, dst) in arcs {
            edges[cursors[src]] = dst;
            cursors[src] += 1;
        }

        Graph { nodes, edges }
    }

    /// Number of nodes.
    #[inline(always)]
    pub fn num_nodes(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Number of arcs.
    #[inline(always)]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// The successors of `node`, in insertion order.
    #[inline(always)]
    pub fn successors(&self, node: NodeId) -> &[NodeId] {
        &self.edges[self.nodes[node]..self.nodes[node + 1]]
    }

    /// Out-degree of `node`.
    #[inline(always)]
    pub fn degree(&self, node: NodeId) -> usize {
        self.nodes[node + 1] - self.nodes[node]
    }
}
