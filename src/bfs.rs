// Copyright (C) 2025  The Software Heritage developers
// See the AUTHORS file at the top-level directory of this distribution
// License: GNU General Public License version 3, or any later version
// See top-level LICENSE file for more information

//! Serial breadth-first search, the reference for [`crate::pbfs`].

use std::collections::VecDeque;

use crate::graph::{Graph, NodeId};
use crate::{OutOfBoundError, UNREACHED};

/// Computes unweighted hop distances from `source` into `distances`.
///
/// Prior contents of `distances` are overwritten; nodes the traversal does
/// not reach keep [`UNREACHED`].
///
/// # Panics
///
/// If `distances` is not exactly `graph.num_nodes()` long.
///
/// ```
/// use pbfs::graph::Graph;
///
/// let graph = Graph::from_edges(3, &[(0, 1), (1, 0), (1, 2), (2, 1)]);
/// let mut distances = vec![0; 3];
/// pbfs::bfs(&graph, 0, &mut distances)?;
/// assert_eq!(distances, vec![0, 1, 2]);
/// # Ok::<(), pbfs::OutOfBoundError>(())
/// ```
pub fn bfs(graph: &Graph, source: NodeId, distances: &mut [u32]) -> Result<(), OutOfBoundError> {
    let num_nodes = graph.num_nodes();
    if source >= num_nodes {
        return Err(OutOfBoundError {
            index: source,
            len: num_nodes,
        });
    }
    assert!(
        distances.len() == num_nodes,
        "distance array of {} entries for {} nodes",
        distances.len(),
        num_nodes
    );

    distances.fill(UNREACHED);
    distances[source] = 0;

    let mut queue = VecDeque::new();
    queue.push_back(source);
    while let Some(current) = queue.pop_front() {
        let newdist = distances[current] + 1;
        for &succ in graph.successors(current) {
            if newdist < distances[succ] {
                distances[succ] = newdist;
                queue.push_back(succ);
            }
        }
    }

    Ok(())
}
