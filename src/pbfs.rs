// Copyright (C) 2025  The Software Heritage developers
// See the AUTHORS file at the top-level directory of this distribution
// License: GNU General Public License version 3, or any later version
// See top-level LICENSE file for more information

//! Parallel breadth-first search with bag-based frontiers.
//!
//! The traversal is level-synchronous: the nodes at distance `d` live in a
//! bag, workers drain it in parallel (whole pennants first, then the
//! filling block, all in [`THRESHOLD`]-sized slices) and insert the nodes
//! discovered at distance `d + 1` into their local views of the next bag.
//! Two [`BagReducer`]s alternate between the current and next roles.
//!
//! Distance updates race on purpose: every worker scanning the same level
//! writes the same value, so the loser of a race stores what the winner
//! already stored. A stale read can only cause a node to be inserted into
//! the next bag more than once, and the distance check at the next level
//! rejects the duplicates. All accesses go through relaxed atomics; there
//! is no lock anywhere on this path.

use std::sync::atomic::{AtomicU32, Ordering};

use log::debug;
use rayon::prelude::*;

use crate::collections::{Bag, BagReducer, Pennant, BLK_SIZE};
use crate::graph::{Graph, NodeId};
use crate::{OutOfBoundError, UNREACHED};

/// Grain of the parallel node processing: workers receive frontier nodes
/// in slices of this many.
const THRESHOLD: usize = 256;

// Pennant blocks are handed out in THRESHOLD-sized slices.
const _: () = assert!(BLK_SIZE % THRESHOLD == 0);

/// Computes unweighted hop distances from `source` into `distances`, in
/// parallel on the current rayon thread pool.
///
/// The result is element-wise identical to [`crate::bfs`]: prior contents
/// of `distances` are overwritten and unreachable nodes keep
/// [`UNREACHED`].
///
/// # Panics
///
/// If `distances` is not exactly `graph.num_nodes()` long.
///
/// ```
/// use pbfs::graph::Graph;
///
/// let graph = Graph::from_edges(4, &[(0, 1), (0, 2), (1, 3), (2, 3)]);
/// let mut distances = vec![0; 4];
/// pbfs::pbfs(&graph, 0, &mut distances)?;
/// assert_eq!(distances, vec![0, 1, 1, 2]);
/// # Ok::<(), pbfs::OutOfBoundError>(())
/// ```
pub fn pbfs(graph: &Graph, source: NodeId, distances: &mut [u32]) -> Result<(), OutOfBoundError> {
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

    let distances = as_atomic(distances);
    distances
        .par_iter()
        .for_each(|d| d.store(UNREACHED, Ordering::Relaxed));
    distances[source].store(0, Ordering::Relaxed);

    let mut queues = [BagReducer::new(), BagReducer::new()];
    let mut queuei = 0;

    // Seed the first frontier from the source's successor list.
    let seed = &queues[queuei];
    graph.successors(source).par_iter().for_each(|&succ| {
        if succ != source {
            seed.insert(succ);
            distances[succ].store(1, Ordering::Relaxed);
        }
    });

    let mut newdist = 2u32;
    loop {
        let mut current = queues[queuei].take();
        if current.is_empty() {
            break;
        }
        debug!(
            "level {}: {} frontier nodes",
            newdist - 1,
            current.num_elements()
        );
        queues[1 - queuei].clear();
        walk_bag(
            &mut current,
            &queues[1 - queuei],
            newdist,
            distances,
            graph,
        );
        queuei = 1 - queuei;
        newdist += 1;
    }

    Ok(())
}

/// Drains `bag`, walking every popped pennant in parallel with the rest of
/// the drain, then processes the filling block.
fn walk_bag(
    bag: &mut Bag<NodeId>,
    next: &BagReducer<NodeId>,
    newdist: u32,
    distances: &[AtomicU32],
    graph: &Graph,
) {
    if let Some(pennant) = bag.split() {
        rayon::join(
            || walk_pennant(pennant, next, newdist, distances, graph),
            || walk_bag(bag, next, newdist, distances, graph),
        );
    } else {
        bag.filling()
            .par_chunks(THRESHOLD)
            .for_each(|nodes| proc_nodes(nodes, next, newdist, distances, graph));
    }
}

/// Walks both subtrees in parallel with the root's own block; the pennant
/// is freed once all three are done.
fn walk_pennant(
    mut pennant: Box<Pennant<NodeId>>,
    next: &BagReducer<NodeId>,
    newdist: u32,
    distances: &[AtomicU32],
    graph: &Graph,
) {
    let left = pennant.take_left();
    let right = pennant.take_right();
    rayon::scope(|scope| {
        if let Some(left) = left {
            scope.spawn(move |_| walk_pennant(left, next, newdist, distances, graph));
        }
        if let Some(right) = right {
            scope.spawn(move |_| walk_pennant(right, next, newdist, distances, graph));
        }
        pennant
            .elements()
            .par_chunks(THRESHOLD)
            .for_each(|nodes| proc_nodes(nodes, next, newdist, distances, graph));
    });
}

/// Scans the successors of a slice of frontier nodes, claiming untouched
/// neighbors for the next level.
fn proc_nodes(
    nodes: &[NodeId],
    next: &BagReducer<NodeId>,
    newdist: u32,
    distances: &[AtomicU32],
    graph: &Graph,
) {
    // One borrow of the local view for the whole slice; nothing in the
    // loop can suspend or reenter the scheduler.
    let mut view = next.view().borrow_mut();
    for &node in nodes {
        for &succ in graph.successors(node) {
            if newdist < distances[succ].load(Ordering::Relaxed) {
                view.insert(succ);
                distances[succ].store(newdist, Ordering::Relaxed);
            }
        }
    }
}

/// Views an exclusively borrowed distance array as atomics.
fn as_atomic(distances: &mut [u32]) -> &[AtomicU32] {
    // SAFETY: AtomicU32 has the same in-memory representation as u32, and
    // the exclusive borrow rules out concurrent non-atomic access for the
    // lifetime of the returned view.
    unsafe { &*(distances as *mut [u32] as *const [AtomicU32]) }
}
