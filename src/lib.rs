// Copyright (C) 2025  The Software Heritage developers
// See the AUTHORS file at the top-level directory of this distribution
// License: GNU General Public License version 3, or any later version
// See top-level LICENSE file for more information

#![doc = include_str!("../README.md")]

use thiserror::Error;

pub mod collections;
pub mod graph;

mod bfs;
pub use bfs::bfs;

mod pbfs;
pub use pbfs::pbfs;

/// Distance assigned to nodes the traversal never reached.
pub const UNREACHED: u32 = u32::MAX;

/// Returned by [`bfs`] and [`pbfs`] when the source node is past the number
/// of nodes in the graph. The distance array is left untouched.
#[derive(Error, Debug, PartialEq, Eq, Hash, Clone)]
#[error("source node {index} out of {len} nodes")]
pub struct OutOfBoundError {
    /// Source node that was requested
    pub index: usize,
    /// Number of nodes in the graph (maximum source + 1)
    pub len: usize,
}
