// Copyright (C) 2025  The Software Heritage developers
// See the AUTHORS file at the top-level directory of this distribution
// License: GNU General Public License version 3, or any later version
// See top-level LICENSE file for more information

//! Data structures for parallel frontier management

mod bag;
pub use bag::*;

mod reducer;
pub use reducer::*;
