// Copyright (C) 2025  The Software Heritage developers
// See the AUTHORS file at the top-level directory of this distribution
// License: GNU General Public License version 3, or any later version
// See top-level LICENSE file for more information

//! Per-worker bag views, reduced by merging.

use std::cell::RefCell;

use thread_local::ThreadLocal;

use super::Bag;

/// A [`Bag`] with one view per worker thread.
///
/// The bag is a commutative monoid on the multiset of its elements: the
/// empty bag is the identity and [`Bag::merge`] the combine operation. A
/// `BagReducer` exploits this to let parallel workers insert through a
/// shared reference with no synchronization at all. Each worker gets its
/// own lazily created view; [`take`](BagReducer::take) folds the views
/// back into a single bag once the parallel phase has joined.
///
/// Bag operations on a view are sequential and must not reenter the
/// scheduler: a view's [`RefCell`] stays borrowed for the duration of each
/// operation, and a task stolen onto the same worker would trip the borrow
/// check.
pub struct BagReducer<T: Send> {
    views: ThreadLocal<RefCell<Bag<T>>>,
}

impl<T: Send> BagReducer<T> {
    /// Creates a reducer holding no elements.
    pub fn new() -> Self {
        BagReducer {
            views: ThreadLocal::new(),
        }
    }

    /// The calling worker's view, created empty on first access.
    #[inline(always)]
    pub fn view(&self) -> &RefCell<Bag<T>> {
        self.views.get_or(|| RefCell::new(Bag::new()))
    }

    /// Inserts into the calling worker's view.
    #[inline(always)]
    pub fn insert(&self, el: T) {
        self.view().borrow_mut().insert(el);
    }

    /// Merges all views into one bag, leaving the reducer empty.
    ///
    /// Must only be called after every parallel task inserting into the
    /// reducer has joined.
    pub fn take(&mut self) -> Bag<T> {
        let views = std::mem::take(&mut self.views);
        let mut merged = Bag::new();
        for view in views {
            merged.merge(view.into_inner());
        }
        merged
    }

    /// Drops all views and their contents.
    pub fn clear(&mut self) {
        self.views.clear();
    }
}

impl<T: Send> Default for BagReducer<T> {
    fn default() -> Self {
        Self::new()
    }
}
