//! This module provides a source wrapper counting how often it is pulled.

use std::cell::Cell;
use std::rc::Rc;

/// [`Tracked<I>`] forwards the elements of `I` while counting the pulls.
///
/// The count is read through the [`Pulls`]-handle returned alongside, which stays usable after the
/// [`Tracked`] has been moved into a traversal.
#[derive(Debug)]
pub struct Tracked<I> {
    /// wrapped source
    inner: I,
    /// shared pull counter
    pulls: Rc<Cell<usize>>,
}

/// [`Pulls`] reads the counter of a [`Tracked`] source.
#[derive(Debug, Clone)]
pub struct Pulls(Rc<Cell<usize>>);

impl Pulls {
    /// The number of times the source has been pulled, exhausted pulls included.
    pub fn get(&self) -> usize {
        self.0.get()
    }
}

impl<I: Iterator> Tracked<I> {
    /// Wrap `source` and return it together with a handle on its pull counter.
    ///
    /// # Examples
    ///
    /// ```
    /// use stepseq::sources::Tracked;
    /// use stepseq::IntoSeq;
    ///
    /// let (naturals, pulls) = Tracked::new(0..);
    ///
    /// assert!(naturals.seq().any(|n| *n == 3));
    /// assert_eq!(pulls.get(), 4);
    /// ```
    pub fn new<S>(source: S) -> (Self, Pulls)
    where
        S: IntoIterator<IntoIter = I>,
    {
        let pulls = Rc::new(Cell::new(0));
        let tracked = Tracked {
            inner: source.into_iter(),
            pulls: Rc::clone(&pulls),
        };
        (tracked, Pulls(pulls))
    }
}

impl<I: Iterator> Iterator for Tracked<I> {
    type Item = I::Item;

    /// Count the pull, then forward it.
    fn next(&mut self) -> Option<I::Item> {
        self.pulls.set(self.pulls.get() + 1);
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}
