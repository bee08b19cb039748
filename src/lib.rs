//! stepseq is a lazy, single-pass sequence combinator engine whose every traversal is driven by a small control protocol: the [`StepAction`].
//!
//! ## Design
//!
//! The idea is to split every traversal of a sequence into two parts:
//! One part (the operation) looks at one source element and decides what should happen with it by returning a [`StepAction`].
//! Another part (the [driving engine](`engine::Iterate`)) pulls elements from the source, calls the operation and interprets the returned actions.
//! Combining operations in various ways allows to express `map`, `filter`, `take_while`, `first`, `any`, `all`, ... as one and the same loop, so that they all share the same ordering and short-circuiting behavior.
//!
//! The following graphic illustrates how one step of the engine works:
//!
//! <pre>
//!  source: e0--e1--e2--...
//!          |
//!          | operation(e0, 0)
//!          v
//!  Aggregate([Push(a), Push(b), Stop(r)])
//!          |
//!          | flatten (depth-first, in order)
//!          v
//!  Push(a) --> yield a
//!  Push(b) --> yield b
//!  Stop(r) --> complete with r, never pull e1
//! </pre>
//!
//! Before the first element a pre-hook and after the last element a post-hook get the same treatment.
//! If nothing ever stops, the traversal completes with a fallback value.
//!
//! The same operation shape serves two kinds of call sites:
//! - building a new lazy sequence ([`create_new`](`adapters::create_new`)), where pushed values are the output and the terminal value is usually `()`,
//! - computing a single result ([`get_result`](`adapters::get_result`)), where the first [`Stop`](`StepAction::Stop`) is the answer.
//!
//! ## Usage
//!
//! Most of the time you just want the [`Seq`]-wrapper which offers the usual combinators on top of the engine.
//! Wrap any [`IntoIterator`] with [`Seq::new`] or the [`seq`](`IntoSeq::seq`)-method and chain away.
//! To write your own traversal, return [`StepAction`]s from a closure and hand it to [`create_new`](`adapters::create_new`) or [`get_result`](`adapters::get_result`).
//!
//! # Examples
//!
//! Taking numbers while they are small, inclusive of the first one that is not:
//!
//! ```
//! use stepseq::IntoSeq;
//!
//! let small: Vec<u64> = (0..).seq().continue_if(|n| *n < 5).to_list();
//!
//! assert_eq!(small, vec![0, 1, 2, 3, 4, 5]);
//! ```
//!
//! Writing a traversal directly against the engine, duplicating even numbers and stopping at the first `0`:
//!
//! ```
//! use stepseq::adapters::create_new;
//! use stepseq::StepAction;
//!
//! let doubled: Vec<u8> = create_new(
//!     [1, 2, 3, 0, 4],
//!     |n: u8, _| match n {
//!         0 => StepAction::stop(()),
//!         n if n % 2 == 0 => StepAction::aggregate([StepAction::push(n), StepAction::push(n)]),
//!         n => StepAction::push(n),
//!     },
//!     (),
//! )
//! .collect();
//!
//! assert_eq!(doubled, vec![1, 2, 2, 3]);
//! ```

pub mod adapters;

pub mod combinators;

pub mod engine;

pub mod error;

pub mod flatten;

pub mod sources;

pub use combinators::{IntoSeq, Seq};
pub use engine::{Iterate, Step};
pub use error::{Error, Result};
pub use flatten::Nested;

use flatten::Flatten;

/// [`StepAction<V, R>`] tells the driving engine what to do after one step of iteration.
///
/// `V` is the type of values pushed to the output sequence, `R` the type of the terminal value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StepAction<V, R> {
    /// Produce nothing and continue.
    Skip,
    /// Emit the value into the output sequence and continue.
    Push(V),
    /// Terminate iteration now; the value becomes the terminal value of the traversal.
    Stop(R),
    /// A composite of actions which are carried out in order.
    /// It is never acted upon itself but expanded by [`leaves`](`StepAction::leaves`).
    Aggregate(Vec<StepAction<V, R>>),
}

impl<V, R> StepAction<V, R> {
    /// The same as [`StepAction::Skip`].
    #[inline]
    pub const fn skip() -> Self {
        StepAction::Skip
    }

    /// The same as [`StepAction::Push`].
    #[inline]
    pub const fn push(v: V) -> Self {
        StepAction::Push(v)
    }

    /// The same as [`StepAction::Stop`].
    #[inline]
    pub const fn stop(r: R) -> Self {
        StepAction::Stop(r)
    }

    /// The same as [`StepAction::Aggregate`] but collecting the actions from anything iterable.
    #[inline]
    pub fn aggregate<A>(actions: A) -> Self
    where
        A: IntoIterator<Item = Self>,
    {
        StepAction::Aggregate(actions.into_iter().collect())
    }

    /// Whether `self` is anything but an [`Aggregate`](`StepAction::Aggregate`).
    #[inline]
    pub fn is_leaf(&self) -> bool {
        !matches!(self, StepAction::Aggregate(_))
    }

    /// Expand `self` into the leaf actions it consists of, depth-first and in order.
    ///
    /// An empty aggregate expands to nothing, that is, it behaves like [`StepAction::Skip`].
    ///
    /// # Examples
    ///
    /// ```
    /// use stepseq::StepAction;
    ///
    /// let action: StepAction<u8, ()> = StepAction::aggregate([
    ///     StepAction::push(1),
    ///     StepAction::aggregate([StepAction::push(2), StepAction::aggregate([])]),
    ///     StepAction::stop(()),
    /// ]);
    ///
    /// let leaves: Vec<_> = action.leaves().collect();
    /// assert_eq!(leaves, vec![StepAction::push(1), StepAction::push(2), StepAction::stop(())]);
    /// ```
    pub fn leaves(self) -> Leaves<V, R> {
        flatten::flatten(
            self,
            None,
            Self::is_leaf as fn(&Self) -> bool,
            Self::into_children as fn(Self) -> Vec<Self>,
        )
    }

    fn into_children(self) -> Vec<Self> {
        match self {
            StepAction::Aggregate(children) => children,
            _ => Vec::new(),
        }
    }
}

impl<V> StepAction<V, ()> {
    /// Push a last value, then stop.
    #[inline]
    pub fn push_last(v: V) -> Self {
        StepAction::Aggregate(vec![StepAction::Push(v), StepAction::Stop(())])
    }
}

/// [`Leaves<V, R>`] is the iterator over the leaf actions of a [`StepAction<V, R>`].
pub type Leaves<V, R> = Flatten<
    StepAction<V, R>,
    Vec<StepAction<V, R>>,
    fn(&StepAction<V, R>) -> bool,
    fn(StepAction<V, R>) -> Vec<StepAction<V, R>>,
>;

#[cfg(test)]
mod tests {
    use super::*;

    type Action = StepAction<u8, &'static str>;

    #[test]
    fn test_constructors() {
        assert!(matches!(Action::skip(), StepAction::Skip));
        assert!(matches!(Action::push(1), StepAction::Push(1)));
        assert!(matches!(Action::stop("done"), StepAction::Stop("done")));
        assert!(matches!(
            Action::aggregate([Action::skip()]),
            StepAction::Aggregate(_)
        ));
    }

    #[test]
    fn test_push_last() {
        let leaves: Vec<_> = StepAction::push_last('z').leaves().collect();
        assert_eq!(leaves, vec![StepAction::Push('z'), StepAction::Stop(())]);
    }

    #[test]
    fn test_leaves_of_leaf() {
        let leaves: Vec<_> = Action::push(3).leaves().collect();
        assert_eq!(leaves, vec![Action::push(3)]);
    }

    #[test]
    fn test_leaves_empty_aggregate() {
        assert_eq!(Action::aggregate([]).leaves().count(), 0);
    }

    #[test]
    fn test_leaves_order() {
        let action = Action::aggregate([
            Action::aggregate([Action::push(1), Action::aggregate([Action::push(2)])]),
            Action::skip(),
            Action::aggregate([Action::push(3), Action::stop("end")]),
        ]);

        let leaves: Vec<_> = action.leaves().collect();
        assert_eq!(
            leaves,
            vec![
                Action::push(1),
                Action::push(2),
                Action::skip(),
                Action::push(3),
                Action::stop("end"),
            ]
        );
        assert!(leaves.iter().all(StepAction::is_leaf));
    }
}
