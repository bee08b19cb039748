//! This module implements the driving engine, the loop every traversal of this crate runs on.
//!
//! The engine is an explicit state machine ([`Iterate`]): each [`resume`](`Iterate::resume`) either yields a value
//! or completes with the terminal value of the traversal, see [`Step`].

use super::{Leaves, StepAction};

use log::trace;

use std::iter::FusedIterator;
use std::mem;

/// Result of resuming the engine: either a value for the output sequence or the terminal value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step<Y, D> {
    /// A pushed value; the traversal can be resumed.
    Yielded(Y),
    /// The traversal is over and this is its terminal value.
    Complete(D),
}

impl<Y, D> Step<Y, D> {
    /// Returns `true` if the step is [`Yielded`](`Step::Yielded`).
    #[inline]
    pub const fn is_yielded(&self) -> bool {
        matches!(self, Step::Yielded(_))
    }

    /// Returns `true` if the step is [`Complete`](`Step::Complete`).
    #[inline]
    pub const fn is_complete(&self) -> bool {
        matches!(self, Step::Complete(_))
    }

    /// The yielded value, if any.
    #[inline]
    pub fn yielded_value(self) -> Option<Y> {
        match self {
            Step::Yielded(y) => Some(y),
            Step::Complete(_) => None,
        }
    }

    /// The terminal value, if any.
    #[inline]
    pub fn complete_value(self) -> Option<D> {
        match self {
            Step::Yielded(_) => None,
            Step::Complete(d) => Some(d),
        }
    }
}

/// [`PreHook<I, V, R>`] is the type of the default pre-hook which does nothing.
pub type PreHook<I, V, R> = fn(&mut I) -> StepAction<V, R>;

/// [`PostHook<V, R>`] is the type of the default post-hook which does nothing.
pub type PostHook<V, R> = fn(usize) -> StepAction<V, R>;

fn skip_pre<I, V, R>(_: &mut I) -> StepAction<V, R> {
    StepAction::Skip
}

fn skip_post<V, R>(_: usize) -> StepAction<V, R> {
    StepAction::Skip
}

enum State<I, R> {
    /// pre-hook not run yet
    Fresh { source: I, fallback: R },
    Running { source: I, fallback: R },
    /// source exhausted, post-hook actions may be pending
    Draining { fallback: R },
    Complete(R),
    Exhausted,
}

/// [`Iterate`] drives one traversal of a source.
/// - `I` is the source iterator.
/// - `F` is the operation called with every source element and its index.
/// - `Pre` is the hook run once before the source is touched.
/// - `Post` is the hook run once after the source is exhausted, with the number of elements pulled.
/// - `V` is the type of pushed values, `R` the type of the terminal value.
///
/// Whatever the operation or a hook returns is flattened into leaf actions which are interpreted in order:
/// [`Push`](`StepAction::Push`) yields, [`Skip`](`StepAction::Skip`) does nothing and [`Stop`](`StepAction::Stop`) completes the traversal at once.
/// After a stop the source is never pulled again.
/// If the traversal runs out of source and hooks without stopping, it completes with the fallback value.
///
/// As an [`Iterator`], [`Iterate`] yields the pushed values; the terminal value is kept and can be read
/// afterwards with [`return_value`](`Iterate::return_value`) or [`into_return`](`Iterate::into_return`).
pub struct Iterate<I, F, Pre, Post, V, R> {
    state: State<I, R>,
    operation: F,
    pre_hook: Option<Pre>,
    post_hook: Option<Post>,
    pending: Option<Leaves<V, R>>,
    index: usize,
}

impl<I, F, V, R> Iterate<I, F, PreHook<I, V, R>, PostHook<V, R>, V, R>
where
    I: Iterator,
    F: FnMut(I::Item, usize) -> StepAction<V, R>,
{
    /// Set up a traversal without hooks.
    /// - `source` is the sequence to traverse.
    /// - `operation` decides what to do with each element.
    /// - `fallback` is the terminal value if nothing stops the traversal.
    ///
    /// Nothing is pulled from `source` before the first resume.
    ///
    /// # Examples
    ///
    /// Summing numbers until the first negative one:
    ///
    /// ```
    /// use stepseq::{Iterate, StepAction};
    ///
    /// let mut sum = 0;
    /// let negative = Iterate::new(
    ///     [1, 2, -3, 4],
    ///     |n: i32, _| {
    ///         if n < 0 {
    ///             return StepAction::<(), _>::stop(Some(n));
    ///         }
    ///         sum += n;
    ///         StepAction::skip()
    ///     },
    ///     None,
    /// )
    /// .finish();
    ///
    /// assert_eq!(negative, Some(-3));
    /// assert_eq!(sum, 3);
    /// ```
    pub fn new<S>(source: S, operation: F, fallback: R) -> Self
    where
        S: IntoIterator<IntoIter = I>,
    {
        Iterate {
            state: State::Fresh {
                source: source.into_iter(),
                fallback,
            },
            operation,
            pre_hook: Some(skip_pre as PreHook<I, V, R>),
            post_hook: Some(skip_post as PostHook<V, R>),
            pending: None,
            index: 0,
        }
    }
}

impl<I, F, Pre, Post, V, R> Iterate<I, F, Pre, Post, V, R> {
    /// Replace the pre-hook. It is called with the source before the first element is pulled.
    ///
    /// Has no effect once the traversal has been resumed.
    pub fn pre_hook<P>(self, hook: P) -> Iterate<I, F, P, Post, V, R>
    where
        P: FnOnce(&mut I) -> StepAction<V, R>,
    {
        let started = self.pre_hook.is_none();
        Iterate {
            state: self.state,
            operation: self.operation,
            pre_hook: (!started).then_some(hook),
            post_hook: self.post_hook,
            pending: self.pending,
            index: self.index,
        }
    }

    /// Replace the post-hook. It is called with the number of pulled elements once the source is exhausted.
    pub fn post_hook<P>(self, hook: P) -> Iterate<I, F, Pre, P, V, R>
    where
        P: FnOnce(usize) -> StepAction<V, R>,
    {
        let ran = self.post_hook.is_none();
        Iterate {
            state: self.state,
            operation: self.operation,
            pre_hook: self.pre_hook,
            post_hook: (!ran).then_some(hook),
            pending: self.pending,
            index: self.index,
        }
    }

    /// The number of elements pulled from the source so far.
    pub fn pulled(&self) -> usize {
        self.index
    }

    /// Check if the traversal has completed (and its terminal value is kept).
    pub fn is_complete(&self) -> bool {
        matches!(self.state, State::Complete(_))
    }

    /// Get a reference to the terminal value if complete.
    pub fn return_value(&self) -> Option<&R> {
        match &self.state {
            State::Complete(r) => Some(r),
            _ => None,
        }
    }

    /// Consume the traversal and return the terminal value if complete.
    ///
    /// Returns `None` if the traversal hasn't completed yet.
    pub fn into_return(self) -> Option<R> {
        match self.state {
            State::Complete(r) => Some(r),
            _ => None,
        }
    }
}

impl<I, F, Pre, Post, V, R> Iterate<I, F, Pre, Post, V, R>
where
    I: Iterator,
    F: FnMut(I::Item, usize) -> StepAction<V, R>,
    Pre: FnOnce(&mut I) -> StepAction<V, R>,
    Post: FnOnce(usize) -> StepAction<V, R>,
{
    /// Run the traversal until the next pushed value or its completion.
    ///
    /// Returns `None` once a [`Step::Complete`] has been handed out (or kept by the [`Iterator`]-implementation).
    ///
    /// # Panics
    ///
    /// A panic may occur if the operation or one of the hooks panics.
    pub fn resume(&mut self) -> Option<Step<V, R>> {
        loop {
            if let Some(leaf) = self.pending.as_mut().and_then(Iterator::next) {
                match leaf {
                    StepAction::Skip => continue,
                    StepAction::Push(v) => return Some(Step::Yielded(v)),
                    StepAction::Stop(r) => {
                        trace!("traversal stopped after pulling {} element(s)", self.index);
                        self.pending = None;
                        // Dropping the source here guarantees it is never pulled again.
                        self.state = State::Exhausted;
                        return Some(Step::Complete(r));
                    }
                    StepAction::Aggregate(_) => unreachable!("aggregate action left after flattening"),
                }
            }
            self.pending = None;

            match mem::replace(&mut self.state, State::Exhausted) {
                State::Fresh {
                    mut source,
                    fallback,
                } => {
                    if let Some(hook) = self.pre_hook.take() {
                        self.pending = Some(hook(&mut source).leaves());
                    }
                    self.state = State::Running { source, fallback };
                }
                State::Running {
                    mut source,
                    fallback,
                } => match source.next() {
                    Some(element) => {
                        let index = self.index;
                        self.index += 1;
                        self.pending = Some((self.operation)(element, index).leaves());
                        self.state = State::Running { source, fallback };
                    }
                    None => {
                        trace!("source exhausted after {} element(s)", self.index);
                        if let Some(hook) = self.post_hook.take() {
                            self.pending = Some(hook(self.index).leaves());
                        }
                        self.state = State::Draining { fallback };
                    }
                },
                State::Draining { fallback } => return Some(Step::Complete(fallback)),
                State::Complete(r) => {
                    self.state = State::Complete(r);
                    return None;
                }
                State::Exhausted => return None,
            }
        }
    }

    /// Drive the traversal to its end, discarding pushed values, and return the terminal value.
    ///
    /// # Panics
    ///
    /// A panic may occur if the operation or one of the hooks panics, if the traversal was
    /// abandoned half-way by an earlier panic, or if [`resume`](`Iterate::resume`) already handed out
    /// the terminal value as [`Step::Complete`].
    pub fn finish(mut self) -> R {
        loop {
            match self.resume() {
                Some(Step::Yielded(_)) => continue,
                Some(Step::Complete(r)) => return r,
                None => {
                    return match self.state {
                        State::Complete(r) => r,
                        _ => panic!("terminal value already handed out by resume"),
                    }
                }
            }
        }
    }
}

impl<I, F, Pre, Post, V, R> Iterator for Iterate<I, F, Pre, Post, V, R>
where
    I: Iterator,
    F: FnMut(I::Item, usize) -> StepAction<V, R>,
    Pre: FnOnce(&mut I) -> StepAction<V, R>,
    Post: FnOnce(usize) -> StepAction<V, R>,
{
    type Item = V;

    fn next(&mut self) -> Option<V> {
        match self.resume()? {
            Step::Yielded(v) => Some(v),
            Step::Complete(r) => {
                self.state = State::Complete(r);
                None
            }
        }
    }
}

impl<I, F, Pre, Post, V, R> FusedIterator for Iterate<I, F, Pre, Post, V, R>
where
    I: Iterator,
    F: FnMut(I::Item, usize) -> StepAction<V, R>,
    Pre: FnOnce(&mut I) -> StepAction<V, R>,
    Post: FnOnce(usize) -> StepAction<V, R>,
{
}

#[cfg(test)]
mod tests {
    use super::*;

    type Action = StepAction<u32, &'static str>;

    fn push_all(n: u32, _: usize) -> Action {
        StepAction::push(n)
    }

    #[test]
    fn test_step() {
        let y: Step<u8, ()> = Step::Yielded(1);
        let d: Step<u8, ()> = Step::Complete(());
        assert!(y.is_yielded() && !y.is_complete());
        assert!(d.is_complete() && !d.is_yielded());
        assert_eq!(y.yielded_value(), Some(1));
        assert_eq!(d.complete_value(), Some(()));
    }

    #[test]
    fn test_resume() {
        let mut it = Iterate::new([1, 2], push_all, "fallback");
        assert_eq!(it.resume(), Some(Step::Yielded(1)));
        assert_eq!(it.resume(), Some(Step::Yielded(2)));
        assert_eq!(it.resume(), Some(Step::Complete("fallback")));
        assert_eq!(it.resume(), None);
    }

    #[test]
    fn test_iterator_keeps_return() {
        let mut it = Iterate::new([1, 2], push_all, "fallback");
        assert_eq!(it.return_value(), None);
        assert_eq!((&mut it).collect::<Vec<_>>(), vec![1, 2]);
        assert!(it.is_complete());
        assert_eq!(it.next(), None);
        assert_eq!(it.into_return(), Some("fallback"));
    }

    #[test]
    fn test_stop() {
        let mut it = Iterate::new(
            0..,
            |n: u32, _| {
                if n == 3 {
                    Action::aggregate([Action::push(n), Action::stop("three"), Action::push(99)])
                } else {
                    Action::skip()
                }
            },
            "never",
        );
        assert_eq!((&mut it).collect::<Vec<_>>(), vec![3]);
        assert_eq!(it.pulled(), 4);
        assert_eq!(it.return_value(), Some(&"three"));
    }

    #[test]
    fn test_index_counts_source_elements() {
        let mut indices = Vec::new();
        let pushed: Vec<u32> = Iterate::new(
            [10, 20, 30],
            |n: u32, i| {
                indices.push(i);
                Action::aggregate([Action::push(n), Action::push(n + 1)])
            },
            "",
        )
        .collect();
        assert_eq!(pushed, vec![10, 11, 20, 21, 30, 31]);
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_pre_hook_push() {
        let pushed: Vec<u32> = Iterate::new([2, 3], push_all, "")
            .pre_hook(|_| Action::aggregate([Action::push(0), Action::push(1)]))
            .collect();
        assert_eq!(pushed, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_pre_hook_stop_never_pulls() {
        let mut pulled = false;
        let source = std::iter::from_fn(|| {
            pulled = true;
            Some(1)
        });
        let r = Iterate::new(source, push_all, "fallback")
            .pre_hook(|_| Action::stop("early"))
            .finish();
        assert_eq!(r, "early");
        assert!(!pulled);
    }

    #[test]
    fn test_pre_hook_sees_source() {
        let pushed: Vec<u32> = Iterate::new([1, 2, 3], push_all, "")
            .pre_hook(|source| {
                // Consume the first element before the operation sees anything.
                source.next();
                Action::skip()
            })
            .collect();
        assert_eq!(pushed, vec![2, 3]);
    }

    #[test]
    fn test_post_hook_count() {
        let pushed: Vec<u32> = Iterate::new([5, 6, 7], push_all, "")
            .post_hook(|count| Action::push(count as u32 * 100))
            .collect();
        assert_eq!(pushed, vec![5, 6, 7, 300]);
    }

    #[test]
    fn test_post_hook_empty_source() {
        let mut seen = None;
        let r = Iterate::new(std::iter::empty(), push_all, "fallback")
            .post_hook(|count| {
                seen = Some(count);
                Action::skip()
            })
            .finish();
        assert_eq!(r, "fallback");
        assert_eq!(seen, Some(0));
    }

    #[test]
    fn test_post_hook_stop() {
        let r = Iterate::new([1], push_all, "fallback")
            .post_hook(|_| Action::stop("post"))
            .finish();
        assert_eq!(r, "post");
    }

    #[test]
    fn test_post_hook_skipped_after_stop() {
        let mut ran = false;
        let r = Iterate::new([1, 2], |_: u32, _| Action::stop("op"), "fallback")
            .post_hook(|_| {
                ran = true;
                Action::skip()
            })
            .finish();
        assert_eq!(r, "op");
        assert!(!ran);
    }

    #[test]
    fn test_finish_after_iteration() {
        let mut it = Iterate::new([1, 2], push_all, "fallback");
        assert_eq!(it.next(), Some(1));
        assert_eq!(it.finish(), "fallback");
    }

    #[test]
    #[should_panic(expected = "terminal value already handed out by resume")]
    fn test_finish_after_complete_step() {
        let mut it = Iterate::new(Vec::<u32>::new(), push_all, "fallback");
        assert_eq!(it.resume(), Some(Step::Complete("fallback")));
        it.finish();
    }

    #[test]
    #[should_panic]
    fn test_operation_panic_propagates() {
        Iterate::new([1], |_: u32, _| -> Action { panic!() }, "").finish();
    }
}
