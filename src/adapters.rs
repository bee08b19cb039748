//! This module defines the two ways of running the engine and the helpers to write operations for them.
//!
//! - [`create_new`] builds a new lazy sequence: pushed values are the output.
//! - [`get_result`] computes a single value: the first [`Stop`](`StepAction::Stop`) is the answer.
//!
//! Operations which compute a plain value instead of a [`StepAction`] are lifted with
//! [`push_adapter`] (every value is pushed) or [`stop_adapter`] (the first `Some` stops).

use super::engine::{Iterate, PostHook, PreHook};
use super::StepAction;

/// Start a traversal producing a new lazy sequence.
/// - `source` is the sequence to traverse.
/// - `operation` decides what to do with each element and its index.
/// - `fallback` is the terminal value if nothing stops.
///
/// Hooks can be attached to the result with [`pre_hook`](`Iterate::pre_hook`) and [`post_hook`](`Iterate::post_hook`).
///
/// # Examples
///
/// Numbering words:
///
/// ```
/// use stepseq::adapters::create_new;
/// use stepseq::StepAction;
///
/// let numbered: Vec<String> = create_new(
///     ["a", "b"],
///     |w: &str, i| StepAction::<_, ()>::push(format!("{i}:{w}")),
///     (),
/// )
/// .collect();
///
/// assert_eq!(numbered, vec!["0:a", "1:b"]);
/// ```
pub fn create_new<S, F, V, R>(
    source: S,
    operation: F,
    fallback: R,
) -> Iterate<S::IntoIter, F, PreHook<S::IntoIter, V, R>, PostHook<V, R>, V, R>
where
    S: IntoIterator,
    F: FnMut(S::Item, usize) -> StepAction<V, R>,
{
    Iterate::new(source, operation, fallback)
}

/// Traverse `source` for a single terminal value.
/// - `source` is the sequence to traverse.
/// - `operation` decides what to do with each element and its index.
/// - `fallback` is returned if nothing stops.
///
/// Pushed values are discarded.
///
/// # Examples
///
/// Finding the first word longer than three characters:
///
/// ```
/// use stepseq::adapters::{get_result, stop_adapter};
///
/// let long = get_result(
///     ["to", "be", "or", "never"],
///     stop_adapter::<&str, (), _, _>(|w, _| (w.len() > 3).then_some(Some(w))),
///     None,
/// );
///
/// assert_eq!(long, Some("never"));
/// ```
pub fn get_result<S, F, V, R>(source: S, operation: F, fallback: R) -> R
where
    S: IntoIterator,
    F: FnMut(S::Item, usize) -> StepAction<V, R>,
{
    create_new(source, operation, fallback).finish()
}

/// Lift an operation computing a plain value into one pushing that value.
pub fn push_adapter<T, V, R, F>(mut f: F) -> impl FnMut(T, usize) -> StepAction<V, R>
where
    F: FnMut(T, usize) -> V,
{
    move |element, index| StepAction::Push(f(element, index))
}

/// Lift an operation computing an optional value into one stopping with the value if there is one and skipping otherwise.
pub fn stop_adapter<T, V, R, F>(mut f: F) -> impl FnMut(T, usize) -> StepAction<V, R>
where
    F: FnMut(T, usize) -> Option<R>,
{
    move |element, index| match f(element, index) {
        Some(r) => StepAction::Stop(r),
        None => StepAction::Skip,
    }
}

/// Turn a closure taking a count as its first argument into one counting its own calls, starting at `0`.
///
/// Every call site gets its own counter.
///
/// # Examples
///
/// ```
/// use stepseq::adapters::with_count;
///
/// let mut label = with_count(|i, name: &str| format!("{name}#{i}"));
///
/// assert_eq!(label("x"), "x#0");
/// assert_eq!(label("y"), "y#1");
/// ```
pub fn with_count<T, O, F>(mut f: F) -> impl FnMut(T) -> O
where
    F: FnMut(usize, T) -> O,
{
    let mut count = 0;
    move |x| {
        let o = f(count, x);
        count += 1;
        o
    }
}
