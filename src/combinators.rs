//! This module defines [`Seq`], a wrapper around a single-use source offering combinators on top of the engine.
//!
//! Every derivation and terminal operation is expressed through [`create_new`] or [`get_result`], never through
//! a loop of its own. Thus they all share the same ordering and short-circuiting behavior: output order is
//! source order and once a combinator is done, the source is not pulled any further.
//!
//! Creators and [`concat_with`](`Seq::concat_with`) only plumb sources together and never run the engine.
//!
//! A [`Seq`] owns its source and all combinators consume `self`, so a source cannot be driven twice by accident.

use super::adapters::{create_new, get_result, push_adapter, stop_adapter, with_count};
use super::engine::{Iterate, PostHook, PreHook};
use super::error::{Error, Result};
use super::flatten::{flatten, flatten_nested, Nested};
use super::StepAction;

use indexmap::IndexMap;
use log::debug;

use std::collections::HashSet;
use std::hash::Hash;
use std::iter;
use std::iter::StepBy;
use std::ops::Range;

/// [`Derived<I, F, V>`] is the source type of a [`Seq`] obtained from an operation on `I`.
type Derived<I, F, V> = Iterate<I, F, PreHook<I, V, ()>, PostHook<V, ()>, V, ()>;

/// [`Seq<I>`] wraps a source iterator `I` to offer combinators on it.
///
/// Transforming combinators return a new [`Seq`] (lazily), terminal ones drive the source and return a value.
/// As a [`Seq`] is an [`Iterator`] itself, it can also simply be iterated.
///
/// # Examples
///
/// ```
/// use stepseq::Seq;
///
/// let words = Seq::new(["nginx", "certbot", "docker", "nginx"])
///     .remove_values(["docker"])
///     .map(str::to_uppercase)
///     .to_list();
///
/// assert_eq!(words, vec!["NGINX", "CERTBOT", "NGINX"]);
/// ```
#[derive(Debug, Clone)]
pub struct Seq<I> {
    source: I,
}

/// Wrap anything iterable into a [`Seq`].
pub trait IntoSeq: IntoIterator + Sized {
    /// The same as [`Seq::new`] but in method position.
    fn seq(self) -> Seq<Self::IntoIter> {
        Seq::new(self)
    }
}

impl<S: IntoIterator> IntoSeq for S {}

impl<I: Iterator> Iterator for Seq<I> {
    type Item = I::Item;

    #[inline]
    fn next(&mut self) -> Option<I::Item> {
        self.source.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.source.size_hint()
    }
}

impl<T> Seq<iter::Empty<T>> {
    /// Create a sequence without elements.
    pub fn empty() -> Self {
        Seq::new(iter::empty())
    }
}

impl<A> Seq<Range<A>>
where
    Range<A>: Iterator,
{
    /// Create a sequence counting through `range`.
    pub fn range(range: Range<A>) -> Self {
        Seq::new(range)
    }
}

impl<A> Seq<StepBy<Range<A>>>
where
    Range<A>: Iterator,
{
    /// Create a sequence counting through `range` in steps of `step`, starting at its start.
    ///
    /// Fails at once if `step` is `0`.
    ///
    /// # Examples
    ///
    /// ```
    /// use stepseq::Seq;
    ///
    /// let even = Seq::range_step(0..9, 2)?.to_list();
    ///
    /// assert_eq!(even, vec![0, 2, 4, 6, 8]);
    /// # Ok::<(), stepseq::Error>(())
    /// ```
    pub fn range_step(range: Range<A>, step: usize) -> Result<Self> {
        if step == 0 {
            debug!("range_step rejected: step is 0");
            return Err(Error::ZeroStep);
        }
        Ok(Seq::new(range.step_by(step)))
    }
}

impl<T> Seq<std::vec::IntoIter<T>> {
    /// Create a sequence of the given values, in order.
    pub fn unite<S>(values: S) -> Self
    where
        S: IntoIterator<Item = T>,
    {
        Seq::new(values.into_iter().collect::<Vec<_>>())
    }
}

impl<J> Seq<iter::Flatten<J>>
where
    J: Iterator,
    J::Item: IntoIterator,
{
    /// Create a sequence running through each of `sources` in turn.
    ///
    /// # Examples
    ///
    /// ```
    /// use stepseq::Seq;
    ///
    /// let all: Vec<u8> = Seq::concat([vec![1, 2], vec![], vec![3]]).to_list();
    ///
    /// assert_eq!(all, vec![1, 2, 3]);
    /// ```
    pub fn concat<S>(sources: S) -> Self
    where
        S: IntoIterator<IntoIter = J>,
    {
        Seq::new(sources.into_iter().flatten())
    }
}

impl<I: Iterator> Seq<I> {
    /// Wrap `source`.
    pub fn new<S>(source: S) -> Self
    where
        S: IntoIterator<IntoIter = I>,
    {
        Seq {
            source: source.into_iter(),
        }
    }

    /// Unwrap the source.
    pub fn into_inner(self) -> I {
        self.source
    }

    /// Throw away the source of `self` and wrap `source` instead.
    pub fn replace_me<S: IntoIterator>(self, source: S) -> Seq<S::IntoIter> {
        Seq::new(source)
    }

    /// Throw away the source of `self` and wrap an empty sequence instead.
    pub fn replace_me_with_empty<T>(self) -> Seq<iter::Empty<T>> {
        Seq::empty()
    }

    /// Throw away the source of `self` and wrap a range instead.
    pub fn replace_me_with_range<A>(self, range: Range<A>) -> Seq<Range<A>>
    where
        Range<A>: Iterator,
    {
        Seq::range(range)
    }

    /// Throw away the source of `self` and wrap the given values instead.
    pub fn replace_me_with_unite<T, S>(self, values: S) -> Seq<std::vec::IntoIter<T>>
    where
        S: IntoIterator<Item = T>,
    {
        Seq::unite(values)
    }

    /// Throw away the source of `self` and wrap the concatenation of `sources` instead.
    pub fn replace_me_with_concat<S>(self, sources: S) -> Seq<iter::Flatten<S::IntoIter>>
    where
        S: IntoIterator,
        S::Item: IntoIterator,
    {
        Seq::concat(sources)
    }

    /// Run the engine over the source with `operation`, wrapping the result.
    fn derive<F, V>(self, operation: F) -> Seq<Derived<I, F, V>>
    where
        F: FnMut(I::Item, usize) -> StepAction<V, ()>,
    {
        Seq::new(create_new(self.source, operation, ()))
    }

    /// Run the engine over the source with `operation` for a single result.
    fn result<F, R>(self, operation: F, fallback: R) -> R
    where
        F: FnMut(I::Item, usize) -> StepAction<(), R>,
    {
        get_result(self.source, operation, fallback)
    }

    /// Apply `f` to every element.
    ///
    /// Works on infinite sources as nothing is computed before it is pulled.
    pub fn map<B, F>(self, mut f: F) -> Seq<impl Iterator<Item = B>>
    where
        F: FnMut(I::Item) -> B,
    {
        self.derive(push_adapter(move |element, _| f(element)))
    }

    /// The same as [`map`](`Seq::map`).
    pub fn transform<B, F>(self, f: F) -> Seq<impl Iterator<Item = B>>
    where
        F: FnMut(I::Item) -> B,
    {
        self.map(f)
    }

    /// Keep the elements satisfying `p`.
    pub fn filter<P>(self, mut p: P) -> Seq<impl Iterator<Item = I::Item>>
    where
        P: FnMut(&I::Item) -> bool,
    {
        self.derive(move |element, _| {
            if p(&element) {
                StepAction::Push(element)
            } else {
                StepAction::Skip
            }
        })
    }

    /// Keep elements as long as they satisfy `p`, including the first one which does not.
    ///
    /// # Examples
    ///
    /// ```
    /// use stepseq::Seq;
    ///
    /// let prefix = Seq::new([1, 2, 7, 3]).continue_if(|n| *n < 5).to_list();
    ///
    /// assert_eq!(prefix, vec![1, 2, 7]);
    /// ```
    pub fn continue_if<P>(self, mut p: P) -> Seq<impl Iterator<Item = I::Item>>
    where
        P: FnMut(&I::Item) -> bool,
    {
        self.derive(move |element, _| {
            if p(&element) {
                StepAction::Push(element)
            } else {
                StepAction::push_last(element)
            }
        })
    }

    /// Keep the first `max_count` elements.
    ///
    /// Fails at once if `max_count` is negative.
    /// For `0` the source is never pulled.
    pub fn first_n(self, max_count: isize) -> Result<Seq<impl Iterator<Item = I::Item>>> {
        let max_count = non_negative("max_count", max_count)?;
        Ok(self.take_counted(max_count))
    }

    fn take_counted(self, max_count: usize) -> Seq<impl Iterator<Item = I::Item>> {
        let mut counted = with_count(move |i, element| {
            if i + 1 < max_count {
                StepAction::Push(element)
            } else {
                StepAction::push_last(element)
            }
        });
        let taken = create_new(self.source, move |element, _| counted(element), ()).pre_hook(
            move |_| {
                if max_count == 0 {
                    StepAction::Stop(())
                } else {
                    StepAction::Skip
                }
            },
        );
        Seq::new(taken)
    }

    /// Skip the first `n` elements.
    ///
    /// Fails at once if `n` is negative.
    pub fn drop_n(self, n: isize) -> Result<Seq<impl Iterator<Item = I::Item>>> {
        let n = non_negative("n", n)?;
        let mut counted = with_count(move |i, element| {
            if i < n {
                StepAction::Skip
            } else {
                StepAction::Push(element)
            }
        });
        Ok(self.derive(move |element, _| counted(element)))
    }

    /// Keep the elements at the given positions (counted from `0`), in source order.
    ///
    /// Only the first `max(indices) + 1` elements are pulled. Indices beyond the end of the source are ignored.
    /// Fails at once if `indices` is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use stepseq::IntoSeq;
    ///
    /// let picked = (0..).seq().map(|n| n * 10).select_by_indices([3, 1])?.to_list();
    ///
    /// assert_eq!(picked, vec![10, 30]);
    /// # Ok::<(), stepseq::Error>(())
    /// ```
    pub fn select_by_indices<S>(self, indices: S) -> Result<Seq<impl Iterator<Item = I::Item>>>
    where
        S: IntoIterator<Item = usize>,
    {
        let index_set: HashSet<usize> = indices.into_iter().collect();
        let Some(&max_index) = index_set.iter().max() else {
            debug!("select_by_indices called without indices");
            return Err(Error::NoIndices);
        };
        let mut selected = with_count(move |i, element| {
            if index_set.contains(&i) {
                StepAction::Push(element)
            } else {
                StepAction::Skip
            }
        });
        Ok(self
            .take_counted(max_index.saturating_add(1))
            .derive(move |element, _| selected(element)))
    }

    /// Drop the elements at the given positions (counted from `0`).
    pub fn skip_by_indices<S>(self, indices: S) -> Seq<impl Iterator<Item = I::Item>>
    where
        S: IntoIterator<Item = usize>,
    {
        let index_set: HashSet<usize> = indices.into_iter().collect();
        self.derive(move |element, i| {
            if index_set.contains(&i) {
                StepAction::Skip
            } else {
                StepAction::Push(element)
            }
        })
    }

    /// Replace every element by its position in the source.
    pub fn number(self) -> Seq<impl Iterator<Item = usize>> {
        self.derive(push_adapter(|_, i| i))
    }

    /// Pair every element with its position in the source.
    pub fn indexed(self) -> Seq<impl Iterator<Item = (usize, I::Item)>> {
        self.derive(push_adapter(|element, i| (i, element)))
    }

    /// The positions of the elements satisfying `p`.
    pub fn take_indices<P>(self, mut p: P) -> Seq<impl Iterator<Item = usize>>
    where
        P: FnMut(&I::Item) -> bool,
    {
        self.derive(move |element, i| {
            if p(&element) {
                StepAction::Push(i)
            } else {
                StepAction::Skip
            }
        })
    }

    /// Append the elements of `others` after those of `self`.
    ///
    /// The sources in `others` are only pulled once `self` is exhausted.
    pub fn concat_with<S>(self, others: S) -> Seq<impl Iterator<Item = I::Item>>
    where
        S: IntoIterator,
        S::Item: IntoIterator<Item = I::Item>,
    {
        Seq::new(self.source.chain(others.into_iter().flatten()))
    }

    /// Flatten every element with an explicit leaf predicate and child extractor (see [`flatten`](`crate::flatten::flatten`)).
    /// Each element is a root, so `max_depth` counts levels below the element.
    pub fn flatten_with<L, G, C>(
        self,
        max_depth: Option<usize>,
        mut is_leaf: L,
        mut children: G,
    ) -> Seq<impl Iterator<Item = I::Item>>
    where
        L: FnMut(&I::Item) -> bool,
        G: FnMut(I::Item) -> C,
        C: IntoIterator<Item = I::Item>,
    {
        self.derive(move |element, _| {
            StepAction::aggregate(
                flatten(element, max_depth, &mut is_leaf, &mut children).map(StepAction::Push),
            )
        })
    }

    /// Remove every element contained in `values`.
    pub fn remove_values<S>(self, values: S) -> Seq<impl Iterator<Item = I::Item>>
    where
        S: IntoIterator<Item = I::Item>,
        I::Item: Hash + Eq,
    {
        let value_set: HashSet<I::Item> = values.into_iter().collect();
        self.filter(move |element| !value_set.contains(element))
    }

    /// Replace every element contained in `old_values` by `new_value`.
    pub fn replace_values<S>(self, old_values: S, new_value: I::Item) -> Seq<impl Iterator<Item = I::Item>>
    where
        S: IntoIterator<Item = I::Item>,
        I::Item: Hash + Eq + Clone,
    {
        let value_set: HashSet<I::Item> = old_values.into_iter().collect();
        self.map(move |element| {
            if value_set.contains(&element) {
                new_value.clone()
            } else {
                element
            }
        })
    }

    /// Call `operation` on every element.
    pub fn foreach<F>(self, mut operation: F)
    where
        F: FnMut(I::Item),
    {
        self.result(
            |element, _| {
                operation(element);
                StepAction::Skip
            },
            (),
        )
    }

    /// Whether every element satisfies `p`. Stops at the first which does not.
    ///
    /// `true` for an empty sequence.
    pub fn all<P>(self, mut p: P) -> bool
    where
        P: FnMut(&I::Item) -> bool,
    {
        self.result(stop_adapter(move |element, _| (!p(&element)).then_some(false)), true)
    }

    /// Whether some element satisfies `p`. Stops at the first which does.
    ///
    /// `false` for an empty sequence.
    pub fn any<P>(self, mut p: P) -> bool
    where
        P: FnMut(&I::Item) -> bool,
    {
        self.result(stop_adapter(move |element, _| p(&element).then_some(true)), false)
    }

    /// The position of the first element satisfying `p`. Stops there.
    pub fn first_index<P>(self, mut p: P) -> Option<usize>
    where
        P: FnMut(&I::Item) -> bool,
    {
        self.result(stop_adapter(move |element, i| p(&element).then_some(Some(i))), None)
    }

    /// The only element, `fallback` if there is none.
    ///
    /// At most two elements are pulled. Fails if there are two.
    ///
    /// # Examples
    ///
    /// ```
    /// use stepseq::{Error, Seq};
    ///
    /// assert_eq!(Seq::new([7]).single_or(0), Ok(7));
    /// assert_eq!(Seq::new([]).single_or(0), Ok(0));
    /// assert_eq!(Seq::new([7, 8]).single_or(0), Err(Error::MoreThanOneValue));
    /// ```
    pub fn single_or(self, fallback: I::Item) -> Result<I::Item> {
        Ok(self.single()?.unwrap_or(fallback))
    }

    /// The only element if there is exactly one, `None` if there is none.
    ///
    /// At most two elements are pulled. Fails if there are two.
    pub fn single(self) -> Result<Option<I::Item>> {
        let mut first_two = self.take_counted(2);
        match (first_two.next(), first_two.next()) {
            (Some(_), Some(_)) => {
                debug!("single found more than one value");
                Err(Error::MoreThanOneValue)
            }
            (first, _) => Ok(first),
        }
    }

    /// The first element, `fallback` if there is none.
    pub fn first_or(self, fallback: I::Item) -> I::Item {
        match self.take_counted(1).single_or(fallback) {
            Ok(first) => first,
            Err(_) => unreachable!("taking one element produced more than one"),
        }
    }

    /// Group the elements by the key `key_getter` computes for them.
    ///
    /// Groups are ordered by the first appearance of their key and keep the source order of their elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use stepseq::Seq;
    ///
    /// let groups = Seq::new([1, 2, 3, 4, 5]).group_by(|n| n % 2);
    ///
    /// assert_eq!(groups.keys().collect::<Vec<_>>(), vec![&1, &0]);
    /// assert_eq!(groups[&1], vec![1, 3, 5]);
    /// assert_eq!(groups[&0], vec![2, 4]);
    /// ```
    pub fn group_by<K, F>(self, mut key_getter: F) -> IndexMap<K, Vec<I::Item>>
    where
        F: FnMut(&I::Item) -> K,
        K: Hash + Eq,
    {
        let mut groups: IndexMap<K, Vec<I::Item>> = IndexMap::new();
        self.foreach(|element| {
            groups.entry(key_getter(&element)).or_default().push(element);
        });
        groups
    }

    /// Join string elements with `separator` between consecutive ones.
    pub fn join_str(self, separator: &str) -> String
    where
        I::Item: AsRef<str>,
    {
        let mut joined = String::new();
        self.result(
            |element, i| {
                if i > 0 {
                    joined.push_str(separator);
                }
                joined.push_str(element.as_ref());
                StepAction::Skip
            },
            (),
        );
        joined
    }

    /// Collect the elements into a [`Vec`].
    pub fn to_list(self) -> Vec<I::Item> {
        self.collect()
    }

    /// Collect the elements into a [`Vec`], leaving out those in `discard`.
    pub fn to_list_without<S>(self, discard: S) -> Vec<I::Item>
    where
        S: IntoIterator<Item = I::Item>,
        I::Item: Hash + Eq,
    {
        self.remove_values(discard).to_list()
    }

    /// Collect the elements into a [`HashSet`].
    pub fn to_set(self) -> HashSet<I::Item>
    where
        I::Item: Hash + Eq,
    {
        self.collect()
    }

    /// Collect the elements into a [`HashSet`], leaving out those in `discard`.
    pub fn to_set_without<S>(self, discard: S) -> HashSet<I::Item>
    where
        S: IntoIterator<Item = I::Item>,
        I::Item: Hash + Eq,
    {
        self.remove_values(discard).to_set()
    }
}

impl<T, I> Seq<I>
where
    I: Iterator<Item = Nested<T>>,
{
    /// Flatten nested elements. Each element is a root, so `max_depth` counts levels below the element:
    /// `None` flattens completely, `Some(0)` changes nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use stepseq::{nested, Nested, Seq};
    ///
    /// let one_level = Seq::new(nested![1, [2, [3, 4], 5], 6].into_children())
    ///     .flatten(Some(1))
    ///     .to_list();
    ///
    /// assert_eq!(one_level, nested![1, 2, [3, 4], 5, 6].into_children());
    /// ```
    pub fn flatten(self, max_depth: Option<usize>) -> Seq<impl Iterator<Item = Nested<T>>> {
        self.derive(move |element, _| {
            StepAction::aggregate(flatten_nested(element, max_depth).map(StepAction::Push))
        })
    }

    /// Flatten nested elements completely and unwrap the leaves.
    pub fn leaves(self) -> Seq<impl Iterator<Item = T>> {
        self.flatten(None).derive(|element, _| match element.into_leaf() {
            Some(x) => StepAction::Push(x),
            None => StepAction::Skip,
        })
    }
}

fn non_negative(name: &'static str, count: isize) -> Result<usize> {
    usize::try_from(count).map_err(|_| {
        debug!("{name} rejected: {count} is negative");
        Error::NegativeCount { name, count }
    })
}
