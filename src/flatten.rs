//! This module provides one generic depth-first flattening algorithm.
//!
//! It is used in two places which look unrelated but share their shape:
//! - expanding [`StepAction::Aggregate`](`crate::StepAction::Aggregate`)s into leaf actions (see [`StepAction::leaves`](`crate::StepAction::leaves`)),
//! - flattening nested data, typed as [`Nested<T>`].
//!
//! Instead of asking at runtime whether something is enumerable, the caller passes an explicit
//! leaf predicate and an explicit child extractor.

use std::fmt;

/// [`Flatten`] lazily yields every leaf reachable from a root, depth-first and left-to-right.
///
/// Constructed by [`flatten`].
pub struct Flatten<T, C, L, G>
where
    C: IntoIterator<Item = T>,
{
    /// not yet visited root
    root: Option<T>,
    /// child iterators of the nodes currently descended into
    stack: Vec<C::IntoIter>,
    /// `None` means unbounded
    max_depth: Option<usize>,
    /// decides whether a node is yielded as is
    is_leaf: L,
    /// opens up a non-leaf node
    children: G,
}

/// Flatten `root` into the sequence of its leaves.
/// - `root` is the value to flatten.
/// - `max_depth` bounds the descent: `None` is unbounded, `Some(0)` yields `root` itself and
///   `Some(n)` yields whatever is found `n` levels down, leaf or not.
/// - `is_leaf` decides whether a node is yielded without descending into it.
/// - `children` turns a non-leaf node into its ordered children.
///
/// A non-leaf node without children contributes nothing.
///
/// # Examples
///
/// Flattening a tree of boxed numbers:
///
/// ```
/// use stepseq::flatten::flatten;
///
/// enum Tree {
///     Leaf(u8),
///     Node(Vec<Tree>),
/// }
///
/// let tree = Tree::Node(vec![Tree::Leaf(1), Tree::Node(vec![Tree::Leaf(2)]), Tree::Leaf(3)]);
///
/// let leaves: Vec<u8> = flatten(
///     tree,
///     None,
///     |t: &Tree| matches!(t, Tree::Leaf(_)),
///     |t: Tree| match t {
///         Tree::Node(children) => children,
///         Tree::Leaf(_) => Vec::new(),
///     },
/// )
/// .filter_map(|t| match t {
///     Tree::Leaf(n) => Some(n),
///     Tree::Node(_) => None,
/// })
/// .collect();
///
/// assert_eq!(leaves, vec![1, 2, 3]);
/// ```
pub fn flatten<T, C, L, G>(root: T, max_depth: Option<usize>, is_leaf: L, children: G) -> Flatten<T, C, L, G>
where
    C: IntoIterator<Item = T>,
    L: FnMut(&T) -> bool,
    G: FnMut(T) -> C,
{
    Flatten {
        root: Some(root),
        stack: Vec::new(),
        max_depth,
        is_leaf,
        children,
    }
}

impl<T, C, L, G> Iterator for Flatten<T, C, L, G>
where
    C: IntoIterator<Item = T>,
    L: FnMut(&T) -> bool,
    G: FnMut(T) -> C,
{
    type Item = T;

    fn next(&mut self) -> Option<T> {
        loop {
            // A node popped from a stack of height `k` lives at depth `k`.
            let (node, depth) = match self.root.take() {
                Some(root) => (root, 0),
                None => {
                    let depth = self.stack.len();
                    match self.stack.last_mut()?.next() {
                        Some(node) => (node, depth),
                        None => {
                            self.stack.pop();
                            continue;
                        }
                    }
                }
            };

            if self.max_depth == Some(depth) || (self.is_leaf)(&node) {
                return Some(node);
            }
            self.stack.push((self.children)(node).into_iter());
        }
    }
}

/// [`Nested<T>`] types arbitrarily nested sequences of `T`.
///
/// Use the [`nested!`](`crate::nested`)-macro to write them down.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Nested<T> {
    /// A plain value.
    Leaf(T),
    /// An ordered sequence of nested values.
    Seq(Vec<Nested<T>>),
}

impl<T> Nested<T> {
    /// Whether `self` is a [`Nested::Leaf`].
    pub fn is_leaf(&self) -> bool {
        matches!(self, Nested::Leaf(_))
    }

    /// The children of a [`Nested::Seq`]. A leaf has none.
    pub fn into_children(self) -> Vec<Self> {
        match self {
            Nested::Seq(children) => children,
            Nested::Leaf(_) => Vec::new(),
        }
    }

    /// The value of a [`Nested::Leaf`].
    pub fn into_leaf(self) -> Option<T> {
        match self {
            Nested::Leaf(x) => Some(x),
            Nested::Seq(_) => None,
        }
    }

    /// Borrow the value of a [`Nested::Leaf`].
    pub fn leaf(&self) -> Option<&T> {
        match self {
            Nested::Leaf(x) => Some(x),
            Nested::Seq(_) => None,
        }
    }
}

impl<T> From<T> for Nested<T> {
    fn from(x: T) -> Self {
        Nested::Leaf(x)
    }
}

impl<T: fmt::Display> fmt::Display for Nested<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Nested::Leaf(x) => write!(f, "{x}"),
            Nested::Seq(children) => {
                write!(f, "[")?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{child}")?;
                }
                write!(f, "]")
            }
        }
    }
}

/// [`NestedFlatten<T>`] is the iterator [`flatten_nested`] returns.
pub type NestedFlatten<T> =
    Flatten<Nested<T>, Vec<Nested<T>>, fn(&Nested<T>) -> bool, fn(Nested<T>) -> Vec<Nested<T>>>;

/// Flatten nested data, treating every [`Nested::Seq`] as a node to descend into.
/// - `value` is the nested data.
/// - `max_depth` is as in [`flatten`].
///
/// # Examples
///
/// ```
/// use stepseq::flatten::flatten_nested;
/// use stepseq::nested;
///
/// let once: Vec<_> = flatten_nested(nested![1, [2, [3, 4], 5], 6], Some(2)).collect();
/// assert_eq!(once, nested![1, 2, [3, 4], 5, 6].into_children());
/// ```
pub fn flatten_nested<T>(value: Nested<T>, max_depth: Option<usize>) -> NestedFlatten<T> {
    flatten(
        value,
        max_depth,
        Nested::is_leaf as fn(&Nested<T>) -> bool,
        Nested::into_children as fn(Nested<T>) -> Vec<Nested<T>>,
    )
}

/// Write down a [`Nested`] value with bracket syntax.
///
/// Every item is a single token tree: either a bracketed list (which becomes a [`Nested::Seq`])
/// or anything else (which becomes a [`Nested::Leaf`]).
/// The outermost brackets always produce a [`Nested::Seq`].
///
/// # Examples
///
/// ```
/// use stepseq::{nested, Nested};
///
/// assert_eq!(
///     nested![1, [2]],
///     Nested::Seq(vec![Nested::Leaf(1), Nested::Seq(vec![Nested::Leaf(2)])])
/// );
/// ```
#[macro_export]
macro_rules! nested {
    (@node [$($inner:tt),* $(,)?]) => {
        $crate::Nested::Seq(::std::vec![$($crate::nested!(@node $inner)),*])
    };
    (@node $leaf:expr) => {
        $crate::Nested::Leaf($leaf)
    };
    ($($item:tt),* $(,)?) => {
        $crate::Nested::Seq(::std::vec![$($crate::nested!(@node $item)),*])
    };
}
