//! This module provides sources worth having besides the iterators of the standard library.
//!
//! A source is anything implementing [`IntoIterator`]: the engine pulls from it one element at a time and
//! stops pulling as soon as a traversal is done. Sources may be finite or infinite and are consumed at most once.
//! Pulling the same source from within an operation traversing it is not supported.

mod tracked;
pub use tracked::{Pulls, Tracked};

#[cfg(feature = "channels")]
mod receivers;
#[cfg(feature = "channels")]
pub use receivers::Receiving;
