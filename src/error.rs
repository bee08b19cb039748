//! This module defines the usage errors combinators report.
//!
//! Only programmer errors end up here. Exhausting a source without a [`Stop`](`crate::StepAction::Stop`)
//! is not an error: the fallback value is returned instead.

use thiserror::Error;

/// Result type alias for fallible combinators.
pub type Result<T> = std::result::Result<T, Error>;

/// [`Error`] enumerates the ways a combinator can be called incorrectly.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A count argument (of [`first_n`](`crate::Seq::first_n`) or [`drop_n`](`crate::Seq::drop_n`)) was negative.
    #[error("{name} must be 0 or positive, got {count}")]
    NegativeCount {
        /// name of the offending argument
        name: &'static str,
        /// the value that was passed
        count: isize,
    },
    /// [`single_or`](`crate::Seq::single_or`) saw a second element.
    #[error("more than one value found")]
    MoreThanOneValue,
    /// [`select_by_indices`](`crate::Seq::select_by_indices`) was called without any index.
    #[error("no indices given, there is no maximum index to bound the scan")]
    NoIndices,
    /// [`range_step`](`crate::Seq::range_step`) was called with a step of `0`.
    #[error("step must be positive")]
    ZeroStep,
}
