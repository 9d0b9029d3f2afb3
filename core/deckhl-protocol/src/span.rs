use core::ops::Range;

use crate::category::Category;

#[cfg(feature = "serde")]
use serde::Serialize;

/// A classified slice of the input.
///
/// `start` and `end` are byte offsets into the text the span was cut from,
/// and `text` is exactly `&input[start..end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Span<'a> {
    pub category: Category,
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
}

impl<'a> Span<'a> {
    /// Cuts `input[start..end]`. Panics if the offsets are not char boundaries.
    pub fn new(category: Category, input: &'a str, start: usize, end: usize) -> Self {
        Self { category, text: &input[start..end], start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}
