use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Highlight class of a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[repr(u8)]
pub enum Category {
    Keyword = 0,
    Literal = 1,
    String = 2,
    Number = 3,
    /// Anything the grammar does not classify.
    Plain = 4,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Keyword,
        Category::Literal,
        Category::String,
        Category::Number,
        Category::Plain,
    ];

    /// The class name a renderer tags the span with.
    pub const fn as_str(self) -> &'static str {
        match self {
            Category::Keyword => "keyword",
            Category::Literal => "literal",
            Category::String => "string",
            Category::Number => "number",
            Category::Plain => "plain",
        }
    }

    pub const fn is_plain(self) -> bool {
        matches!(self, Category::Plain)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
