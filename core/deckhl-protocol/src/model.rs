use alloc::string::String;
use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Serializable description of a highlighting grammar.
///
/// This is the form grammars take on disk; the lexer validates it and turns it
/// into a matcher list.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GrammarDef {
    /// Language name code blocks are labelled with, e.g. `protobuf`.
    pub name: String,
    pub keywords: Vec<String>,
    pub literals: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub strings: Option<StringRule>,
    #[cfg_attr(feature = "serde", serde(default = "enabled"))]
    pub numbers: bool,
}

/// Quoted string literal rule.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StringRule {
    /// Characters that open a string; the same character closes it.
    pub delimiters: Vec<char>,
}

#[cfg(feature = "serde")]
fn enabled() -> bool {
    true
}
