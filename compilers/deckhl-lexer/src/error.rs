use thiserror::Error;

/// Reasons a [`GrammarDef`](deckhl_protocol::GrammarDef) is refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("grammar name must not be empty")]
    EmptyName,
    #[error("{set} entry {word:?} is not an identifier")]
    InvalidWord { set: &'static str, word: String },
    #[error("{word:?} is listed as both a keyword and a literal")]
    Overlap { word: String },
    #[error("string rule has no delimiters")]
    NoDelimiters,
    #[error("{delimiter:?} cannot delimit a string")]
    InvalidDelimiter { delimiter: char },
}
