use std::collections::HashSet;
use std::fmt;

use deckhl_protocol::{GrammarDef, Span, StringRule};
use once_cell::sync::Lazy;

use crate::error::GrammarError;
use crate::matcher::{is_word_char, Matcher, NumberMatcher, QuotedStringMatcher, ScanState, WordTable};
use crate::scanner::Spans;

pub const PROTOBUF_NAME: &str = "protobuf";

const PROTOBUF_KEYWORDS: [&str; 4] = ["message", "optional", "required", "repeated"];
const PROTOBUF_LITERALS: [&str; 4] = ["int32", "int64", "string", "boolean"];

static PROTOBUF_GRAMMAR: Lazy<Grammar> =
    Lazy::new(|| Grammar::from_def(&protobuf_def()).expect("built-in protobuf grammar is valid"));

/// Definition of the built-in `protobuf` grammar.
pub fn protobuf_def() -> GrammarDef {
    GrammarDef {
        name: PROTOBUF_NAME.to_string(),
        keywords: PROTOBUF_KEYWORDS.iter().map(|w| w.to_string()).collect(),
        literals: PROTOBUF_LITERALS.iter().map(|w| w.to_string()).collect(),
        strings: Some(StringRule { delimiters: vec!['"'] }),
        numbers: true,
    }
}

/// The process-wide `protobuf` grammar, built on first use.
pub fn protobuf() -> &'static Grammar {
    &PROTOBUF_GRAMMAR
}

/// An immutable set of classification rules for one language.
///
/// The identifier rule always runs first; `default_matchers` follow in the
/// order they were declared (strings, then numbers).
pub struct Grammar {
    name: String,
    words: WordTable,
    default_matchers: Vec<Box<dyn Matcher>>,
}

impl Grammar {
    /// Validates a definition and builds its matcher list.
    pub fn from_def(def: &GrammarDef) -> Result<Self, GrammarError> {
        if def.name.trim().is_empty() {
            return Err(GrammarError::EmptyName);
        }

        let keywords = word_set("keyword", &def.keywords)?;
        let literals = word_set("literal", &def.literals)?;

        // Sorted so the reported word does not depend on hash order
        let mut overlap: Vec<&String> = keywords.intersection(&literals).collect();
        overlap.sort();
        if let Some(word) = overlap.first() {
            return Err(GrammarError::Overlap { word: word.to_string() });
        }

        let mut default_matchers: Vec<Box<dyn Matcher>> = Vec::new();
        if let Some(rule) = &def.strings {
            default_matchers.push(Box::new(QuotedStringMatcher::new(delimiters(rule)?)));
        }
        if def.numbers {
            default_matchers.push(Box::new(NumberMatcher));
        }

        log::debug!(
            "built grammar {:?}: {} keywords, {} literals, {} default matchers",
            def.name,
            keywords.len(),
            literals.len(),
            default_matchers.len()
        );

        Ok(Self {
            name: def.name.clone(),
            words: WordTable::new(keywords, literals),
            default_matchers,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_keyword(&self, word: &str) -> bool {
        self.words.keywords().contains(word)
    }

    pub fn is_literal(&self, word: &str) -> bool {
        self.words.literals().contains(word)
    }

    /// Lazily splits `input` into classified spans.
    pub fn classify<'g, 'a>(&'g self, input: &'a str) -> Spans<'g, 'a> {
        Spans::new(self, input)
    }

    /// First rule, in priority order, that matches at `cursor`.
    pub(crate) fn match_at<'a>(&self, input: &'a str, cursor: usize, state: &mut ScanState) -> Option<Span<'a>> {
        if let Some(span) = self.words.try_match_in(input, cursor, state) {
            return Some(span);
        }
        self.default_matchers.iter().find_map(|m| m.try_match_in(input, cursor, state))
    }
}

impl fmt::Debug for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grammar")
            .field("name", &self.name)
            .field("keywords", &self.words.keywords().len())
            .field("literals", &self.words.literals().len())
            .field("default_matchers", &self.default_matchers.len())
            .finish()
    }
}

fn word_set(set: &'static str, words: &[String]) -> Result<HashSet<String>, GrammarError> {
    words
        .iter()
        .map(|word| {
            // Must be reachable by the identifier rule
            let valid = word.chars().all(is_word_char)
                && word.chars().next().map_or(false, |c| !c.is_ascii_digit());
            if valid {
                Ok(word.clone())
            } else {
                Err(GrammarError::InvalidWord { set, word: word.clone() })
            }
        })
        .collect()
}

fn delimiters(rule: &StringRule) -> Result<Vec<char>, GrammarError> {
    if rule.delimiters.is_empty() {
        return Err(GrammarError::NoDelimiters);
    }

    if let Some(&delimiter) = rule
        .delimiters
        .iter()
        .find(|&&c| is_word_char(c) || c.is_whitespace() || c == '\\')
    {
        return Err(GrammarError::InvalidDelimiter { delimiter });
    }

    let mut unique: Vec<char> = Vec::with_capacity(rule.delimiters.len());
    for &delimiter in &rule.delimiters {
        if !unique.contains(&delimiter) {
            unique.push(delimiter);
        }
    }
    Ok(unique)
}
