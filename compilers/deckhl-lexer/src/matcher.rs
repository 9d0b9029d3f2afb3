use std::collections::HashSet;

use deckhl_protocol::{Category, Span};
use nom::{
    branch::alt,
    bytes::complete::{escaped, take_while1},
    character::complete::{anychar, char, digit1, one_of},
    combinator::{opt, recognize},
    sequence::{delimited, pair, tuple},
    IResult,
};

/// A single rule of a grammar.
pub trait Matcher: Send + Sync {
    /// Tries to match a token starting exactly at byte `cursor` of `input`.
    ///
    /// A returned span must begin at `cursor` and be non-empty. Returning a
    /// `Plain` span claims the region without classifying it.
    fn try_match<'a>(&self, input: &'a str, cursor: usize) -> Option<Span<'a>>;

    /// Same as [`try_match`](Matcher::try_match), sharing memory with the
    /// other attempts of one scan.
    fn try_match_in<'a>(&self, input: &'a str, cursor: usize, _state: &mut ScanState) -> Option<Span<'a>> {
        self.try_match(input, cursor)
    }
}

/// What earlier attempts of one scan learned about the input.
#[derive(Debug, Default, Clone)]
pub struct ScanState {
    /// Per delimiter: offset before which an opening quote cannot close.
    unterminated: Vec<(char, usize)>,
}

impl ScanState {
    fn unterminated_until(&self, quote: char) -> usize {
        self.unterminated
            .iter()
            .find(|(q, _)| *q == quote)
            .map_or(0, |&(_, end)| end)
    }

    fn mark_unterminated(&mut self, quote: char, end: usize) {
        match self.unterminated.iter_mut().find(|(q, _)| *q == quote) {
            Some(entry) => entry.1 = end,
            None => self.unterminated.push((quote, end)),
        }
    }
}

/// Letters, digits (any script) and underscore.
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Maximal run of word characters.
pub(crate) fn word(input: &str) -> IResult<&str, &str> {
    take_while1(is_word_char)(input)
}

fn at_word_boundary(input: &str, cursor: usize) -> bool {
    input[..cursor].chars().next_back().map_or(true, |c| !is_word_char(c))
}

/// The identifier rule: exact lookups in the keyword and literal sets.
#[derive(Debug, Default, Clone)]
pub struct WordTable {
    keywords: HashSet<String>,
    literals: HashSet<String>,
}

impl WordTable {
    pub fn new(keywords: HashSet<String>, literals: HashSet<String>) -> Self {
        Self { keywords, literals }
    }

    pub fn lookup(&self, word: &str) -> Category {
        if self.keywords.contains(word) {
            Category::Keyword
        } else if self.literals.contains(word) {
            Category::Literal
        } else {
            Category::Plain
        }
    }

    pub fn keywords(&self) -> &HashSet<String> {
        &self.keywords
    }

    pub fn literals(&self) -> &HashSet<String> {
        &self.literals
    }
}

impl Matcher for WordTable {
    fn try_match<'a>(&self, input: &'a str, cursor: usize) -> Option<Span<'a>> {
        let rest = &input[cursor..];

        // Digit-led runs belong to the number rule
        if rest.starts_with(|c: char| c.is_ascii_digit()) {
            return None;
        }

        let (_, found) = word(rest).ok()?;
        Some(Span::new(self.lookup(found), input, cursor, cursor + found.len()))
    }
}

/// Quoted strings with backslash escapes. A raw newline ends the search.
#[derive(Debug, Clone)]
pub struct QuotedStringMatcher {
    delimiters: Vec<char>,
}

impl QuotedStringMatcher {
    pub fn new(delimiters: Vec<char>) -> Self {
        Self { delimiters }
    }
}

fn quoted(input: &str, quote: char) -> IResult<&str, &str> {
    recognize(delimited(
        char(quote),
        opt(escaped(
            take_while1(move |c: char| c != quote && c != '\\' && c != '\n'),
            '\\',
            anychar,
        )),
        char(quote),
    ))(input)
}

/// Byte length of a body that never closes: up to the raw newline or the end.
///
/// Pairs backslashes with the following char exactly like `quoted`, so every
/// quote inside the returned range is escaped.
fn unterminated_body(body: &str) -> usize {
    let mut chars = body.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '\n' => return i,
            _ => {}
        }
    }
    body.len()
}

impl Matcher for QuotedStringMatcher {
    fn try_match<'a>(&self, input: &'a str, cursor: usize) -> Option<Span<'a>> {
        self.try_match_in(input, cursor, &mut ScanState::default())
    }

    fn try_match_in<'a>(&self, input: &'a str, cursor: usize, state: &mut ScanState) -> Option<Span<'a>> {
        let rest = &input[cursor..];
        let quote = rest.chars().next().filter(|c| self.delimiters.contains(c))?;

        // An escaped quote inside a known unterminated run fails the same way
        if cursor < state.unterminated_until(quote) {
            return None;
        }

        match quoted(rest, quote) {
            Ok((_, found)) => Some(Span::new(Category::String, input, cursor, cursor + found.len())),
            Err(_) => {
                // The opening quote falls back to plain text
                let open = quote.len_utf8();
                let end = cursor + open + unterminated_body(&rest[open..]);
                log::trace!("unterminated {:?} string at bytes {}..{}", quote, cursor, end);
                state.mark_unterminated(quote, end);
                None
            }
        }
    }
}

/// Decimal numbers: optional sign, fraction and exponent.
#[derive(Debug, Default, Clone, Copy)]
pub struct NumberMatcher;

fn number(input: &str) -> IResult<&str, &str> {
    recognize(tuple((
        opt(char('-')),
        digit1,
        opt(pair(char('.'), digit1)),
        opt(tuple((one_of("eE"), opt(alt((char('+'), char('-')))), digit1))),
    )))(input)
}

impl Matcher for NumberMatcher {
    fn try_match<'a>(&self, input: &'a str, cursor: usize) -> Option<Span<'a>> {
        if !at_word_boundary(input, cursor) {
            return None;
        }

        let (_, found) = number(&input[cursor..]).ok()?;
        Some(Span::new(Category::Number, input, cursor, cursor + found.len()))
    }
}
