use std::iter::FusedIterator;

use deckhl_protocol::{Category, Span};

use crate::grammar::Grammar;
use crate::matcher::{word, ScanState};

/// Lazy left-to-right scan over one input.
///
/// Consecutive unclassified text is coalesced into a single `Plain` span, so a
/// classified span is always followed by either another classified span or a
/// plain run that ends at the next classified span (or at the end of input).
/// Cloning the iterator restarts from the clone point.
#[derive(Debug, Clone)]
pub struct Spans<'g, 'a> {
    grammar: &'g Grammar,
    input: &'a str,
    cursor: usize,
    /// Classified span found while closing a plain run.
    pending: Option<Span<'a>>,
    state: ScanState,
}

impl<'g, 'a> Spans<'g, 'a> {
    pub(crate) fn new(grammar: &'g Grammar, input: &'a str) -> Self {
        Self { grammar, input, cursor: 0, pending: None, state: ScanState::default() }
    }

    /// Length of unclassified material at the cursor: a whole word, or one char.
    fn skip_plain(&self) -> usize {
        let rest = &self.input[self.cursor..];
        if let Ok((_, found)) = word(rest) {
            return found.len();
        }
        rest.chars().next().map_or(0, char::len_utf8)
    }
}

impl<'g, 'a> Iterator for Spans<'g, 'a> {
    type Item = Span<'a>;

    fn next(&mut self) -> Option<Span<'a>> {
        if let Some(span) = self.pending.take() {
            return Some(span);
        }

        let plain_start = self.cursor;
        while self.cursor < self.input.len() {
            match self.grammar.match_at(self.input, self.cursor, &mut self.state) {
                // A rule that does not advance cannot be trusted
                Some(span) if span.start == self.cursor && span.end > self.cursor => {
                    self.cursor = span.end;
                    if span.category.is_plain() {
                        continue;
                    }
                    if plain_start < span.start {
                        self.pending = Some(span);
                        return Some(Span::new(Category::Plain, self.input, plain_start, span.start));
                    }
                    return Some(span);
                }
                _ => {
                    // Skip to recover (resilient scanning)
                    self.cursor += self.skip_plain();
                }
            }
        }

        if plain_start < self.cursor {
            Some(Span::new(Category::Plain, self.input, plain_start, self.cursor))
        } else {
            None
        }
    }
}

impl FusedIterator for Spans<'_, '_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::protobuf;
    use deckhl_protocol::GrammarDef;

    fn parts<'a>(spans: impl Iterator<Item = Span<'a>>) -> Vec<(Category, &'a str)> {
        spans.map(|span| (span.category, span.text)).collect()
    }

    #[test]
    fn test_plain_runs_are_coalesced() {
        let spans = parts(protobuf().classify("foo bar; baz"));
        assert_eq!(spans, vec![(Category::Plain, "foo bar; baz")]);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(protobuf().classify("").next(), None);
    }

    #[test]
    fn test_pending_span_follows_plain_run() {
        let mut spans = protobuf().classify("{ repeated");

        let first = spans.next().unwrap();
        assert_eq!((first.category, first.text, first.start, first.end), (Category::Plain, "{ ", 0, 2));

        let second = spans.next().unwrap();
        assert_eq!((second.category, second.text, second.start, second.end), (Category::Keyword, "repeated", 2, 10));

        assert_eq!(spans.next(), None);
        assert_eq!(spans.next(), None);
    }

    #[test]
    fn test_clone_restarts_from_clone_point() {
        let mut spans = protobuf().classify("message M { required int64 id = 1; }");
        spans.next();

        let rest: Vec<_> = spans.clone().collect();
        let again: Vec<_> = spans.collect();
        assert_eq!(rest, again);
        assert_eq!(rest[0].text, " M { ");
    }

    #[test]
    fn test_multibyte_text() {
        let input = "message Größe = \"ü\"; // é";
        let spans = parts(protobuf().classify(input));

        assert_eq!(
            spans,
            vec![
                (Category::Keyword, "message"),
                (Category::Plain, " Größe = "),
                (Category::String, "\"ü\""),
                (Category::Plain, "; // é"),
            ]
        );
    }

    #[test]
    fn test_keyword_inside_digit_led_word_without_numbers() {
        // With no number rule, "9message" stays one plain word
        let def = GrammarDef {
            name: "nonum".to_string(),
            keywords: vec!["message".to_string()],
            literals: vec![],
            strings: None,
            numbers: false,
        };
        let grammar = Grammar::from_def(&def).unwrap();

        assert_eq!(parts(grammar.classify("9message")), vec![(Category::Plain, "9message")]);
        assert_eq!(
            parts(grammar.classify("9 message")),
            vec![(Category::Plain, "9 "), (Category::Keyword, "message")]
        );
    }

    #[test]
    fn test_number_followed_by_word() {
        // The number rule stops at the digits; the rest is its own word
        assert_eq!(
            parts(protobuf().classify("32string")),
            vec![(Category::Number, "32"), (Category::Literal, "string")]
        );
    }
}
