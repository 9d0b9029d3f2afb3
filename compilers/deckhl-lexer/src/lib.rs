pub mod error;
pub mod grammar;
pub mod matcher;
pub mod scanner;

use std::fmt;

pub use deckhl_protocol::{Category, GrammarDef, Span, StringRule};
pub use error::GrammarError;
pub use grammar::Grammar;
pub use scanner::Spans;

/// A highlightable language as seen by a rendering pipeline.
#[derive(Clone, Copy)]
pub struct Language {
    /// The label code blocks use to request this language.
    pub name: &'static str,
    pub classify: for<'a> fn(&'a str) -> Spans<'static, 'a>,
    pub grammar: fn() -> &'static Grammar,
}

pub static PROTOBUF: Language = Language {
    name: grammar::PROTOBUF_NAME,
    classify,
    grammar: grammar::protobuf,
};

impl fmt::Debug for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Language").field("name", &self.name).finish_non_exhaustive()
    }
}

/// Every built-in language.
pub static LANGUAGES: &[&Language] = &[&PROTOBUF];

pub fn find_language(name: &str) -> Option<&'static Language> {
    LANGUAGES.iter().copied().find(|language| language.name == name)
}

/// Primary entry point: protobuf source -> classified spans
pub fn classify(input: &str) -> Spans<'static, '_> {
    grammar::protobuf().classify(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::protobuf;
    use proptest::prelude::*;
    use std::time::{Duration, Instant};

    fn parts(input: &str) -> Vec<(Category, &str)> {
        classify(input).map(|span| (span.category, span.text)).collect()
    }

    fn assert_contiguous(input: &str) {
        let spans: Vec<Span> = classify(input).collect();
        let mut offset = 0;
        for (i, span) in spans.iter().enumerate() {
            assert_eq!(span.start, offset);
            assert_eq!(&input[span.range()], span.text);
            assert!(!span.is_empty());
            if i > 0 {
                assert!(!(span.category.is_plain() && spans[i - 1].category.is_plain()));
            }
            offset = span.end;
        }
        assert_eq!(offset, input.len());
    }

    #[test]
    fn test_keyword_exactness() {
        assert_eq!(parts("message"), vec![(Category::Keyword, "message")]);
        assert_eq!(parts("messages"), vec![(Category::Plain, "messages")]);
    }

    #[test]
    fn test_literal_boundaries() {
        assert_eq!(
            parts("required int32 x"),
            vec![
                (Category::Keyword, "required"),
                (Category::Plain, " "),
                (Category::Literal, "int32"),
                (Category::Plain, " x"),
            ]
        );
    }

    #[test]
    fn test_field_with_string_default() {
        assert_eq!(
            parts(r#"optional string name = "hello";"#),
            vec![
                (Category::Keyword, "optional"),
                (Category::Plain, " "),
                (Category::Literal, "string"),
                (Category::Plain, " name = "),
                (Category::String, r#""hello""#),
                (Category::Plain, ";"),
            ]
        );
    }

    #[test]
    fn test_number_is_isolated() {
        assert_eq!(
            parts("x = 42;"),
            vec![(Category::Plain, "x = "), (Category::Number, "42"), (Category::Plain, ";")]
        );
    }

    #[test]
    fn test_unterminated_string_falls_back_to_plain() {
        assert_eq!(parts("\"abc"), vec![(Category::Plain, "\"abc")]);

        // Scanning resumes after the stray quote
        assert_eq!(
            parts("\"message 7\n\"ok\""),
            vec![
                (Category::Plain, "\""),
                (Category::Keyword, "message"),
                (Category::Plain, " "),
                (Category::Number, "7"),
                (Category::Plain, "\n"),
                (Category::String, "\"ok\""),
            ]
        );
    }

    #[test]
    fn test_single_quotes_are_plain() {
        assert_eq!(parts("x = 'a';"), vec![(Category::Plain, "x = 'a';")]);
        assert_eq!(
            parts("'it' \"it\""),
            vec![(Category::Plain, "'it' "), (Category::String, "\"it\"")]
        );
    }

    #[test]
    fn test_long_unterminated_runs_scan_in_linear_time() {
        let quoting = Grammar::from_def(&GrammarDef {
            name: "quoting".to_string(),
            keywords: vec![],
            literals: vec![],
            strings: Some(StringRule { delimiters: vec!['"', '\''] }),
            numbers: false,
        })
        .unwrap();

        // Every quote after the first is escaped, so none of them can close
        let escaped_quotes = format!("\"{}", "\\\"".repeat(200_000));
        // Both delimiters open, then interleave escaped
        let interleaved = format!("\"'{}", "\\\"\\'".repeat(100_000));

        for (grammar, input) in [(protobuf(), &escaped_quotes), (&quoting, &interleaved)] {
            let started = Instant::now();
            let spans: Vec<(Category, &str)> = grammar.classify(input).map(|s| (s.category, s.text)).collect();
            let elapsed = started.elapsed();

            assert_eq!(spans, vec![(Category::Plain, input.as_str())]);
            assert!(elapsed < Duration::from_secs(10), "took {:?} for {} bytes", elapsed, input.len());
        }
    }

    #[test]
    fn test_full_message_definition() {
        let input = "message Person {\n  required string name = 1;\n  repeated int64 ids = 2 [default = -1];\n}\n";
        let spans = parts(input);

        let classified: Vec<_> = spans.iter().filter(|(category, _)| !category.is_plain()).collect();
        assert_eq!(
            classified,
            vec![
                &(Category::Keyword, "message"),
                &(Category::Keyword, "required"),
                &(Category::Literal, "string"),
                &(Category::Number, "1"),
                &(Category::Keyword, "repeated"),
                &(Category::Literal, "int64"),
                &(Category::Number, "2"),
                &(Category::Number, "-1"),
            ]
        );
        assert_contiguous(input);
    }

    #[test]
    fn test_language_export() {
        assert_eq!(PROTOBUF.name, "protobuf");
        assert_eq!((PROTOBUF.grammar)().name(), "protobuf");

        let via_export: Vec<Span> = (PROTOBUF.classify)("repeated boolean flags;").collect();
        let direct: Vec<Span> = classify("repeated boolean flags;").collect();
        assert_eq!(via_export, direct);

        assert!(find_language("protobuf").is_some());
        assert!(find_language("Protobuf").is_none());
    }

    #[test]
    fn test_repeated_and_concurrent_calls_agree() {
        let input = "message M { optional int32 a = 1; optional string b = \"x\"; }";
        let expected: Vec<Span> = classify(input).collect();

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| classify(input).collect::<Vec<Span>>()))
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), expected);
            }
        });
        assert_eq!(classify(input).collect::<Vec<Span>>(), expected);
    }

    proptest! {
        #[test]
        fn test_lossless_reconstruction(input in "\\PC*") {
            let rebuilt: String = classify(&input).map(|span| span.text).collect();
            prop_assert_eq!(rebuilt, input);
        }

        #[test]
        fn test_spans_are_contiguous(input in "[a-z0-9_ \"'\\\\.\\-eE\n;=]{0,64}") {
            assert_contiguous(&input);
        }

        #[test]
        fn test_keywords_survive_any_surroundings(
            pre in "[ ;{(\n]{0,3}",
            word in prop::sample::select(vec!["message", "optional", "required", "repeated"]),
            post in "[ ;})\n]{0,3}",
        ) {
            let input = format!("{}{}{}", pre, word, post);
            let keyword = classify(&input).find(|span| span.category == Category::Keyword);
            prop_assert_eq!(keyword.map(|span| span.text), Some(word));
        }
    }
}
