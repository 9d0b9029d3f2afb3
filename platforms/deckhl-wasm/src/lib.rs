use wasm_bindgen::prelude::*;
use deckhl_lexer::{find_language, Language, LANGUAGES};
use deckhl_protocol::{Category, Span};
use serde::Serialize;

#[wasm_bindgen]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Names of the built-in languages, for the site generator's dispatch table.
#[wasm_bindgen]
pub fn languages() -> Result<JsValue, JsError> {
    let names: Vec<&str> = LANGUAGES.iter().map(|language| language.name).collect();
    Ok(serde_wasm_bindgen::to_value(&names)?)
}

/// A span as JavaScript sees it: offsets count UTF-16 code units, so they can
/// be used directly with `String.prototype.slice`.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct JsSpan<'a> {
    pub category: Category,
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
}

/// Re-bases contiguous spans from UTF-8 byte offsets onto UTF-16 offsets.
pub fn to_js_spans<'a>(spans: impl IntoIterator<Item = Span<'a>>) -> Vec<JsSpan<'a>> {
    let mut offset = 0;
    spans
        .into_iter()
        .map(|span| {
            let start = offset;
            offset += span.text.encode_utf16().count();
            JsSpan { category: span.category, text: span.text, start, end: offset }
        })
        .collect()
}

/// One language's classifier, handed to JavaScript
#[wasm_bindgen]
pub struct Highlighter {
    language: Language,
}

#[wasm_bindgen]
impl Highlighter {
    #[wasm_bindgen(constructor)]
    pub fn new(name: &str) -> Result<Highlighter, JsError> {
        match find_language(name) {
            Some(language) => Ok(Self { language: *language }),
            None => Err(JsError::new(&format!("unknown language {:?}", name))),
        }
    }

    pub fn name(&self) -> String {
        self.language.name.to_string()
    }

    /// Code block text -> array of `{category, text, start, end}`
    ///
    /// Offsets index the JS string (UTF-16); concatenating `text` in order
    /// gives back the input.
    pub fn classify(&self, input: &str) -> Result<JsValue, JsError> {
        let spans = to_js_spans((self.language.classify)(input));
        Ok(serde_wasm_bindgen::to_value(&spans)?)
    }
}
