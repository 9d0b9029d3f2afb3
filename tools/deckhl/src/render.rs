use std::io::{self, Write};

use deckhl_protocol::Span;

pub fn json<'a, W: Write>(out: &mut W, spans: impl Iterator<Item = Span<'a>>) -> io::Result<()> {
    let spans: Vec<Span> = spans.collect();
    serde_json::to_writer_pretty(&mut *out, &spans)?;
    writeln!(out)
}

/// Wraps classified spans in `<span class="...">`; plain text is only escaped.
pub fn html<'a, W: Write>(
    out: &mut W,
    spans: impl Iterator<Item = Span<'a>>,
    class_prefix: &str,
) -> io::Result<()> {
    for span in spans {
        if span.category.is_plain() {
            write_escaped(out, span.text)?;
            continue;
        }

        out.write_all(b"<span class=\"")?;
        write_escaped(out, class_prefix)?;
        write!(out, "{}\">", span.category)?;
        write_escaped(out, span.text)?;
        out.write_all(b"</span>")?;
    }
    Ok(())
}

pub fn text<'a, W: Write>(out: &mut W, spans: impl Iterator<Item = Span<'a>>) -> io::Result<()> {
    for span in spans {
        writeln!(out, "{}..{} {} {:?}", span.start, span.end, span.category, span.text)?;
    }
    Ok(())
}

fn write_escaped<W: Write>(out: &mut W, text: &str) -> io::Result<()> {
    let mut last = 0;
    for (i, c) in text.char_indices() {
        let entity = match c {
            '&' => "&amp;",
            '<' => "&lt;",
            '>' => "&gt;",
            '"' => "&quot;",
            '\'' => "&#39;",
            _ => continue,
        };
        out.write_all(text[last..i].as_bytes())?;
        out.write_all(entity.as_bytes())?;
        last = i + 1;
    }
    out.write_all(text[last..].as_bytes())
}
