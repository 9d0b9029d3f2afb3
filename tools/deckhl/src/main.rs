use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use deckhl_lexer::{find_language, Grammar, GrammarDef, LANGUAGES};

mod render;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Array of {category, text, start, end}
    Json,
    /// Category-tagged <span> markup
    Html,
    /// One span per line, for debugging grammars
    Text,
}

#[derive(Parser)]
#[command(author, version, about = "Highlights protocol definition snippets for presentation decks")]
struct Cli {
    /// Source to highlight; stdin when omitted or `-`
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Built-in language to highlight as
    #[arg(short, long, default_value = "protobuf")]
    language: String,

    /// JSON grammar definition, replaces --language
    #[arg(short, long, value_name = "FILE")]
    grammar: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = Format::Html)]
    format: Format,

    /// Prepended to every HTML class name, e.g. `hljs-`
    #[arg(long, default_value = "")]
    class_prefix: String,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let source = read_input(cli.input.as_deref())?;

    let loaded;
    let grammar: &Grammar = match &cli.grammar {
        Some(path) => {
            loaded = load_grammar(path)?;
            &loaded
        }
        None => builtin_grammar(&cli.language)?,
    };

    log::info!("highlighting {} bytes as {}", source.len(), grammar.name());

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let spans = grammar.classify(&source);
    match cli.format {
        Format::Json => render::json(&mut out, spans)?,
        Format::Html => render::html(&mut out, spans, &cli.class_prefix)?,
        Format::Text => render::text(&mut out, spans)?,
    }
    out.flush()?;

    Ok(())
}

fn init_logger(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();
}

fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) if path != Path::new("-") => {
            log::debug!("reading {:?}", path);
            fs::read_to_string(path).with_context(|| format!("failed to read {:?}", path))
        }
        _ => {
            log::debug!("reading stdin");
            let mut source = String::new();
            io::stdin().read_to_string(&mut source).context("failed to read stdin")?;
            Ok(source)
        }
    }
}

fn load_grammar(path: &Path) -> anyhow::Result<Grammar> {
    let data = fs::read_to_string(path).with_context(|| format!("failed to read grammar {:?}", path))?;
    let def: GrammarDef =
        serde_json::from_str(&data).with_context(|| format!("{:?} is not a grammar definition", path))?;

    Grammar::from_def(&def).with_context(|| format!("invalid grammar {:?}", path))
}

fn builtin_grammar(name: &str) -> anyhow::Result<&'static Grammar> {
    match find_language(name) {
        Some(language) => Ok((language.grammar)()),
        None => {
            let available: Vec<&str> = LANGUAGES.iter().map(|language| language.name).collect();
            bail!("unknown language {:?}, available: {}", name, available.join(", "))
        }
    }
}
