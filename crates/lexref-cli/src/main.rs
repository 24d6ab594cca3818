use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use lexref_core::UnitKind;
use lexref_grammar::GrammarSpec;
use lexref_reflect::{OutputMode, Reflection, Reflector, ReflectorConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Find legislative citations in text and link them.
#[derive(Parser, Debug)]
#[command(name = "lexref", version)]
#[command(about = "Recognise and link citations to EU legislation", long_about = None)]
struct Args {
    /// Language of the input: EN, DE or ES
    #[arg(short, long, env = "LEXREF_LANGUAGE", default_value = "EN")]
    language: String,

    /// Output: markup (linked text) or locators (JSON)
    #[arg(short, long, env = "LEXREF_MODE", default_value = "markup")]
    mode: String,

    /// Document assumed for citations that name none, e.g. 32013R0575
    #[arg(long, env = "LEXREF_DOCUMENT")]
    document: Option<String>,

    /// Prefix for links into other documents
    #[arg(long, env = "LEXREF_DOMAIN", default_value = "")]
    domain: String,

    /// Provision the input sits in, e.g. "Article 5"
    #[arg(long, env = "LEXREF_CONTAINER")]
    container: Option<String>,

    /// Leave out citations naming nothing at or above this unit
    #[arg(long, env = "LEXREF_MIN_UNIT", value_name = "UNIT")]
    min_unit: Option<UnitKind>,

    /// Join "point (a) of Article 2" style chains into one link
    #[arg(long, env = "LEXREF_JOIN_NESTED")]
    join_nested: bool,

    /// Grammar table as JSON, replacing the built-in one
    #[arg(long, env = "LEXREF_GRAMMAR", value_name = "FILE")]
    grammar: Option<PathBuf>,

    /// Input files, each read as one passage; stdin when none
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,
}

impl Args {
    fn config(&self) -> ReflectorConfig {
        ReflectorConfig {
            language: self.language.clone(),
            mode: self.mode.clone(),
            document: self.document.clone(),
            domain: self.domain.clone(),
            container: self.container.clone(),
            min_unit: self.min_unit,
            join_nested: self.join_nested,
        }
    }
}

fn reflector(args: &Args) -> Result<Reflector> {
    let config = args.config();
    let Some(path) = &args.grammar else {
        return Ok(Reflector::from_config(&config)?);
    };
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read grammar file: {}", path.display()))?;
    let spec = GrammarSpec::from_json(&json)
        .with_context(|| format!("invalid grammar file: {}", path.display()))?;
    if !spec.language.code().eq_ignore_ascii_case(config.language.trim()) {
        warn!(
            grammar = %spec.language,
            requested = %config.language,
            "grammar file overrides the requested language"
        );
    }
    let mode: OutputMode = config.mode.parse()?;
    let mut reflector = Reflector::with_grammar(spec, mode)?
        .with_domain(config.domain)
        .with_join_nested(config.join_nested);
    if let Some(document) = config.document {
        reflector = reflector.with_document(document);
    }
    if let Some(unit) = config.min_unit {
        reflector = reflector.with_min_unit(unit);
    }
    if let Some(container) = &config.container {
        reflector = reflector.with_container_citation(container)?;
    }
    Ok(reflector)
}

fn passages(files: &[PathBuf]) -> Result<Vec<String>> {
    if files.is_empty() {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("failed to read stdin")?;
        return Ok(vec![text]);
    }
    files
        .iter()
        .map(|path| {
            fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
        })
        .collect()
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();
    info!("lexref v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    let reflector = reflector(&args)?;
    let passages = passages(&args.files)?;
    info!(
        language = %reflector.language(),
        mode = %reflector.mode(),
        passages = passages.len(),
        "reflecting"
    );

    let mut out = io::stdout().lock();
    for reflection in reflector.reflect_passages(&passages) {
        match &reflection {
            Reflection::Markup(text) => out.write_all(text.as_bytes())?,
            // One JSON array per passage, one per line.
            Reflection::Locators(refs) => {
                serde_json::to_writer(&mut out, refs)?;
                writeln!(out)?;
            }
        }
    }
    out.flush()?;
    Ok(())
}
